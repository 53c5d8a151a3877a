use fleet_client::envelope::extract_list;
use fleet_client::export::write_csv;
use fleet_client::prelude::*;
use fleet_client::source::{DemoSource, RecordSource};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "fuel_logs.csv".to_string());

    let response = DemoSource::new()
        .list(Resource::Fuel, &Params::new().limit(100))
        .await?;
    let data = response.into_data()?;
    let page = extract_list(&data)?;

    write_csv(
        &path,
        &page.items,
        &["date", "vehicle", "liters", "pricePerLiter", "totalCost", "station", "status"],
    )?;
    log::info!("wrote {} fuel logs to {}", page.items.len(), path);
    println!("Exported {} rows to {}", page.items.len(), path);

    Ok(())
}
