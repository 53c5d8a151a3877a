use dotenv::dotenv;
use fleet_client::hooks::{submit_fn, ApiSubmit, PaginatedQuery};
use fleet_client::prelude::*;
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    pretty_env_logger::init();

    let fleet = FleetClient::new(ClientOptions::from_env()?)?;
    fleet.auth().initialize().await;

    // FLEET_DEMO_DATA=1 serves the built-in records instead of the API
    let source = if std::env::var("FLEET_DEMO_DATA").is_ok() {
        DataSource::demo()
    } else {
        fleet.live_source()
    };

    println!("1. Active vehicles");
    let vehicles: PaginatedQuery<Value> = PaginatedQuery::new(
        source.paged_request(Resource::Vehicles),
        Params::new().limit(2).status("active"),
    );
    vehicles.mount().await;
    loop {
        if let Some(error) = vehicles.error() {
            println!("Failed to load vehicles: {}", error);
            break;
        }
        let pagination = vehicles.pagination();
        println!("  page {}/{}", pagination.current_page, pagination.total_pages);
        for vehicle in vehicles.data() {
            println!("  - {} {} {}", vehicle["licensePlate"], vehicle["make"], vehicle["model"]);
        }
        if !vehicles.next_page().await {
            break;
        }
    }

    if source.is_demo() {
        return Ok(());
    }

    println!("\n2. Registering a vehicle");
    let api = fleet.vehicles();
    let submit: ApiSubmit<Value, ApiResponse<Value>> = ApiSubmit::new(
        submit_fn(move |payload: Value| {
            let api = api.clone();
            async move { api.create(&payload).await }
        }),
        fleet.submit_options(),
    );
    let payload = json!({
        "licensePlate": "FLT-2001",
        "make": "Ford",
        "model": "Transit",
        "year": 2023,
        "type": "van",
        "fuelType": "diesel"
    });
    match submit.submit(payload).await {
        Some(response) => println!("Created: {}", response.message.unwrap_or_default()),
        None => println!("Create failed: {}", submit.error().unwrap_or_default()),
    }

    Ok(())
}
