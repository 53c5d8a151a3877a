use dotenv::dotenv;
use fleet_client::prelude::*;
use std::env;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    pretty_env_logger::init();

    let fleet = FleetClient::new(ClientOptions::from_env()?)?;

    // A persisted session from an earlier run is validated first
    match fleet.auth().initialize().await {
        AuthState::Authenticated(user) => println!("Resumed session for {}", user.display_name()),
        _ => println!("No saved session"),
    }

    let email = env::var("FLEET_EMAIL").unwrap_or_else(|_| "admin@fleet.com".to_string());
    let password = env::var("FLEET_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

    println!("\n1. Logging in as {}", email);
    let result = fleet.auth().login(&Credentials::new(&email, &password)).await;
    if !result.success {
        println!("Login failed: {}", result.message.unwrap_or_default());
        return Ok(());
    }
    if let Some(user) = &result.user {
        println!("Signed in as {} ({})", user.display_name(), user.role);
    }

    println!("\n2. Permissions");
    let permissions = fleet.auth().permissions();
    for permission in permissions.iter() {
        println!("  - {}", permission);
    }
    println!(
        "  can manage users: {}",
        permissions.has_permission("manage_users")
    );

    println!("\n3. Logging out");
    fleet.auth().logout().await;
    println!("State after logout: {:?}", fleet.auth().state());

    Ok(())
}
