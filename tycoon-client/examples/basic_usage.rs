//! Basic usage of the Tycoon API client

use tycoon_client::TycoonClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Endpoints that need a key read it from the environment here; public
    // endpoints work without one.
    let mut builder = TycoonClient::builder();
    if let Ok(key) = std::env::var("TYCOON_API_KEY") {
        builder = builder.api_key(key).track_charges(true);
    }
    let client = builder.build()?;

    if let Some(charges) = client.setup_charges().await? {
        println!("Remaining API charges: {charges}");
    }

    println!("Fetching player list from server 0...\n");
    let players = client.players(0).await?;
    println!("{} players online:", players.players.len());
    for player in &players.players {
        println!("  [{}] {}", player.2, player.0);
    }

    let weather = client.weather(0).await?;
    println!(
        "\nIn-game time {:02}:{:02}, weather {:?} ({}s remaining)",
        weather.hour, weather.minute, weather.current_weather, weather.time_remaining
    );

    let economy = client.economy().await?;
    if let Some(latest) = economy.last() {
        println!(
            "\nEconomy: {} in circulation, {} millionaires, {} billionaires",
            latest.money, latest.millionaires, latest.billionaires
        );
    }

    Ok(())
}
