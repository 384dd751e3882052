//! Example demonstrating failover behavior of the request pipeline

use tracing::info;
use tycoon_client::TycoonClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("Tycoon client failover example");
    info!("==============================");

    // A short timeout plus a generous retry budget makes rotation easy to
    // observe in the debug logs when a server is slow.
    let client = TycoonClient::builder()
        .timeout_secs(5)
        .max_retries(5)
        .build()?;

    info!("Configuration:");
    info!("- Pool size: {}", client.servers().len());
    info!("- Timeout: 5s");
    info!("- Max retries: 5");
    info!("");

    info!("Fetching racing tracks (rotates on transient failures)...");
    match client.racing_tracks().await {
        Ok(tracks) => {
            info!("✓ Retrieved {} tracks", tracks.len());
            info!(
                "  Active origin is now {} (cursor {})",
                client.servers().current(),
                client.servers().cursor()
            );
            if let Some(track) = tracks.first() {
                info!(
                    "  First track: {} ({}m), WR {}ms by {}",
                    track.name, track.length, track.wr.time, track.wr.name
                );
            }
        }
        Err(e) => match e.code() {
            Some(code) => info!("✗ Failed with wire code {code}: {e}"),
            None => info!("✗ Failed: {e}"),
        },
    }

    Ok(())
}
