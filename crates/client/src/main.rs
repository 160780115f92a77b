use anyhow::Result;
use tracing::info;

use safehome_client::app::{App, SHUTDOWN_TIMEOUT};
use safehome_client::config::Config;
use safehome_client::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    logging::init_logging(&config.logging);

    info!("Starting SafeHome client v{}", env!("CARGO_PKG_VERSION"));

    // Build and launch the notification pipeline
    let app = App::start(config)?;

    // Run until interrupted
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    app.shutdown(SHUTDOWN_TIMEOUT).await;

    Ok(())
}
