//! Entrypoint for the realtime chat client.
//!
//! Loads configuration, sets up logging on stderr (stdout carries the
//! conversation), and runs one session over stdin.

use anyhow::Context;
use chat_service::{config::Config, console::Console, session};
use tokio::io::BufReader;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
    match &config.env_file {
        Some(path) => info!(path = %path.display(), "Loaded environment file"),
        None => info!("No .env file found, using system environment variables"),
    }

    // --- 3. Run the Session ---
    let input = BufReader::new(tokio::io::stdin());
    if let Err(e) = session::run(&config, input, Console::stdout()).await {
        error!(error = ?e, "Session failed");
        return Err(e);
    }
    Ok(())
}
