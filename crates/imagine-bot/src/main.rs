//! Telegram text-to-image bot.
//!
//! Long-polls the Bot API, hands every update to the orchestrator on its own
//! task, and serves a health check for the hosting platform.

mod config;
mod health;
mod processor;
mod sender;

use orchestrator::Bot;
use telegram_client::TelegramClient;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::processor::UpdateProcessor;
use crate::sender::TelegramSink;

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "info,imagine_bot=info,orchestrator=debug,hf_provider=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting imagine bot");

    let client = TelegramClient::connect(config.telegram.clone()).await?;
    let bot = Bot::from_env(TelegramSink::new(client.clone()))?;

    // Ctrl+C stops both the health server and the update processor
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        let _ = shutdown_tx.send(true);
    });

    let mut health_rx = shutdown_rx.clone();
    let health_addr = config.addr;
    let health = tokio::spawn(async move {
        let shutdown = async move {
            let _ = health_rx.wait_for(|stop| *stop).await;
        };
        if let Err(e) = health::serve(health_addr, shutdown).await {
            error!("Health check server failed: {}", e);
        }
    });

    let mut processor_rx = shutdown_rx;
    let processor = UpdateProcessor::new(client, bot);
    let result = processor
        .run_with_shutdown(async move {
            let _ = processor_rx.wait_for(|stop| *stop).await;
        })
        .await;

    if result.is_err() {
        health.abort();
    }
    let _ = health.await;
    info!("Imagine bot stopped");
    result.map_err(Into::into)
}
