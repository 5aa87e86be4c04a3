//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use telegram_client::TelegramConfig;

/// Default port for the health check server.
const DEFAULT_PORT: u16 = 8080;

/// Process-level configuration.
///
/// Provider, translator and chain settings are read by the orchestrator
/// itself; this only covers what the binary needs to start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Health check bind address.
    pub addr: SocketAddr,
    /// Telegram Bot API settings.
    pub telegram: TelegramConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `BOT_TOKEN` | Telegram bot token | (required) |
    /// | `PORT` | Health check port | `8080` |
    /// | `TELEGRAM_API_URL` | Bot API base URL | `https://api.telegram.org` |
    /// | `TELEGRAM_POLL_TIMEOUT_SECS` | Long-poll timeout | `30` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = env::var("BOT_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingBotToken)?;

        let port = match env::var("PORT") {
            Ok(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(port))?,
            Err(_) => DEFAULT_PORT,
        };

        let mut telegram = TelegramConfig::new(token.trim());
        if let Ok(url) = env::var("TELEGRAM_API_URL") {
            telegram = telegram.with_api_url(url);
        }
        if let Some(secs) = env::var("TELEGRAM_POLL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            telegram = telegram.with_poll_timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            telegram,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BOT_TOKEN environment variable is required")]
    MissingBotToken,

    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),
}
