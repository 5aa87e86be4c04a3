//! Configuration types for telegram-client.

use std::fmt;
use std::time::Duration;

/// Default Bot API base URL.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Configuration for connecting to the Bot API.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Base URL of the Bot API server.
    pub api_url: String,
    /// Bot token issued by BotFather.
    pub token: String,
    /// Long-poll timeout passed to `getUpdates`.
    pub poll_timeout: Duration,
}

impl TelegramConfig {
    /// Create a new configuration for the given bot token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            poll_timeout: Duration::from_secs(30),
        }
    }

    /// Use a custom Bot API server.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set the long-poll timeout.
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Get the URL of a Bot API method.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url.trim_end_matches('/'), self.token, method)
    }

    /// HTTP timeout for requests; must outlast the long poll.
    pub fn request_timeout(&self) -> Duration {
        self.poll_timeout + Duration::from_secs(30)
    }
}

// The token is a credential; keep it out of logs.
impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("poll_timeout", &self.poll_timeout)
            .finish()
    }
}
