//! Configuration for PollinationsProvider.

use std::env;
use std::time::Duration;

/// Default base URL; the encoded prompt is appended as a path segment.
pub const DEFAULT_API_URL: &str = "https://image.pollinations.ai/prompt";

/// Configuration for PollinationsProvider.
#[derive(Debug, Clone)]
pub struct PollinationsConfig {
    /// Base URL.
    pub api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Fixed seed. When unset a random seed is drawn per request.
    pub seed: Option<u64>,
}

impl Default for PollinationsConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(120),
            width: 1024,
            height: 1024,
            seed: None,
        }
    }
}

impl PollinationsConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `POLLINATIONS_API_URL` - Base URL (default: https://image.pollinations.ai/prompt)
    /// - `POLLINATIONS_TIMEOUT_SECS` - Request timeout (default: 120)
    /// - `POLLINATIONS_WIDTH` / `POLLINATIONS_HEIGHT` - Dimensions (default: 1024)
    /// - `POLLINATIONS_SEED` - Fixed seed (default: random per request)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_url: env::var("POLLINATIONS_API_URL").unwrap_or(defaults.api_url),
            timeout: env::var("POLLINATIONS_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            width: env::var("POLLINATIONS_WIDTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.width),
            height: env::var("POLLINATIONS_HEIGHT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.height),
            seed: env::var("POLLINATIONS_SEED").ok().and_then(|v| v.parse().ok()),
        }
    }

    /// Build the request URL for a prompt and seed.
    pub fn prompt_url(&self, prompt: &str, seed: u64) -> String {
        format!(
            "{}/{}?width={}&height={}&seed={}&nologo=true",
            self.api_url.trim_end_matches('/'),
            urlencoding::encode(prompt),
            self.width,
            self.height,
            seed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PollinationsConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!((config.width, config.height), (1024, 1024));
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_prompt_url_encodes_path() {
        let config = PollinationsConfig::default();
        let url = config.prompt_url("red fox / snow?", 42);
        assert_eq!(
            url,
            "https://image.pollinations.ai/prompt/red%20fox%20%2F%20snow%3F?width=1024&height=1024&seed=42&nologo=true"
        );
    }

    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_vars() {
            std::env::remove_var("POLLINATIONS_API_URL");
            std::env::remove_var("POLLINATIONS_TIMEOUT_SECS");
            std::env::remove_var("POLLINATIONS_WIDTH");
            std::env::remove_var("POLLINATIONS_HEIGHT");
            std::env::remove_var("POLLINATIONS_SEED");
        }

        clear_all_vars();
        let config = PollinationsConfig::from_env();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.seed.is_none());

        std::env::set_var("POLLINATIONS_WIDTH", "512");
        std::env::set_var("POLLINATIONS_HEIGHT", "768");
        std::env::set_var("POLLINATIONS_SEED", "7");
        std::env::set_var("POLLINATIONS_TIMEOUT_SECS", "30");
        let config = PollinationsConfig::from_env();
        assert_eq!((config.width, config.height), (512, 768));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.timeout, Duration::from_secs(30));

        clear_all_vars();
    }
}
