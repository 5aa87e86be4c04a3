//! Configuration for GoogleTranslator.

use std::env;
use std::time::Duration;

/// Default translate endpoint.
pub const DEFAULT_API_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Configuration for GoogleTranslator.
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// Endpoint URL.
    pub api_url: String,
    /// Target (canonical) language code.
    pub target_lang: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            target_lang: "en".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

impl TranslatorConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `TRANSLATE_API_URL` - Endpoint (default: Google translate_a/single)
    /// - `TRANSLATE_TARGET_LANG` - Target language (default: en)
    /// - `TRANSLATE_TIMEOUT_SECS` - Timeout in seconds (default: 15)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_url: env::var("TRANSLATE_API_URL").unwrap_or(defaults.api_url),
            target_lang: env::var("TRANSLATE_TARGET_LANG").unwrap_or(defaults.target_lang),
            timeout: env::var("TRANSLATE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}
