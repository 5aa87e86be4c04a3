//! Configuration for HfProvider.

use provider_core::ProviderError;
use std::env;
use std::fmt;
use std::time::Duration;

/// Default inference router base URL.
pub const DEFAULT_API_URL: &str = "https://router.huggingface.co/hf-inference/models";

/// Default negative prompt attached to every request.
pub const DEFAULT_NEGATIVE_PROMPT: &str =
    "blurry, low quality, distorted, deformed, watermark, text";

/// Configuration for HfProvider.
#[derive(Clone)]
pub struct HfProviderConfig {
    /// Base URL; the model identifier is appended as a path segment.
    pub api_url: String,

    /// Bearer token for authentication.
    pub api_token: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Fixed negative prompt (None disables).
    pub negative_prompt: Option<String>,

    /// Fixed guidance strength (None disables).
    pub guidance_scale: Option<f32>,
}

impl Default for HfProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: String::new(),
            timeout: Duration::from_secs(90),
            negative_prompt: Some(DEFAULT_NEGATIVE_PROMPT.to_string()),
            guidance_scale: Some(7.5),
        }
    }
}

impl HfProviderConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `HF_TOKEN` - Bearer token for the inference API
    ///
    /// Optional environment variables:
    /// - `HF_API_URL` - Base URL (default: https://router.huggingface.co/hf-inference/models)
    /// - `HF_TIMEOUT_SECS` - Request timeout in seconds (default: 90)
    /// - `HF_NEGATIVE_PROMPT` - Negative prompt (default: built-in list; empty disables)
    /// - `HF_GUIDANCE_SCALE` - Guidance scale (default: 7.5)
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_token = env::var("HF_TOKEN")
            .map_err(|_| ProviderError::Configuration("HF_TOKEN not set".to_string()))?;

        let api_url = env::var("HF_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout = env::var("HF_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(90));

        let negative_prompt = match env::var("HF_NEGATIVE_PROMPT") {
            Ok(value) if value.trim().is_empty() => None,
            Ok(value) => Some(value),
            Err(_) => Some(DEFAULT_NEGATIVE_PROMPT.to_string()),
        };

        let guidance_scale = env::var("HF_GUIDANCE_SCALE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(Some(7.5));

        Ok(Self {
            api_url,
            api_token,
            timeout,
            negative_prompt,
            guidance_scale,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> HfProviderConfigBuilder {
        HfProviderConfigBuilder::default()
    }

    /// Build the endpoint URL for a model.
    pub fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), model)
    }
}

/// Builder for HfProviderConfig.
#[derive(Debug, Default)]
pub struct HfProviderConfigBuilder {
    config: HfProviderConfig,
}

impl HfProviderConfigBuilder {
    /// Set the API token.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.config.api_token = token.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the negative prompt.
    pub fn negative_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.negative_prompt = Some(prompt.into());
        self
    }

    /// Set the guidance scale.
    pub fn guidance_scale(mut self, scale: f32) -> Self {
        self.config.guidance_scale = Some(scale);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> HfProviderConfig {
        self.config
    }
}

impl fmt::Debug for HfProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HfProviderConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("negative_prompt", &self.negative_prompt)
            .field("guidance_scale", &self.guidance_scale)
            .finish()
    }
}
