//! PollinationsProvider implementation.

use provider_core::{async_trait, GenerationOutcome, ImageProvider, ProviderError};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::config::PollinationsConfig;

/// A parameterless image provider backed by a public GET endpoint.
pub struct PollinationsProvider {
    client: Client,
    config: PollinationsConfig,
}

impl PollinationsProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: PollinationsConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "PollinationsProvider initialized ({}x{}, timeout: {:?})",
            config.width, config.height, config.timeout
        );

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(PollinationsConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &PollinationsConfig {
        &self.config
    }

    fn seed(&self) -> u64 {
        self.config
            .seed
            .unwrap_or_else(|| rand::random::<u32>() as u64)
    }
}

#[async_trait]
impl ImageProvider for PollinationsProvider {
    async fn generate(&self, _model: &str, prompt: &str) -> GenerationOutcome {
        let url = self.config.prompt_url(prompt, self.seed());
        debug!("Requesting {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Network error calling pollinations: {}", e);
                return GenerationOutcome::network_error(e.to_string());
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => return GenerationOutcome::network_error(e.to_string()),
        };

        let outcome = classify_response(status, body);
        if let GenerationOutcome::ProviderError { status, ref detail } = outcome {
            warn!("Pollinations error {}: {}", status, detail);
        }
        outcome
    }

    fn name(&self) -> &str {
        "Pollinations"
    }
}

/// Map an HTTP status and body onto a generation outcome.
///
/// This endpoint has no warm-up signal, so every non-200 status is a
/// provider error.
pub fn classify_response(status: StatusCode, body: Vec<u8>) -> GenerationOutcome {
    if status != StatusCode::OK {
        return GenerationOutcome::provider_error(status.as_u16(), String::from_utf8_lossy(&body));
    }
    if body.is_empty() {
        return GenerationOutcome::provider_error(status.as_u16(), "empty image payload");
    }
    GenerationOutcome::Success(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use provider_core::MAX_DETAIL_CHARS;
    use std::time::Duration;

    #[test]
    fn test_fixed_seed_is_used() {
        let config = PollinationsConfig {
            seed: Some(99),
            ..Default::default()
        };
        let provider = PollinationsProvider::new(config).unwrap();
        assert_eq!(provider.seed(), 99);
    }

    #[test]
    fn test_provider_name() {
        let provider = PollinationsProvider::new(PollinationsConfig::default()).unwrap();
        assert_eq!(provider.name(), "Pollinations");
    }

    #[test]
    fn test_classify_success() {
        assert_eq!(
            classify_response(StatusCode::OK, b"PNGDATA".to_vec()),
            GenerationOutcome::Success(b"PNGDATA".to_vec())
        );
    }

    #[test]
    fn test_classify_empty_body_is_error() {
        assert_eq!(
            classify_response(StatusCode::OK, Vec::new()),
            GenerationOutcome::ProviderError {
                status: 200,
                detail: "empty image payload".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_unavailable_is_not_loading() {
        let outcome = classify_response(StatusCode::SERVICE_UNAVAILABLE, b"busy".to_vec());
        assert_eq!(
            outcome,
            GenerationOutcome::ProviderError {
                status: 503,
                detail: "busy".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_server_error_truncated() {
        let body = "x".repeat(MAX_DETAIL_CHARS * 2).into_bytes();
        match classify_response(StatusCode::INTERNAL_SERVER_ERROR, body) {
            GenerationOutcome::ProviderError { status, detail } => {
                assert_eq!(status, 500);
                assert_eq!(detail.chars().count(), MAX_DETAIL_CHARS + 1);
                assert!(detail.ends_with('…'));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let config = PollinationsConfig {
            api_url: "http://127.0.0.1:9/prompt".to_string(),
            timeout: Duration::from_secs(5),
            ..Default::default()
        };
        let provider = PollinationsProvider::new(config).unwrap();

        let outcome = provider.generate("", "a cat").await;
        assert!(matches!(outcome, GenerationOutcome::NetworkError(_)));
    }
}
