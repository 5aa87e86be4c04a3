//! HfProvider implementation using the Hugging Face inference API.

use provider_core::{async_trait, GenerationOutcome, ImageProvider, ProviderError};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::api_types::{ApiError, InferenceParameters, InferenceRequest};
use crate::config::HfProviderConfig;

/// An image provider backed by the Hugging Face inference router.
///
/// Each call is a single bounded POST; the provider never retries.
pub struct HfProvider {
    client: Client,
    config: HfProviderConfig,
}

impl HfProvider {
    /// Create a new HfProvider with the given configuration.
    pub fn new(config: HfProviderConfig) -> Result<Self, ProviderError> {
        if config.api_token.is_empty() {
            return Err(ProviderError::Configuration("API token is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "HfProvider initialized (api: {}, timeout: {:?})",
            config.api_url, config.timeout
        );

        Ok(Self { client, config })
    }

    /// Create an HfProvider from environment variables.
    ///
    /// See [`HfProviderConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(HfProviderConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &HfProviderConfig {
        &self.config
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> InferenceRequest<'a> {
        InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                negative_prompt: self.config.negative_prompt.as_deref(),
                guidance_scale: self.config.guidance_scale,
            },
        }
    }
}

#[async_trait]
impl ImageProvider for HfProvider {
    async fn generate(&self, model: &str, prompt: &str) -> GenerationOutcome {
        let url = self.config.model_url(model);
        let request = self.build_request(prompt);

        debug!("Sending request to {}: {:?}", url, request);

        let response = match self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_token))
            .header("x-use-cache", "false")
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Network error calling {}: {}", model, e);
                return GenerationOutcome::network_error(describe_transport_error(&e));
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body.to_vec(),
            Err(e) => {
                warn!("Failed to read body from {}: {}", model, e);
                return GenerationOutcome::network_error(describe_transport_error(&e));
            }
        };

        let outcome = classify_response(status, body);
        if let GenerationOutcome::ProviderError { status, ref detail } = outcome {
            warn!("API error {} from {}: {}", status, model, detail);
        }
        outcome
    }

    fn name(&self) -> &str {
        "HuggingFace"
    }
}

/// Map an HTTP status and body onto a generation outcome.
///
/// `503` is the warm-up signal. Error bodies are reduced to the API's
/// `error` field when they parse, and truncated either way.
pub fn classify_response(status: StatusCode, body: Vec<u8>) -> GenerationOutcome {
    if status == StatusCode::OK {
        if body.is_empty() {
            return GenerationOutcome::provider_error(status.as_u16(), "empty image payload");
        }
        return GenerationOutcome::Success(body);
    }

    if status == StatusCode::SERVICE_UNAVAILABLE {
        return GenerationOutcome::Loading;
    }

    let text = String::from_utf8_lossy(&body);
    let detail = match serde_json::from_str::<ApiError>(&text) {
        Ok(api_error) => api_error.error,
        Err(_) => text.into_owned(),
    };
    GenerationOutcome::provider_error(status.as_u16(), detail)
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {}", error)
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}
