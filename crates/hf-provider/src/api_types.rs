//! Request and error payloads for the Hugging Face inference API.

use serde::{Deserialize, Serialize};

/// Text-to-image request body.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceRequest<'a> {
    /// The prompt.
    pub inputs: &'a str,
    /// Fixed quality knobs.
    pub parameters: InferenceParameters<'a>,
}

/// Provider-specific generation parameters.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceParameters<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance_scale: Option<f32>,
}

/// Error body returned on non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub error: String,
    #[serde(default)]
    pub estimated_time: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = InferenceRequest {
            inputs: "a red fox",
            parameters: InferenceParameters {
                negative_prompt: Some("blurry"),
                guidance_scale: Some(7.5),
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["inputs"], "a red fox");
        assert_eq!(json["parameters"]["negative_prompt"], "blurry");
        assert_eq!(json["parameters"]["guidance_scale"], 7.5);
    }

    #[test]
    fn test_request_skips_unset_parameters() {
        let request = InferenceRequest {
            inputs: "a red fox",
            parameters: InferenceParameters {
                negative_prompt: None,
                guidance_scale: None,
            },
        };

        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"inputs":"a red fox","parameters":{}}"#);
    }

    #[test]
    fn test_api_error_parse() {
        let body = r#"{"error":"Model is currently loading","estimated_time":20.5}"#;
        let parsed: ApiError = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error, "Model is currently loading");
        assert_eq!(parsed.estimated_time, Some(20.5));
    }
}
