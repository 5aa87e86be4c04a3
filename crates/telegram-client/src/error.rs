//! Error types for telegram-client.

use thiserror::Error;

/// Errors that can occur when talking to the Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with `ok: false`.
    #[error("API error {code}: {description}")]
    Api { code: i32, description: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TelegramError {
    /// Check whether an edit failed only because the text did not change.
    pub fn is_not_modified(&self) -> bool {
        matches!(self, Self::Api { description, .. } if description.contains("message is not modified"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_modified() {
        let err = TelegramError::Api {
            code: 400,
            description: "Bad Request: message is not modified: specified new message content".to_string(),
        };
        assert!(err.is_not_modified());

        let err = TelegramError::Api {
            code: 400,
            description: "Bad Request: chat not found".to_string(),
        };
        assert!(!err.is_not_modified());
    }
}
