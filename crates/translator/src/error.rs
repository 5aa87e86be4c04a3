//! Error types for translation attempts.

use thiserror::Error;

/// Errors that can occur during a single translation attempt.
///
/// These never leave the crate through [`Translator::translate`](provider_core::Translator);
/// they are only visible through [`GoogleTranslator::try_translate`](crate::GoogleTranslator).
#[derive(Debug, Error)]
pub enum TranslatorError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("translation service returned status {0}")]
    Status(u16),

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Parse(String),

    /// The service returned no text.
    #[error("empty translation")]
    Empty,
}

impl From<serde_json::Error> for TranslatorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
