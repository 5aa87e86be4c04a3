//! Error types for orchestrator operations.

use provider_core::ProviderError;
use thiserror::Error;
use translator::TranslatorError;

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Startup configuration was invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Provider construction failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Translator construction failed.
    #[error("translator error: {0}")]
    Translator(#[from] TranslatorError),

    /// A model key is not present in the catalog.
    #[error("unknown model: {0}")]
    UnknownModel(String),

    /// A provider chain resolved to zero entries.
    #[error("provider chain is empty")]
    EmptyChain,

    /// Callback data did not name a known settings action.
    #[error("invalid settings action: {0}")]
    InvalidAction(String),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),
}
