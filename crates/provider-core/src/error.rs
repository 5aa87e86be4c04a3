//! Error types for provider construction.

use thiserror::Error;

/// Errors raised while building or configuring a provider.
///
/// Failures of an individual generation call are not errors: they are
/// reported through [`GenerationOutcome`](crate::GenerationOutcome).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request could not be built from the given inputs.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
