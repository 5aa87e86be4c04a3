//! The tagged result of one provider call.

use std::fmt;

/// Maximum number of characters kept from a provider diagnostic body.
pub const MAX_DETAIL_CHARS: usize = 200;

/// Result of a single generation attempt against one provider.
///
/// Exactly one variant is produced per call. Providers never retry
/// internally; retry policy belongs to the orchestrator.
#[derive(Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The provider returned image bytes.
    Success(Vec<u8>),
    /// The model is warming up and should be retried after a wait.
    Loading,
    /// The provider answered with a non-success status.
    ProviderError {
        /// Transport status code.
        status: u16,
        /// Truncated diagnostic body.
        detail: String,
    },
    /// The call failed before a status was received (refused, timeout, DNS).
    NetworkError(String),
}

/// Payload-free discriminant of a [`GenerationOutcome`], used for logs and attempt records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    Loading,
    ProviderError,
    NetworkError,
}

impl GenerationOutcome {
    /// Build a provider error, truncating the diagnostic body.
    pub fn provider_error(status: u16, detail: impl AsRef<str>) -> Self {
        Self::ProviderError {
            status,
            detail: truncate_detail(detail.as_ref()),
        }
    }

    /// Build a network error, truncating the diagnostic text.
    pub fn network_error(detail: impl AsRef<str>) -> Self {
        Self::NetworkError(truncate_detail(detail.as_ref()))
    }

    /// Get the discriminant of this outcome.
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success(_) => OutcomeKind::Success,
            Self::Loading => OutcomeKind::Loading,
            Self::ProviderError { .. } => OutcomeKind::ProviderError,
            Self::NetworkError(_) => OutcomeKind::NetworkError,
        }
    }

    /// Check whether this outcome carries an image.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// A short human-readable description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Success(bytes) => format!("success ({} bytes)", bytes.len()),
            Self::Loading => "model loading".to_string(),
            Self::ProviderError { status, detail } => format!("provider error {}: {}", status, detail),
            Self::NetworkError(detail) => format!("network error: {}", detail),
        }
    }
}

impl fmt::Debug for GenerationOutcome {
    // Image payloads are large; print their size only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(bytes) => f.debug_tuple("Success").field(&bytes.len()).finish(),
            Self::Loading => f.write_str("Loading"),
            Self::ProviderError { status, detail } => f
                .debug_struct("ProviderError")
                .field("status", status)
                .field("detail", detail)
                .finish(),
            Self::NetworkError(detail) => f.debug_tuple("NetworkError").field(detail).finish(),
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::Loading => "loading",
            Self::ProviderError => "provider_error",
            Self::NetworkError => "network_error",
        };
        f.write_str(name)
    }
}

/// Truncate a diagnostic string to [`MAX_DETAIL_CHARS`] characters.
///
/// Cuts on a character boundary and appends an ellipsis when shortened.
pub fn truncate_detail(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_DETAIL_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(MAX_DETAIL_CHARS).collect();
    out.push('…');
    out
}
