//! The provider and translator trait definitions.

use async_trait::async_trait;

use crate::outcome::GenerationOutcome;

/// A text-to-image inference backend.
///
/// Implementations perform exactly one bounded call per invocation and map
/// every result, including transport failures, onto a [`GenerationOutcome`].
/// This trait is object-safe and can be used with `Arc<dyn ImageProvider>`.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generate an image for an already translated prompt.
    ///
    /// # Arguments
    ///
    /// * `model` - Opaque provider-specific model identifier. Parameterless
    ///   backends ignore it.
    /// * `prompt` - The canonical-language prompt.
    async fn generate(&self, model: &str, prompt: &str) -> GenerationOutcome;

    /// Get a human-readable name for this provider.
    fn name(&self) -> &str;
}

/// Converts raw user text into the canonical prompt language.
///
/// Implementations must never fail: on any internal error they return the
/// input unchanged. A single attempt is made per call.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text`, or return it unchanged if translation is unavailable.
    async fn translate(&self, text: &str) -> String;

    /// Get a human-readable name for this translator.
    fn name(&self) -> &str;
}
