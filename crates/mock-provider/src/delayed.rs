//! Delayed provider - wraps another provider with artificial delay.

use std::time::Duration;

use provider_core::{async_trait, GenerationOutcome, ImageProvider};
use tokio::time::sleep;

/// A provider that wraps another provider and adds artificial delay.
///
/// Useful for simulating slow backends and interleaved sessions.
pub struct DelayedProvider<P: ImageProvider> {
    inner: P,
    delay: Duration,
}

impl<P: ImageProvider> DelayedProvider<P> {
    /// Create a new DelayedProvider with the specified delay.
    pub fn new(inner: P, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a provider with a delay in milliseconds.
    pub fn with_millis(inner: P, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// Get the wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: ImageProvider> ImageProvider for DelayedProvider<P> {
    async fn generate(&self, model: &str, prompt: &str) -> GenerationOutcome {
        sleep(self.delay).await;
        self.inner.generate(model, prompt).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedProvider;
    use std::time::Instant;

    #[tokio::test]
    async fn test_delayed_provider() {
        let provider =
            DelayedProvider::with_millis(ScriptedProvider::always_success("x", vec![7], 1), 50);

        let start = Instant::now();
        let outcome = provider.generate("m", "p").await;

        assert_eq!(outcome, GenerationOutcome::Success(vec![7]));
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(provider.inner().call_count(), 1);
    }
}
