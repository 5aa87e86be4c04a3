//! Scripted provider - replays a fixed list of outcomes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use provider_core::{async_trait, GenerationOutcome, ImageProvider};
use tokio::sync::Mutex;

/// A single recorded call to a [`ScriptedProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
}

/// A provider that returns pre-scripted outcomes in order.
///
/// Once the script runs out every further call returns a `500` provider
/// error, so over-calling shows up as a failure in tests rather than a hang.
pub struct ScriptedProvider {
    name: String,
    script: Mutex<VecDeque<GenerationOutcome>>,
    calls: Mutex<Vec<RecordedCall>>,
    call_count: AtomicUsize,
}

impl ScriptedProvider {
    /// Create a provider that replays `outcomes`.
    pub fn new(name: impl Into<String>, outcomes: Vec<GenerationOutcome>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// A provider that always succeeds with the given bytes.
    pub fn always_success(name: impl Into<String>, bytes: Vec<u8>, times: usize) -> Self {
        Self::new(name, vec![GenerationOutcome::Success(bytes); times])
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// All recorded calls, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    /// Outcomes not yet consumed.
    pub async fn remaining(&self) -> usize {
        self.script.lock().await.len()
    }
}

#[async_trait]
impl ImageProvider for ScriptedProvider {
    async fn generate(&self, model: &str, prompt: &str) -> GenerationOutcome {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().await.push(RecordedCall {
            model: model.to_string(),
            prompt: prompt.to_string(),
        });

        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| GenerationOutcome::provider_error(500, "script exhausted"))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
