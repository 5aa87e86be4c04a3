//! Retry and failover state machine for a single generation request.

use async_trait::async_trait;
use provider_core::{GenerationOutcome, OutcomeKind};
use tracing::{debug, info, warn};

use crate::chain::{ChainEntry, ProviderChain};

/// Progress notifications emitted while a chain is being worked through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A provider call is about to be made.
    Attempting {
        label: String,
        attempt: u32,
        budget: u32,
        provider_index: usize,
        chain_len: usize,
    },
    /// The provider reported its model is loading; a backoff wait follows.
    WarmingUp {
        label: String,
        attempt: u32,
        budget: u32,
    },
    /// The current provider is given up on and the next one is tried.
    Advancing { from: String, to: String },
}

/// Receives [`ProgressEvent`]s, typically to update a status message.
#[async_trait]
pub trait ProgressListener: Send + Sync {
    async fn on_progress(&self, event: &ProgressEvent);
}

/// A listener that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoOpListener;

#[async_trait]
impl ProgressListener for NoOpListener {
    async fn on_progress(&self, _event: &ProgressEvent) {}
}

/// One provider call made during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub provider_index: usize,
    /// 1-based attempt number on this provider.
    pub attempt: u32,
    pub label: String,
    pub kind: OutcomeKind,
    /// Whether a warm-up backoff wait followed this call.
    pub backed_off: bool,
}

/// Terminal result of a run.
#[derive(Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Success { image: Vec<u8>, label: String },
    Exhausted { last_failure: Option<String> },
}

impl std::fmt::Debug for GenerationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success { image, label } => f
                .debug_struct("Success")
                .field("image_bytes", &image.len())
                .field("label", label)
                .finish(),
            Self::Exhausted { last_failure } => f
                .debug_struct("Exhausted")
                .field("last_failure", last_failure)
                .finish(),
        }
    }
}

/// The result of a run plus the log of every call made.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub result: GenerationResult,
    pub attempts: Vec<AttemptRecord>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        matches!(self.result, GenerationResult::Success { .. })
    }

    /// Total provider calls made.
    pub fn calls(&self) -> usize {
        self.attempts.len()
    }

    /// Number of warm-up backoff waits performed.
    pub fn backoffs(&self) -> usize {
        self.attempts.iter().filter(|a| a.backed_off).count()
    }

    /// Calls made against one chain position.
    pub fn calls_to(&self, provider_index: usize) -> usize {
        self.attempts
            .iter()
            .filter(|a| a.provider_index == provider_index)
            .count()
    }
}

enum State {
    Trying {
        provider_index: usize,
        attempt: u32,
    },
    WaitingWarmup {
        provider_index: usize,
        attempt: u32,
    },
    Advancing {
        from: usize,
    },
    Done(GenerationResult),
}

/// Drives a [`ProviderChain`] to success or exhaustion.
///
/// Each chain entry is called up to its retry budget. Every loading response
/// consumes one unit and is followed by the entry's backoff wait; once the
/// budget is spent the run moves on. Provider and network errors move to the
/// next entry immediately. The first success ends the run.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator;

impl Orchestrator {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(
        &self,
        chain: &ProviderChain,
        prompt: &str,
        listener: &dyn ProgressListener,
    ) -> GenerationReport {
        let entries = chain.entries();
        let mut attempts: Vec<AttemptRecord> = Vec::with_capacity(chain.max_calls());
        let mut last_failure: Option<String> = None;
        let mut state = State::Trying {
            provider_index: 0,
            attempt: 1,
        };

        loop {
            state = match state {
                State::Trying {
                    provider_index,
                    attempt,
                } => {
                    let entry = &entries[provider_index];
                    let budget = entry.policy.retry_budget;
                    listener
                        .on_progress(&ProgressEvent::Attempting {
                            label: entry.label.clone(),
                            attempt,
                            budget,
                            provider_index,
                            chain_len: entries.len(),
                        })
                        .await;

                    let outcome = entry.provider.generate(&entry.model, prompt).await;
                    log_outcome(entry, attempt, budget, &outcome);

                    attempts.push(AttemptRecord {
                        provider_index,
                        attempt,
                        label: entry.label.clone(),
                        kind: outcome.kind(),
                        backed_off: false,
                    });

                    match outcome {
                        GenerationOutcome::Success(image) => {
                            State::Done(GenerationResult::Success {
                                image,
                                label: entry.label.clone(),
                            })
                        }
                        GenerationOutcome::Loading => {
                            last_failure = Some(format!("{} is still loading", entry.label));
                            State::WaitingWarmup {
                                provider_index,
                                attempt,
                            }
                        }
                        failure => {
                            last_failure = Some(format!("{}: {}", entry.label, failure.describe()));
                            State::Advancing {
                                from: provider_index,
                            }
                        }
                    }
                }

                State::WaitingWarmup {
                    provider_index,
                    attempt,
                } => {
                    let entry = &entries[provider_index];
                    listener
                        .on_progress(&ProgressEvent::WarmingUp {
                            label: entry.label.clone(),
                            attempt,
                            budget: entry.policy.retry_budget,
                        })
                        .await;

                    debug!(
                        "Waiting {:?} for {} to warm up",
                        entry.policy.backoff, entry.label
                    );
                    tokio::time::sleep(entry.policy.backoff).await;

                    if let Some(record) = attempts.last_mut() {
                        record.backed_off = true;
                    }

                    if attempt < entry.policy.retry_budget {
                        State::Trying {
                            provider_index,
                            attempt: attempt + 1,
                        }
                    } else {
                        State::Advancing {
                            from: provider_index,
                        }
                    }
                }

                State::Advancing { from } => {
                    let next = from + 1;
                    if next < entries.len() {
                        info!(
                            "Switching provider: {} -> {}",
                            entries[from].label, entries[next].label
                        );
                        listener
                            .on_progress(&ProgressEvent::Advancing {
                                from: entries[from].label.clone(),
                                to: entries[next].label.clone(),
                            })
                            .await;
                        State::Trying {
                            provider_index: next,
                            attempt: 1,
                        }
                    } else {
                        warn!(
                            "All {} providers exhausted after {} calls",
                            entries.len(),
                            attempts.len()
                        );
                        State::Done(GenerationResult::Exhausted {
                            last_failure: last_failure.take(),
                        })
                    }
                }

                State::Done(result) => {
                    return GenerationReport { result, attempts };
                }
            };
        }
    }
}

fn log_outcome(entry: &ChainEntry, attempt: u32, budget: u32, outcome: &GenerationOutcome) {
    match outcome {
        GenerationOutcome::Success(image) => info!(
            "{} succeeded on attempt {}/{} ({} bytes)",
            entry.label,
            attempt,
            budget,
            image.len()
        ),
        GenerationOutcome::Loading => info!(
            "{} is loading (attempt {}/{})",
            entry.label, attempt, budget
        ),
        failure => warn!(
            "{} failed on attempt {}/{}: {}",
            entry.label,
            attempt,
            budget,
            failure.describe()
        ),
    }
}
