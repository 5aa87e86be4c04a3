//! Long-polling update stream.

use std::collections::VecDeque;
use std::time::Duration;

use futures::stream::{self, Stream};
use tracing::{debug, warn};

use crate::client::TelegramClient;
use crate::error::TelegramError;
use crate::types::Update;

/// Backoff applied after a failed `getUpdates` call.
#[derive(Debug, Clone)]
pub struct PollBackoff {
    /// Initial delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Backoff multiplier for each consecutive failure.
    pub backoff_multiplier: f64,
}

impl Default for PollBackoff {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl PollBackoff {
    /// Calculate delay for a given number of consecutive failures.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }
}

struct PollState {
    client: TelegramClient,
    backoff: PollBackoff,
    offset: Option<i64>,
    buffered: VecDeque<Update>,
    failures: u32,
}

/// Subscribe to updates with the default backoff.
pub fn subscribe(client: &TelegramClient) -> impl Stream<Item = Result<Update, TelegramError>> + Send {
    subscribe_with_backoff(client, PollBackoff::default())
}

/// Subscribe to updates.
///
/// The stream never ends on its own. Polling errors are yielded as items and
/// followed by a backoff sleep; the offset advances past every update handed
/// out, so each update is yielded at most once.
pub fn subscribe_with_backoff(
    client: &TelegramClient,
    backoff: PollBackoff,
) -> impl Stream<Item = Result<Update, TelegramError>> + Send {
    let state = PollState {
        client: client.clone(),
        backoff,
        offset: None,
        buffered: VecDeque::new(),
        failures: 0,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(update) = state.buffered.pop_front() {
                return Some((Ok(update), state));
            }

            if state.failures > 0 {
                let delay = state.backoff.delay_for_attempt(state.failures - 1);
                debug!("Retrying getUpdates in {:?}", delay);
                tokio::time::sleep(delay).await;
            }

            match state.client.get_updates(state.offset).await {
                Ok(updates) => {
                    state.failures = 0;
                    if let Some(last) = updates.last() {
                        state.offset = Some(next_offset(last.update_id));
                    }
                    state.buffered.extend(updates);
                }
                Err(e) => {
                    state.failures = state.failures.saturating_add(1);
                    warn!("getUpdates failed (failures: {}): {}", state.failures, e);
                    return Some((Err(e), state));
                }
            }
        }
    })
}

fn next_offset(update_id: i64) -> i64 {
    update_id.saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_delays() {
        let backoff = PollBackoff::default();
        assert_eq!(backoff.delay_for_attempt(0), Duration::from_millis(500));
        assert_eq!(backoff.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(backoff.delay_for_attempt(2), Duration::from_millis(2000));
        assert_eq!(backoff.delay_for_attempt(20), Duration::from_secs(30));
    }

    #[test]
    fn test_next_offset() {
        assert_eq!(next_offset(41), 42);
        assert_eq!(next_offset(i64::MAX), i64::MAX);
    }
}
