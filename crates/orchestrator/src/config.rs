//! Retry and chain configuration.

use std::str::FromStr;
use std::time::Duration;

use crate::error::OrchestratorError;

/// Per-provider retry budget and warm-up backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of calls to one provider. Always at least 1.
    pub retry_budget: u32,
    /// Wait between a warm-up response and the next attempt.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(retry_budget: u32, backoff: Duration) -> Self {
        Self {
            retry_budget: retry_budget.max(1),
            backoff,
        }
    }

    /// Default policy for the primary engine: 3 attempts, 25s warm-up wait.
    pub fn primary() -> Self {
        Self::new(3, Duration::from_secs(25))
    }

    /// Default policy for the secondary engine: 2 attempts, 20s warm-up wait.
    pub fn secondary() -> Self {
        Self::new(2, Duration::from_secs(20))
    }

    fn from_env_vars(budget_var: &str, backoff_var: &str, defaults: Self) -> Self {
        let retry_budget = std::env::var(budget_var)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.retry_budget);
        let backoff = std::env::var(backoff_var)
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.backoff);
        Self::new(retry_budget, backoff)
    }
}

/// How many providers a chain contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainMode {
    /// Only the user's selected provider.
    #[default]
    Single,
    /// The selected model, then the remaining catalog models, then the secondary engine.
    Failover,
}

impl FromStr for ChainMode {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "failover" => Ok(Self::Failover),
            other => Err(OrchestratorError::Configuration(format!(
                "CHAIN_MODE must be 'single' or 'failover', got '{}'",
                other
            ))),
        }
    }
}

/// Orchestration settings shared by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    pub chain_mode: ChainMode,
    pub primary_policy: RetryPolicy,
    pub secondary_policy: RetryPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            chain_mode: ChainMode::Single,
            primary_policy: RetryPolicy::primary(),
            secondary_policy: RetryPolicy::secondary(),
        }
    }
}

impl OrchestratorConfig {
    /// Create from environment variables.
    ///
    /// Environment variables:
    /// - `CHAIN_MODE` - `single` or `failover` (default: `single`)
    /// - `HF_RETRY_BUDGET` / `HF_WARMUP_BACKOFF_SECS` - Primary engine policy (default: 3 / 25)
    /// - `POLLINATIONS_RETRY_BUDGET` / `POLLINATIONS_BACKOFF_SECS` - Secondary engine policy (default: 2 / 20)
    pub fn from_env() -> Result<Self, OrchestratorError> {
        let chain_mode = match std::env::var("CHAIN_MODE") {
            Ok(mode) if !mode.trim().is_empty() => mode.parse()?,
            _ => ChainMode::default(),
        };

        Ok(Self {
            chain_mode,
            primary_policy: RetryPolicy::from_env_vars(
                "HF_RETRY_BUDGET",
                "HF_WARMUP_BACKOFF_SECS",
                RetryPolicy::primary(),
            ),
            secondary_policy: RetryPolicy::from_env_vars(
                "POLLINATIONS_RETRY_BUDGET",
                "POLLINATIONS_BACKOFF_SECS",
                RetryPolicy::secondary(),
            ),
        })
    }

    /// Builder-style setter for the chain mode.
    pub fn with_chain_mode(mut self, mode: ChainMode) -> Self {
        self.chain_mode = mode;
        self
    }
}
