//! Provider chains and their resolution from user preferences.

use std::fmt;
use std::sync::Arc;

use provider_core::ImageProvider;

use crate::catalog::ModelCatalog;
use crate::config::{ChainMode, OrchestratorConfig, RetryPolicy};
use crate::error::OrchestratorError;
use crate::preferences::{Engine, UserPreference};

/// One step of a provider chain.
#[derive(Clone)]
pub struct ChainEntry {
    pub provider: Arc<dyn ImageProvider>,
    /// Model identifier passed to the provider.
    pub model: String,
    /// Label used in status messages.
    pub label: String,
    pub policy: RetryPolicy,
}

impl ChainEntry {
    pub fn new(
        provider: Arc<dyn ImageProvider>,
        model: impl Into<String>,
        label: impl Into<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            label: label.into(),
            policy,
        }
    }
}

impl fmt::Debug for ChainEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainEntry")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("label", &self.label)
            .field("policy", &self.policy)
            .finish()
    }
}

/// A non-empty, ordered list of providers to try for one request.
#[derive(Debug, Clone)]
pub struct ProviderChain {
    entries: Vec<ChainEntry>,
}

impl ProviderChain {
    pub fn new(entries: Vec<ChainEntry>) -> Result<Self, OrchestratorError> {
        if entries.is_empty() {
            return Err(OrchestratorError::EmptyChain);
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept alongside `len` for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Upper bound on provider calls for a single request.
    pub fn max_calls(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.policy.retry_budget as usize)
            .sum()
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.label.clone()).collect()
    }
}

/// Label of the secondary engine in status messages.
pub const SECONDARY_LABEL: &str = "Pollinations";

/// Turns a [`UserPreference`] into a [`ProviderChain`].
pub struct ChainResolver {
    catalog: Arc<ModelCatalog>,
    primary: Arc<dyn ImageProvider>,
    secondary: Arc<dyn ImageProvider>,
    config: OrchestratorConfig,
}

impl ChainResolver {
    pub fn new(
        catalog: Arc<ModelCatalog>,
        primary: Arc<dyn ImageProvider>,
        secondary: Arc<dyn ImageProvider>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            catalog,
            primary,
            secondary,
            config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    fn primary_entry(&self, key: &str) -> Result<ChainEntry, OrchestratorError> {
        let model = self
            .catalog
            .get(key)
            .ok_or_else(|| OrchestratorError::UnknownModel(key.to_string()))?;
        Ok(ChainEntry::new(
            self.primary.clone(),
            &model.id,
            &model.label,
            self.config.primary_policy,
        ))
    }

    fn secondary_entry(&self) -> ChainEntry {
        // The secondary engine ignores the model argument.
        ChainEntry::new(
            self.secondary.clone(),
            "",
            SECONDARY_LABEL,
            self.config.secondary_policy,
        )
    }

    /// Build the chain for a preference.
    ///
    /// - Secondary engine: just the secondary provider.
    /// - Primary engine, single mode: the selected catalog model.
    /// - Primary engine, failover mode: the selected model, the other catalog
    ///   models in catalog order, then the secondary provider.
    pub fn resolve(&self, preference: &UserPreference) -> Result<ProviderChain, OrchestratorError> {
        let entries = match preference.engine {
            Engine::Secondary => vec![self.secondary_entry()],
            Engine::Primary => {
                let mut entries = vec![self.primary_entry(&preference.model_key)?];
                if self.config.chain_mode == ChainMode::Failover {
                    for (key, _) in self.catalog.iter() {
                        if key != preference.model_key {
                            entries.push(self.primary_entry(key)?);
                        }
                    }
                    entries.push(self.secondary_entry());
                }
                entries
            }
        };

        ProviderChain::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_provider::ScriptedProvider;

    fn resolver(mode: ChainMode) -> ChainResolver {
        ChainResolver::new(
            Arc::new(ModelCatalog::default()),
            Arc::new(ScriptedProvider::new("hf", vec![])),
            Arc::new(ScriptedProvider::new("pollinations", vec![])),
            OrchestratorConfig::default().with_chain_mode(mode),
        )
    }

    #[test]
    fn test_empty_chain_rejected() {
        assert!(matches!(
            ProviderChain::new(Vec::new()),
            Err(OrchestratorError::EmptyChain)
        ));
    }

    #[test]
    fn test_single_mode_primary() {
        let chain = resolver(ChainMode::Single)
            .resolve(&UserPreference::new(Engine::Primary, "flux"))
            .unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.entries()[0].model, "black-forest-labs/FLUX.1-schnell");
        assert_eq!(chain.entries()[0].label, "FLUX.1 schnell");
        assert_eq!(chain.max_calls(), 3);
    }

    #[test]
    fn test_secondary_engine() {
        for mode in [ChainMode::Single, ChainMode::Failover] {
            let chain = resolver(mode)
                .resolve(&UserPreference::new(Engine::Secondary, "flux"))
                .unwrap();
            assert_eq!(chain.labels(), vec![SECONDARY_LABEL.to_string()]);
            assert_eq!(chain.max_calls(), 2);
        }
    }

    #[test]
    fn test_failover_mode_order() {
        let chain = resolver(ChainMode::Failover)
            .resolve(&UserPreference::new(Engine::Primary, "sdxl"))
            .unwrap();
        assert_eq!(
            chain.labels(),
            vec![
                "SDXL 1.0",
                "Unstable Diffusion",
                "FLUX.1 schnell",
                "SD 3.5 Large",
                SECONDARY_LABEL,
            ]
        );
        assert_eq!(chain.max_calls(), 4 * 3 + 2);
    }

    #[test]
    fn test_unknown_model_key() {
        let err = resolver(ChainMode::Single)
            .resolve(&UserPreference::new(Engine::Primary, "dalle"))
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::UnknownModel(_)));
    }
}
