//! Model catalog for the primary inference engine.
//!
//! The catalog maps short user-facing keys to provider model identifiers
//! and display labels. Insertion order is preserved so menus and failover
//! chains list models in the same order every time.

use indexmap::IndexMap;

use crate::error::OrchestratorError;

/// Key of the model used when nothing else is configured.
pub const DEFAULT_MODEL_KEY: &str = "unstable";

/// A single model available on the primary engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogModel {
    /// Provider-specific model identifier (e.g. `black-forest-labs/FLUX.1-schnell`).
    pub id: String,
    /// Human-readable label shown in status messages and menus.
    pub label: String,
}

/// Ordered, immutable mapping from model key to [`CatalogModel`].
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: IndexMap<String, CatalogModel>,
    default_key: String,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        let models = builtin_models();
        Self {
            models,
            default_key: DEFAULT_MODEL_KEY.to_string(),
        }
    }
}

fn builtin_models() -> IndexMap<String, CatalogModel> {
    [
        ("unstable", "nroggendorff/unstable-diffusion", "Unstable Diffusion"),
        ("flux", "black-forest-labs/FLUX.1-schnell", "FLUX.1 schnell"),
        ("sdxl", "stabilityai/stable-diffusion-xl-base-1.0", "SDXL 1.0"),
        ("sd35", "stabilityai/stable-diffusion-3.5-large", "SD 3.5 Large"),
    ]
    .into_iter()
    .map(|(key, id, label)| {
        (
            key.to_string(),
            CatalogModel {
                id: id.to_string(),
                label: label.to_string(),
            },
        )
    })
    .collect()
}

impl ModelCatalog {
    /// Build a catalog from `(key, id, label)` entries.
    ///
    /// Fails if there are no entries or the default key is not among them.
    pub fn new<K, I, L>(
        entries: impl IntoIterator<Item = (K, I, L)>,
        default_key: impl Into<String>,
    ) -> Result<Self, OrchestratorError>
    where
        K: Into<String>,
        I: Into<String>,
        L: Into<String>,
    {
        let models: IndexMap<String, CatalogModel> = entries
            .into_iter()
            .map(|(key, id, label)| {
                (
                    key.into(),
                    CatalogModel {
                        id: id.into(),
                        label: label.into(),
                    },
                )
            })
            .collect();

        if models.is_empty() {
            return Err(OrchestratorError::Configuration(
                "model catalog has no entries".to_string(),
            ));
        }

        let default_key = default_key.into();
        if !models.contains_key(&default_key) {
            return Err(OrchestratorError::UnknownModel(default_key));
        }

        Ok(Self {
            models,
            default_key,
        })
    }

    /// The built-in catalog with a different default model.
    pub fn with_default(default_key: impl Into<String>) -> Result<Self, OrchestratorError> {
        let default_key = default_key.into();
        let models = builtin_models();
        if !models.contains_key(&default_key) {
            return Err(OrchestratorError::UnknownModel(default_key));
        }
        Ok(Self {
            models,
            default_key,
        })
    }

    /// Create from environment variables.
    ///
    /// Environment variables:
    /// - `DEFAULT_MODEL` - Catalog key used for new users (default: `unstable`)
    pub fn from_env() -> Result<Self, OrchestratorError> {
        match std::env::var("DEFAULT_MODEL") {
            Ok(key) if !key.trim().is_empty() => Self::with_default(key.trim()),
            _ => Ok(Self::default()),
        }
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    pub fn get(&self, key: &str) -> Option<&CatalogModel> {
        self.models.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.models.contains_key(key)
    }

    /// Iterate over `(key, model)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogModel)> {
        self.models.iter().map(|(key, model)| (key.as_str(), model))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
