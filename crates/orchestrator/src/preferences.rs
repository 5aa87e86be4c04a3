//! Per-user engine and model preferences.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::catalog::ModelCatalog;
use crate::error::OrchestratorError;

/// Transport-level user identifier.
pub type UserId = i64;

/// Which inference engine serves a user's requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    /// Model-selectable engine backed by the model catalog.
    #[default]
    Primary,
    /// Fixed fallback engine with a single implicit model.
    Secondary,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

/// A user's current settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPreference {
    pub engine: Engine,
    /// Catalog key; only meaningful when `engine` is [`Engine::Primary`].
    pub model_key: String,
}

impl UserPreference {
    pub fn new(engine: Engine, model_key: impl Into<String>) -> Self {
        Self {
            engine,
            model_key: model_key.into(),
        }
    }
}

/// Preference storage for generation settings.
///
/// Thread-safe in-memory map from user IDs to their preferences. Entries
/// are created with the catalog default on first access and live for the
/// lifetime of the process.
pub struct PreferenceStore {
    preferences: RwLock<HashMap<UserId, UserPreference>>,
    catalog: Arc<ModelCatalog>,
}

impl PreferenceStore {
    pub fn new(catalog: Arc<ModelCatalog>) -> Self {
        Self {
            preferences: RwLock::new(HashMap::new()),
            catalog,
        }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    fn default_preference(&self) -> UserPreference {
        UserPreference::new(Engine::Primary, self.catalog.default_key())
    }

    /// Get the preference for a user, creating the default entry if absent.
    pub async fn get(&self, user: UserId) -> UserPreference {
        if let Some(pref) = self.preferences.read().await.get(&user) {
            return pref.clone();
        }

        self.preferences
            .write()
            .await
            .entry(user)
            .or_insert_with(|| {
                debug!("Creating default preference for user {}", user);
                self.default_preference()
            })
            .clone()
    }

    /// Switch the engine, keeping the selected model.
    pub async fn set_engine(&self, user: UserId, engine: Engine) -> UserPreference {
        let mut preferences = self.preferences.write().await;
        let pref = preferences
            .entry(user)
            .or_insert_with(|| self.default_preference());
        pref.engine = engine;
        pref.clone()
    }

    /// Select a catalog model. Selecting a model also switches to the primary engine.
    pub async fn set_model(
        &self,
        user: UserId,
        model_key: &str,
    ) -> Result<UserPreference, OrchestratorError> {
        if !self.catalog.contains(model_key) {
            return Err(OrchestratorError::UnknownModel(model_key.to_string()));
        }

        let mut preferences = self.preferences.write().await;
        let pref = preferences
            .entry(user)
            .or_insert_with(|| self.default_preference());
        pref.engine = Engine::Primary;
        pref.model_key = model_key.to_string();
        Ok(pref.clone())
    }

    /// Number of users with a stored preference.
    pub async fn len(&self) -> usize {
        self.preferences.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.preferences.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PreferenceStore {
        PreferenceStore::new(Arc::new(ModelCatalog::default()))
    }

    #[tokio::test]
    async fn test_preference_store_default() {
        let store = store();
        assert!(store.is_empty().await);

        let pref = store.get(1).await;
        assert_eq!(pref, UserPreference::new(Engine::Primary, "unstable"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_set_engine_keeps_model() {
        let store = store();
        store.set_model(1, "flux").await.unwrap();
        let pref = store.set_engine(1, Engine::Secondary).await;
        assert_eq!(pref.engine, Engine::Secondary);
        assert_eq!(pref.model_key, "flux");

        // Other users keep the default
        assert_eq!(store.get(2).await.engine, Engine::Primary);
    }

    #[tokio::test]
    async fn test_set_model_forces_primary() {
        let store = store();
        store.set_engine(1, Engine::Secondary).await;

        let pref = store.set_model(1, "sdxl").await.unwrap();
        assert_eq!(pref, UserPreference::new(Engine::Primary, "sdxl"));
        assert_eq!(store.get(1).await, pref);
    }

    #[tokio::test]
    async fn test_set_model_rejects_unknown_key() {
        let store = store();
        let err = store.set_model(1, "dalle").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::UnknownModel(_)));
        assert_eq!(store.get(1).await.model_key, "unstable");
    }
}
