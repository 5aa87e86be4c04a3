//! Entry points invoked by the transport for each kind of update.

use std::sync::Arc;

use hf_provider::HfProvider;
use pollinations_provider::PollinationsProvider;
use provider_core::{ImageProvider, Translator};
use tracing::{debug, info, warn};
use translator::GoogleTranslator;

use crate::actions::SettingsAction;
use crate::catalog::ModelCatalog;
use crate::chain::ChainResolver;
use crate::config::OrchestratorConfig;
use crate::error::OrchestratorError;
use crate::formatting::{self, START_TEXT};
use crate::orchestrator::{AttemptRecord, GenerationResult, Orchestrator};
use crate::preferences::{PreferenceStore, UserId, UserPreference};
use crate::reporter::StatusReporter;
use crate::sender::{ChatId, StatusSink};

/// Everything that happened while serving one text message.
#[derive(Debug, Clone)]
pub struct RequestSession {
    pub user: UserId,
    pub raw_text: String,
    pub translated_text: String,
    /// Labels of the providers in the resolved chain.
    pub chain: Vec<String>,
    pub attempts: Vec<AttemptRecord>,
}

/// Final state of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// An image was generated and sent.
    Delivered { label: String },
    /// No provider produced an image; the failure text was shown.
    Failed,
}

/// Result of [`Bot::on_text`].
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub session: RequestSession,
    pub outcome: SessionOutcome,
}

/// The image bot.
///
/// The bot:
/// - Translates each prompt before generation
/// - Resolves a provider chain from the user's settings
/// - Walks the chain with retries and failover
/// - Keeps one status message per request up to date
/// - Serves the settings menu and applies button presses
pub struct Bot<S: StatusSink> {
    translator: Arc<dyn Translator>,
    preferences: PreferenceStore,
    resolver: ChainResolver,
    orchestrator: Orchestrator,
    sink: S,
}

impl<S: StatusSink> Bot<S> {
    /// Create a bot from its components.
    pub fn new(
        catalog: Arc<ModelCatalog>,
        primary: Arc<dyn ImageProvider>,
        secondary: Arc<dyn ImageProvider>,
        translator: Arc<dyn Translator>,
        config: OrchestratorConfig,
        sink: S,
    ) -> Self {
        Self {
            translator,
            preferences: PreferenceStore::new(catalog.clone()),
            resolver: ChainResolver::new(catalog, primary, secondary, config),
            orchestrator: Orchestrator::new(),
            sink,
        }
    }

    /// Create a bot from environment variables.
    ///
    /// This creates the providers, the translator and the model catalog from
    /// environment. Fails if `HF_TOKEN` is missing or `DEFAULT_MODEL` is not
    /// a catalog key.
    pub fn from_env(sink: S) -> Result<Self, OrchestratorError> {
        let catalog = Arc::new(ModelCatalog::from_env()?);
        let config = OrchestratorConfig::from_env()?;
        let primary = Arc::new(HfProvider::from_env()?);
        let secondary = Arc::new(PollinationsProvider::from_env()?);
        let translator = Arc::new(GoogleTranslator::from_env()?);

        info!(
            "Bot configured: default model '{}', chain mode {:?}",
            catalog.default_key(),
            config.chain_mode
        );

        Ok(Self::new(catalog, primary, secondary, translator, config, sink))
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    /// Handle `/start` and `/help`.
    pub async fn on_start(&self, user: UserId, chat: ChatId) -> Result<(), OrchestratorError> {
        self.preferences.get(user).await;
        self.sink.send_text(chat, START_TEXT).await?;
        Ok(())
    }

    /// Handle `/settings`: show the current engine and model with the settings menu.
    pub async fn on_settings_requested(
        &self,
        user: UserId,
        chat: ChatId,
    ) -> Result<(), OrchestratorError> {
        let preference = self.preferences.get(user).await;
        let text = formatting::settings_text(&preference, self.preferences.catalog());
        self.sink
            .send_menu(chat, &text, &formatting::settings_menu(&preference))
            .await?;
        Ok(())
    }

    /// Handle a prompt: translate, generate and deliver.
    pub async fn on_text(
        &self,
        user: UserId,
        chat: ChatId,
        text: &str,
    ) -> Result<SessionReport, OrchestratorError> {
        info!("Generation request from {}: {} chars", user, text.len());
        let reporter = StatusReporter::open(&self.sink, chat).await;

        let translated = self.translator.translate(text).await;
        if translated != text {
            debug!("Translated prompt: {}", translated);
        }

        let preference = self.preferences.get(user).await;
        let chain = match self.resolver.resolve(&preference) {
            Ok(chain) => chain,
            Err(e) => {
                warn!("Failed to resolve provider chain for {}: {}", user, e);
                reporter.finish_failure().await;
                return Err(e);
            }
        };

        let report = self.orchestrator.run(&chain, &translated, &reporter).await;

        let outcome = match report.result {
            GenerationResult::Success { image, label } => {
                reporter.finish_success(image, &label, &translated).await?;
                SessionOutcome::Delivered { label }
            }
            GenerationResult::Exhausted { last_failure } => {
                warn!(
                    "Generation failed for {} after {} calls: {}",
                    user,
                    report.attempts.len(),
                    last_failure.as_deref().unwrap_or("no attempts")
                );
                reporter.finish_failure().await;
                SessionOutcome::Failed
            }
        };

        Ok(SessionReport {
            session: RequestSession {
                user,
                raw_text: text.to_string(),
                translated_text: translated,
                chain: chain.labels(),
                attempts: report.attempts,
            },
            outcome,
        })
    }

    /// Handle a settings button press.
    ///
    /// Returns a short confirmation suitable for a callback acknowledgment.
    pub async fn on_callback(
        &self,
        user: UserId,
        chat: ChatId,
        data: &str,
    ) -> Result<String, OrchestratorError> {
        let action = SettingsAction::parse(data)?;
        debug!("Settings action from {}: {}", user, action);

        match action {
            SettingsAction::SetEngine(engine) => {
                let preference = self.preferences.set_engine(user, engine).await;
                let confirmation = formatting::engine_confirmation(engine);
                self.send_confirmation(chat, &confirmation, &preference).await?;
                Ok(confirmation)
            }
            SettingsAction::ShowModels => {
                let preference = self.preferences.get(user).await;
                self.sink
                    .send_menu(
                        chat,
                        formatting::MODELS_TEXT,
                        &formatting::models_menu(&preference, self.preferences.catalog()),
                    )
                    .await?;
                Ok(String::new())
            }
            SettingsAction::SetModel(key) => {
                let preference = self.preferences.set_model(user, &key).await?;
                let label = formatting::model_label(&preference, self.preferences.catalog());
                let confirmation = formatting::model_confirmation(label);
                self.send_confirmation(chat, &confirmation, &preference).await?;
                Ok(confirmation)
            }
        }
    }

    async fn send_confirmation(
        &self,
        chat: ChatId,
        confirmation: &str,
        preference: &UserPreference,
    ) -> Result<(), OrchestratorError> {
        let text = format!(
            "✅ {}\n\n{}",
            confirmation,
            formatting::settings_text(preference, self.preferences.catalog())
        );
        self.sink.send_text(chat, &text).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use mock_provider::{
        DelayedProvider, EchoTranslator, FixedTranslator, GenerationOutcome, ScriptedProvider,
    };

    use translator::{GoogleTranslator, TranslatorConfig};

    use crate::config::{ChainMode, RetryPolicy};
    use crate::formatting::{FAILURE_TEXT, INITIAL_ACK_TEXT};
    use crate::preferences::Engine;
    use crate::sender::{RecordingSink, SinkEvent};

    fn config(mode: ChainMode) -> OrchestratorConfig {
        OrchestratorConfig {
            chain_mode: mode,
            primary_policy: RetryPolicy::new(3, Duration::ZERO),
            secondary_policy: RetryPolicy::new(2, Duration::ZERO),
        }
    }

    fn bot(
        primary: &Arc<ScriptedProvider>,
        secondary: &Arc<ScriptedProvider>,
        translator: Arc<dyn Translator>,
        mode: ChainMode,
    ) -> Bot<RecordingSink> {
        Bot::new(
            Arc::new(ModelCatalog::default()),
            primary.clone(),
            secondary.clone(),
            translator,
            config(mode),
            RecordingSink::new(),
        )
    }

    fn png() -> GenerationOutcome {
        GenerationOutcome::Success(vec![0x89, 0x50, 0x4e, 0x47])
    }

    #[tokio::test]
    async fn test_warmup_then_delivered() {
        let hf = Arc::new(ScriptedProvider::new(
            "hf",
            vec![GenerationOutcome::Loading, GenerationOutcome::Loading, png()],
        ));
        let pollinations = Arc::new(ScriptedProvider::new("pollinations", vec![]));
        let bot = bot(&hf, &pollinations, Arc::new(EchoTranslator), ChainMode::Single);

        let report = bot.on_text(1, 10, "a cat").await.unwrap();

        assert_eq!(
            report.outcome,
            SessionOutcome::Delivered {
                label: "Unstable Diffusion".to_string()
            }
        );
        assert_eq!(report.session.attempts.len(), 3);
        assert_eq!(report.session.attempts.iter().filter(|a| a.backed_off).count(), 2);
        assert_eq!(pollinations.call_count(), 0);

        let events = bot.sink().events().await;
        let images: Vec<&SinkEvent> = events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Image { .. }))
            .collect();
        assert_eq!(images.len(), 1);
        assert!(matches!(events.last(), Some(SinkEvent::Delete { .. })));

        let edits = bot.sink().edited_texts().await;
        assert!(edits.contains(
            &"⏳ Unstable Diffusion is warming up on the server... retrying (1/3)".to_string()
        ));
    }

    #[tokio::test]
    async fn test_failover_to_secondary() {
        let hf = Arc::new(ScriptedProvider::new(
            "hf",
            vec![GenerationOutcome::provider_error(500, "internal error"); 4],
        ));
        let pollinations = Arc::new(ScriptedProvider::new("pollinations", vec![png()]));
        let bot = bot(&hf, &pollinations, Arc::new(EchoTranslator), ChainMode::Failover);

        let report = bot.on_text(1, 10, "a cat").await.unwrap();

        assert_eq!(
            report.outcome,
            SessionOutcome::Delivered {
                label: "Pollinations".to_string()
            }
        );
        // One call per catalog model, then the secondary engine
        assert_eq!(hf.call_count(), 4);
        assert_eq!(pollinations.call_count(), 1);
        assert_eq!(report.session.chain.len(), 5);
        assert!(report.session.attempts.iter().all(|a| !a.backed_off));
    }

    #[tokio::test]
    async fn test_secondary_exhausted_shows_failure() {
        let hf = Arc::new(ScriptedProvider::new("hf", vec![]));
        let pollinations = Arc::new(ScriptedProvider::new(
            "pollinations",
            vec![GenerationOutcome::Loading, GenerationOutcome::Loading],
        ));
        let bot = bot(&hf, &pollinations, Arc::new(EchoTranslator), ChainMode::Single);
        bot.preferences().set_engine(1, Engine::Secondary).await;

        let report = bot.on_text(1, 10, "a cat").await.unwrap();

        assert_eq!(report.outcome, SessionOutcome::Failed);
        assert_eq!(pollinations.call_count(), 2);
        assert_eq!(hf.call_count(), 0);

        let edits = bot.sink().edited_texts().await;
        assert_eq!(edits.last().map(String::as_str), Some(FAILURE_TEXT));
        let events = bot.sink().events().await;
        assert!(!events.iter().any(|e| matches!(e, SinkEvent::Delete { .. })));
        assert!(!events.iter().any(|e| matches!(e, SinkEvent::Image { .. })));
    }

    #[tokio::test]
    async fn test_translation_used_for_generation_and_caption() {
        let hf = Arc::new(ScriptedProvider::new("hf", vec![png()]));
        let pollinations = Arc::new(ScriptedProvider::new("pollinations", vec![]));
        let bot = bot(
            &hf,
            &pollinations,
            Arc::new(FixedTranslator::new("a red cat")),
            ChainMode::Single,
        );

        let report = bot.on_text(1, 10, "рыжий кот").await.unwrap();

        assert_eq!(report.session.raw_text, "рыжий кот");
        assert_eq!(report.session.translated_text, "a red cat");
        assert_eq!(hf.calls().await[0].prompt, "a red cat");

        let events = bot.sink().events().await;
        assert!(events.iter().any(|e| matches!(
            e,
            SinkEvent::Image { caption, .. } if caption == "✨ Done with Unstable Diffusion: a red cat"
        )));
        // Progress starts with the first attempt; the prompt shows up in the caption
        assert_eq!(
            bot.sink().edited_texts().await.first().map(String::as_str),
            Some("🎨 Drawing with Unstable Diffusion (attempt 1/3)...")
        );
    }

    #[tokio::test]
    async fn test_translation_failure_passes_raw_text() {
        let hf = Arc::new(ScriptedProvider::new("hf", vec![png()]));
        let pollinations = Arc::new(ScriptedProvider::new("pollinations", vec![]));
        let translator = GoogleTranslator::new(TranslatorConfig {
            api_url: "http://127.0.0.1:9/translate_a/single".to_string(),
            timeout: Duration::from_secs(5),
            ..Default::default()
        })
        .unwrap();
        let bot = bot(&hf, &pollinations, Arc::new(translator), ChainMode::Single);

        let report = bot.on_text(1, 10, "рыжий кот").await.unwrap();

        assert_eq!(report.session.translated_text, report.session.raw_text);
        assert_eq!(hf.calls().await[0].prompt, "рыжий кот");
        assert_eq!(
            report.outcome,
            SessionOutcome::Delivered {
                label: "Unstable Diffusion".to_string()
            }
        );
        assert!(!bot
            .sink()
            .edited_texts()
            .await
            .iter()
            .any(|text| text.starts_with("⌛ Generating")));
    }

    #[tokio::test]
    async fn test_status_message_is_first_event() {
        let hf = Arc::new(ScriptedProvider::new("hf", vec![png()]));
        let pollinations = Arc::new(ScriptedProvider::new("pollinations", vec![]));
        let bot = bot(&hf, &pollinations, Arc::new(EchoTranslator), ChainMode::Single);

        bot.on_text(1, 10, "a cat").await.unwrap();

        let events = bot.sink().events().await;
        assert!(matches!(
            &events[0],
            SinkEvent::Text { text, .. } if text == INITIAL_ACK_TEXT
        ));
    }

    #[tokio::test]
    async fn test_model_selection_via_callbacks() {
        let hf = Arc::new(ScriptedProvider::new("hf", vec![png()]));
        let pollinations = Arc::new(ScriptedProvider::new("pollinations", vec![]));
        let bot = bot(&hf, &pollinations, Arc::new(EchoTranslator), ChainMode::Single);

        bot.on_callback(1, 10, "engine:secondary").await.unwrap();
        assert_eq!(bot.preferences().get(1).await.engine, Engine::Secondary);

        bot.on_callback(1, 10, "models").await.unwrap();
        let confirmation = bot.on_callback(1, 10, "model:flux").await.unwrap();
        assert_eq!(confirmation, "Model set to FLUX.1 schnell");

        let preference = bot.preferences().get(1).await;
        assert_eq!(preference.engine, Engine::Primary);
        assert_eq!(preference.model_key, "flux");

        bot.on_text(1, 10, "a cat").await.unwrap();
        assert_eq!(hf.calls().await[0].model, "black-forest-labs/FLUX.1-schnell");
    }

    #[tokio::test]
    async fn test_invalid_callback_data() {
        let hf = Arc::new(ScriptedProvider::new("hf", vec![]));
        let pollinations = Arc::new(ScriptedProvider::new("pollinations", vec![]));
        let bot = bot(&hf, &pollinations, Arc::new(EchoTranslator), ChainMode::Single);

        let err = bot.on_callback(1, 10, "engine:dalle").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::InvalidAction(_)));

        let err = bot.on_callback(1, 10, "model:dalle").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::UnknownModel(_)));
        assert_eq!(bot.preferences().get(1).await.model_key, "unstable");
    }

    #[tokio::test]
    async fn test_start_and_settings() {
        let hf = Arc::new(ScriptedProvider::new("hf", vec![]));
        let pollinations = Arc::new(ScriptedProvider::new("pollinations", vec![]));
        let bot = bot(&hf, &pollinations, Arc::new(EchoTranslator), ChainMode::Single);

        bot.on_start(1, 10).await.unwrap();
        bot.on_settings_requested(1, 10).await.unwrap();

        assert_eq!(bot.sink().sent_texts().await, vec![START_TEXT]);
        let events = bot.sink().events().await;
        assert!(matches!(
            &events[1],
            SinkEvent::Menu { text, menu, .. }
                if text.contains("Unstable Diffusion") && menu.buttons().count() == 3
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_sessions_for_same_user() {
        let hf = Arc::new(DelayedProvider::with_millis(
            ScriptedProvider::always_success("hf", vec![1, 2, 3], 2),
            50,
        ));
        let pollinations = Arc::new(ScriptedProvider::new("pollinations", vec![]));
        let bot = Arc::new(Bot::new(
            Arc::new(ModelCatalog::default()),
            hf.clone(),
            pollinations,
            Arc::new(EchoTranslator),
            config(ChainMode::Single),
            RecordingSink::new(),
        ));

        let first = tokio::spawn({
            let bot = bot.clone();
            async move { bot.on_text(1, 10, "a cat").await }
        });
        let second = tokio::spawn({
            let bot = bot.clone();
            async move { bot.on_text(1, 10, "a dog").await }
        });

        assert!(matches!(
            first.await.unwrap().unwrap().outcome,
            SessionOutcome::Delivered { .. }
        ));
        assert!(matches!(
            second.await.unwrap().unwrap().outcome,
            SessionOutcome::Delivered { .. }
        ));
        assert_eq!(hf.inner().call_count(), 2);

        // Each session owns its own status message
        let deletes = bot
            .sink()
            .events()
            .await
            .into_iter()
            .filter(|e| matches!(e, SinkEvent::Delete { .. }))
            .count();
        assert_eq!(deletes, 2);
    }
}
