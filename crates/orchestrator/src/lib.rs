//! Generation orchestrator for the imagine bot.
//!
//! This crate provides the [`Bot`] type which turns a user's prompt into an
//! image by coordinating the translator, the image providers and the chat
//! transport.
//!
//! # Features
//!
//! - Per-user engine and model preferences
//! - Provider chains resolved from preferences, optionally with failover
//! - Retry budget with warm-up backoff per provider
//! - One status message per request, edited as work progresses
//! - Transport-neutral settings menus
//!
//! # Architecture
//!
//! ```text
//! Text message (from the transport)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                           BOT                               │
//! │                                                             │
//! │  1. Send "Starting generation..." status message            │
//! │         ↓                                                   │
//! │  2. Translate prompt (falls back to the original text)      │
//! │         ↓                                                   │
//! │  3. Resolve provider chain from user preference             │
//! │         ↓                                                   │
//! │  4. Orchestrator walks the chain:                           │
//! │     • Loading → edit status, back off, retry same provider  │
//! │     • Error   → edit status, switch to next provider        │
//! │     • Success → stop                                        │
//! │         ↓                                                   │
//! │  5. Send image and delete status, or show failure text      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use orchestrator::{Bot, ChatId, MessageRef, OrchestratorError, SettingsMenu, StatusSink};
//!
//! // Implement StatusSink for your transport
//! struct TelegramSink { /* ... */ }
//!
//! #[async_trait]
//! impl StatusSink for TelegramSink {
//!     // send_text, send_menu, edit_text, delete_message, send_image
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bot = Bot::from_env(TelegramSink { /* ... */ })?;
//!
//!     let report = bot.on_text(42, 42, "a lighthouse at dusk").await?;
//!     println!("Outcome: {:?}", report.outcome);
//!     Ok(())
//! }
//! ```

mod actions;
mod bot;
mod catalog;
mod chain;
mod config;
mod error;
mod formatting;
mod orchestrator;
mod preferences;
mod reporter;
mod sender;

// Public exports
pub use actions::{MenuButton, SettingsAction, SettingsMenu};
pub use bot::{Bot, RequestSession, SessionOutcome, SessionReport};
pub use catalog::{CatalogModel, ModelCatalog, DEFAULT_MODEL_KEY};
pub use chain::{ChainEntry, ChainResolver, ProviderChain, SECONDARY_LABEL};
pub use config::{ChainMode, OrchestratorConfig, RetryPolicy};
pub use error::OrchestratorError;
pub use formatting::{FAILURE_TEXT, INITIAL_ACK_TEXT, START_TEXT};
pub use orchestrator::{
    AttemptRecord, GenerationReport, GenerationResult, NoOpListener, Orchestrator, ProgressEvent,
    ProgressListener,
};
pub use preferences::{Engine, PreferenceStore, UserId, UserPreference};
pub use reporter::StatusReporter;
pub use sender::{ChatId, LoggingSink, MessageRef, NoOpSink, RecordingSink, SinkEvent, StatusSink};

// Re-export commonly used types from dependencies
pub use provider_core::{GenerationOutcome, ImageProvider, OutcomeKind, Translator};
