//! Mock provider implementations for testing generation orchestration.
//!
//! This crate provides mock implementations of the provider-core traits:
//! - `ScriptedProvider` - Replays a fixed list of outcomes and records calls
//! - `DelayedProvider` - Wraps another provider with artificial delay
//! - `EchoTranslator` / `FixedTranslator` - Deterministic translators
//!
//! # Example
//!
//! ```rust
//! use mock_provider::{GenerationOutcome, ImageProvider, ScriptedProvider};
//!
//! #[tokio::main]
//! async fn main() {
//!     let provider = ScriptedProvider::new("x", vec![
//!         GenerationOutcome::Loading,
//!         GenerationOutcome::Success(vec![1, 2, 3]),
//!     ]);
//!
//!     assert_eq!(provider.generate("m", "p").await, GenerationOutcome::Loading);
//!     assert!(provider.generate("m", "p").await.is_success());
//!     assert_eq!(provider.call_count(), 2);
//! }
//! ```

mod delayed;
mod scripted;
mod translators;

pub use provider_core::{async_trait, GenerationOutcome, ImageProvider, Translator};

pub use delayed::DelayedProvider;
pub use scripted::{RecordedCall, ScriptedProvider};
pub use translators::{EchoTranslator, FixedTranslator};
