//! Core traits and types for image provider implementations.
//!
//! This crate provides the shared interface for every inference backend
//! and translation adapter used by the imagine bot. It defines:
//!
//! - [`ImageProvider`] - The trait every text-to-image backend implements
//! - [`GenerationOutcome`] - The tagged result of a single provider call
//! - [`Translator`] - The prompt translation adapter
//! - [`ProviderError`] - Construction and configuration errors
//!
//! # Example
//!
//! ```rust
//! use provider_core::{async_trait, GenerationOutcome, ImageProvider};
//!
//! struct SolidColor;
//!
//! #[async_trait]
//! impl ImageProvider for SolidColor {
//!     async fn generate(&self, _model: &str, _prompt: &str) -> GenerationOutcome {
//!         GenerationOutcome::Success(vec![0xff, 0x00, 0x00])
//!     }
//!
//!     fn name(&self) -> &str {
//!         "SolidColor"
//!     }
//! }
//! ```

mod error;
mod outcome;
mod trait_def;

pub use error::ProviderError;
pub use outcome::{truncate_detail, GenerationOutcome, OutcomeKind, MAX_DETAIL_CHARS};
pub use trait_def::{ImageProvider, Translator};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
