//! Pollinations image provider.
//!
//! The secondary backend needs no credentials and no model selection: the
//! prompt is embedded in the request path and fixed query parameters pin
//! the dimensions, seed and watermark setting. It has no warm-up signal,
//! so any non-`200` status is a [`GenerationOutcome::ProviderError`].

mod config;
mod provider;

pub use config::PollinationsConfig;
pub use provider::{classify_response, PollinationsProvider};

pub use provider_core::{async_trait, GenerationOutcome, ImageProvider, ProviderError};
