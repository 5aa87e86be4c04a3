//! Hugging Face inference provider.
//!
//! This crate provides the primary image backend: a templated REST endpoint
//! (`{api_url}/{model}`) called with bearer authentication and a JSON body
//! carrying the prompt plus fixed quality parameters.
//!
//! # Status mapping
//!
//! - `200` with a body - [`GenerationOutcome::Success`]
//! - `503` - [`GenerationOutcome::Loading`] (model cold start)
//! - any other status - [`GenerationOutcome::ProviderError`]
//! - transport failure - [`GenerationOutcome::NetworkError`]
//!
//! # Example
//!
//! ```rust,no_run
//! use hf_provider::{HfProvider, ImageProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = HfProvider::from_env()?;
//!     let outcome = provider
//!         .generate("nroggendorff/unstable-diffusion", "a lighthouse at dusk")
//!         .await;
//!     println!("{}", outcome.describe());
//!     Ok(())
//! }
//! ```

mod api_types;
mod config;
mod provider;

pub use config::{HfProviderConfig, HfProviderConfigBuilder};
pub use provider::{classify_response, HfProvider};

// Re-export provider-core types for convenience
pub use provider_core::{async_trait, GenerationOutcome, ImageProvider, ProviderError};
