//! Prompt translation adapter.
//!
//! [`GoogleTranslator`] converts user text to the canonical prompt language
//! through the free Google translate endpoint. Translation is best effort:
//! any failure is logged and the original text is passed through unchanged.

mod config;
mod error;
mod google;

pub use config::TranslatorConfig;
pub use error::TranslatorError;
pub use google::{parse_translation, GoogleTranslator};

pub use provider_core::Translator;
