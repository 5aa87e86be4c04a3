//! Deterministic translators.

use provider_core::{async_trait, Translator};

/// Returns the input unchanged, as a failed translation would.
#[derive(Debug, Clone, Default)]
pub struct EchoTranslator;

#[async_trait]
impl Translator for EchoTranslator {
    async fn translate(&self, text: &str) -> String {
        text.to_string()
    }

    fn name(&self) -> &str {
        "EchoTranslator"
    }
}

/// Always returns the same translation.
#[derive(Debug, Clone)]
pub struct FixedTranslator {
    output: String,
}

impl FixedTranslator {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

#[async_trait]
impl Translator for FixedTranslator {
    async fn translate(&self, _text: &str) -> String {
        self.output.clone()
    }

    fn name(&self) -> &str {
        "FixedTranslator"
    }
}
