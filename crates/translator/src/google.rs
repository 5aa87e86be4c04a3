//! Translator backed by the free Google translate endpoint.

use provider_core::{async_trait, Translator};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::TranslatorConfig;
use crate::error::TranslatorError;

/// Best-effort translator with pass-through fallback.
pub struct GoogleTranslator {
    client: Client,
    config: TranslatorConfig,
}

impl GoogleTranslator {
    /// Create a new translator.
    pub fn new(config: TranslatorConfig) -> Result<Self, TranslatorError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Create a translator from environment variables.
    pub fn from_env() -> Result<Self, TranslatorError> {
        Self::new(TranslatorConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Make one translation attempt, surfacing any failure.
    pub async fn try_translate(&self, text: &str) -> Result<String, TranslatorError> {
        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", self.config.target_lang.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslatorError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        parse_translation(&body)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str) -> String {
        match self.try_translate(text).await {
            Ok(translated) => {
                debug!("Translated '{}' -> '{}'", text, translated);
                translated
            }
            Err(e) => {
                warn!("Translation failed, using original text: {}", e);
                text.to_string()
            }
        }
    }

    fn name(&self) -> &str {
        "GoogleTranslator"
    }
}

/// Extract the translated text from a `translate_a/single` response.
///
/// The body is a nested array whose first element lists sentence segments;
/// the translated text of each segment is its first element.
pub fn parse_translation(body: &Value) -> Result<String, TranslatorError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslatorError::Parse("missing segment list".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    let translated = translated.trim();
    if translated.is_empty() {
        return Err(TranslatorError::Empty);
    }
    Ok(translated.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_parse_single_segment() {
        let body = json!([[["a cat in space", "кот в космосе", null, null, 10]], null, "ru"]);
        assert_eq!(parse_translation(&body).unwrap(), "a cat in space");
    }

    #[test]
    fn test_parse_joins_segments() {
        let body = json!([
            [["A red fox. ", "Рыжая лиса. ", null], ["Snow.", "Снег.", null]],
            null,
            "ru"
        ]);
        assert_eq!(parse_translation(&body).unwrap(), "A red fox. Snow.");
    }

    #[test]
    fn test_parse_rejects_unexpected_shape() {
        let body = json!({"error": "nope"});
        assert!(matches!(
            parse_translation(&body),
            Err(TranslatorError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty() {
        let body = json!([[["  ", "", null]], null, "ru"]);
        assert!(matches!(parse_translation(&body), Err(TranslatorError::Empty)));
    }

    #[tokio::test]
    async fn test_failure_passes_original_text_through() {
        let config = TranslatorConfig {
            api_url: "http://127.0.0.1:9/translate".to_string(),
            timeout: Duration::from_secs(5),
            ..Default::default()
        };
        let translator = GoogleTranslator::new(config).unwrap();

        assert!(translator.try_translate("кот").await.is_err());
        assert_eq!(translator.translate("кот").await, "кот");
    }
}
