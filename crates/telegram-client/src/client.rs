//! Bot API HTTP client.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::TelegramConfig;
use crate::error::TelegramError;
use crate::types::{
    AnswerCallbackParams, ApiResponse, DeleteMessageParams, EditMessageTextParams,
    GetUpdatesParams, InlineKeyboardMarkup, Message, SendMessageParams, Update, User,
};

/// Maximum caption length accepted by `sendPhoto`.
pub const MAX_CAPTION_CHARS: usize = 1024;

/// Client for the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    config: TelegramConfig,
}

impl TelegramClient {
    /// Create a client and verify the token with `getMe`.
    pub async fn connect(config: TelegramConfig) -> Result<Self, TelegramError> {
        let client = Self::new(config)?;
        let me = client.get_me().await?;
        info!(
            "Connected to Telegram as @{} (id {})",
            me.username.as_deref().unwrap_or("<unknown>"),
            me.id
        );
        Ok(client)
    }

    /// Create a client without contacting the API.
    pub fn new(config: TelegramConfig) -> Result<Self, TelegramError> {
        if config.token.trim().is_empty() {
            return Err(TelegramError::Config("bot token is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(TelegramError::Http)?;

        Ok(Self { http, config })
    }

    /// Get the bot's own user.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call::<(), _>("getMe", None).await
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError> {
        let params = GetUpdatesParams {
            offset,
            timeout: self.config.poll_timeout.as_secs(),
            allowed_updates: vec!["message", "callback_query"],
        };
        self.call("getUpdates", Some(params)).await
    }

    /// Send a text message, optionally with an inline keyboard.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, TelegramError> {
        let params = SendMessageParams {
            chat_id,
            text,
            reply_markup,
        };
        self.call("sendMessage", Some(params)).await
    }

    /// Replace the text of a message previously sent by the bot.
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), TelegramError> {
        let params = EditMessageTextParams {
            chat_id,
            message_id,
            text,
            reply_markup,
        };
        // editMessageText returns the edited message or `true`
        let _: serde_json::Value = self.call("editMessageText", Some(params)).await?;
        Ok(())
    }

    /// Delete a message.
    pub async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError> {
        let params = DeleteMessageParams {
            chat_id,
            message_id,
        };
        let _: bool = self.call("deleteMessage", Some(params)).await?;
        Ok(())
    }

    /// Answer a callback query so the client stops its loading spinner.
    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<(), TelegramError> {
        let params = AnswerCallbackParams {
            callback_query_id,
            text,
        };
        let _: bool = self.call("answerCallbackQuery", Some(params)).await?;
        Ok(())
    }

    /// Upload a photo from memory with a caption.
    pub async fn send_photo(
        &self,
        chat_id: i64,
        image: Vec<u8>,
        file_name: &str,
        caption: &str,
    ) -> Result<Message, TelegramError> {
        let part = Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str("image/png")
            .map_err(TelegramError::Http)?;

        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", truncate_caption(caption))
            .part("photo", part);

        let url = self.config.method_url("sendPhoto");
        debug!("API call: sendPhoto (chat {})", chat_id);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(TelegramError::Http)?;

        Self::unwrap_response(response.json().await?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &TelegramConfig {
        &self.config
    }

    /// Make a JSON call to a Bot API method.
    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<P>,
    ) -> Result<R, TelegramError> {
        let url = self.config.method_url(method);
        debug!("API call: {}", method);

        let mut request = self.http.post(&url);
        if let Some(params) = params {
            request = request.json(&params);
        }

        let response = request.send().await.map_err(TelegramError::Http)?;
        let body = response.text().await.map_err(TelegramError::Http)?;
        let parsed: ApiResponse<R> = serde_json::from_str(&body)?;

        Self::unwrap_response(parsed)
    }

    fn unwrap_response<R>(response: ApiResponse<R>) -> Result<R, TelegramError> {
        if !response.ok {
            return Err(TelegramError::Api {
                code: response.error_code.unwrap_or(-1),
                description: response
                    .description
                    .unwrap_or_else(|| "API returned ok=false".to_string()),
            });
        }

        response.result.ok_or_else(|| TelegramError::Api {
            code: -1,
            description: "No result in response".to_string(),
        })
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Truncate a caption to [`MAX_CAPTION_CHARS`] characters.
pub fn truncate_caption(caption: &str) -> String {
    if caption.chars().count() <= MAX_CAPTION_CHARS {
        return caption.to_string();
    }
    let mut out: String = caption.chars().take(MAX_CAPTION_CHARS - 1).collect();
    out.push('…');
    out
}
