//! Update processor that connects the Telegram client to the bot handlers.

use std::sync::Arc;

use futures::StreamExt;
use orchestrator::{Bot, OrchestratorError, SessionOutcome};
use telegram_client::{TelegramClient, TelegramError, Update};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::sender::TelegramSink;

/// Errors that stop the processor.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Error from the Bot API.
    #[error("telegram error: {0}")]
    Telegram(#[from] TelegramError),

    /// The update stream ended unexpectedly.
    #[error("update stream ended")]
    StreamEnded,
}

/// What an update asks the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// `/start`, `/help` or an unknown command.
    Start { user: i64, chat: i64 },
    /// `/settings`.
    Settings { user: i64, chat: i64 },
    /// Free text to draw.
    Prompt { user: i64, chat: i64, text: String },
    /// A settings button press.
    Callback {
        query_id: String,
        user: i64,
        chat: i64,
        data: String,
    },
    /// Nothing to do.
    Skip { reason: String },
}

impl Dispatch {
    fn skip(reason: impl Into<String>) -> Self {
        Self::Skip {
            reason: reason.into(),
        }
    }
}

/// Classify an update.
pub fn dispatch(update: &Update) -> Dispatch {
    if let Some(query) = &update.callback_query {
        let Some(chat) = query.message.as_ref().map(|m| m.chat.id) else {
            return Dispatch::skip("callback without message");
        };
        return Dispatch::Callback {
            query_id: query.id.clone(),
            user: query.from.id,
            chat,
            data: query.data.clone().unwrap_or_default(),
        };
    }

    let Some(message) = &update.message else {
        return Dispatch::skip("unsupported update");
    };
    let Some(from) = &message.from else {
        return Dispatch::skip("message without sender");
    };
    if from.is_bot {
        return Dispatch::skip("message from a bot");
    }
    let Some(text) = message.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        return Dispatch::skip("no text content");
    };

    let (user, chat) = (from.id, message.chat.id);
    match message.command() {
        Some("settings") => Dispatch::Settings { user, chat },
        // start, help and anything unrecognised get the greeting
        Some(_) => Dispatch::Start { user, chat },
        None => Dispatch::Prompt {
            user,
            chat,
            text: text.to_string(),
        },
    }
}

/// Receives Telegram updates and runs each one on its own task.
pub struct UpdateProcessor {
    client: TelegramClient,
    bot: Arc<Bot<TelegramSink>>,
}

impl UpdateProcessor {
    pub fn new(client: TelegramClient, bot: Bot<TelegramSink>) -> Self {
        Self {
            client,
            bot: Arc::new(bot),
        }
    }

    /// Run until `shutdown_signal` completes or the update stream ends.
    ///
    /// Sessions already running are not awaited; they end with the runtime.
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), ProcessorError>
    where
        F: std::future::Future<Output = ()> + Send,
    {
        info!("Starting update processor (graceful shutdown enabled)");

        let mut stream = Box::pin(telegram_client::subscribe(&self.client));
        tokio::pin!(shutdown_signal);

        loop {
            tokio::select! {
                biased;

                () = &mut shutdown_signal => {
                    info!("Shutdown signal received, stopping update processor");
                    return Ok(());
                }

                result = stream.next() => {
                    match result {
                        Some(Ok(update)) => {
                            let bot = self.bot.clone();
                            let client = self.client.clone();
                            tokio::spawn(async move {
                                handle_update(&bot, &client, update).await;
                            });
                        }
                        Some(Err(e)) => {
                            // The stream backs off and keeps polling
                            warn!("Polling error: {}", e);
                        }
                        None => {
                            warn!("Update stream ended");
                            return Err(ProcessorError::StreamEnded);
                        }
                    }
                }
            }
        }
    }
}

/// Handle a single update end-to-end.
pub async fn handle_update(bot: &Bot<TelegramSink>, client: &TelegramClient, update: Update) {
    let update_id = update.update_id;
    match dispatch(&update) {
        Dispatch::Start { user, chat } => {
            if let Err(e) = bot.on_start(user, chat).await {
                warn!("Failed to send greeting to {}: {}", chat, e);
            }
        }
        Dispatch::Settings { user, chat } => {
            if let Err(e) = bot.on_settings_requested(user, chat).await {
                warn!("Failed to send settings to {}: {}", chat, e);
            }
        }
        Dispatch::Prompt { user, chat, text } => match bot.on_text(user, chat, &text).await {
            Ok(report) => match report.outcome {
                SessionOutcome::Delivered { label } => {
                    info!(
                        "Delivered image from {} to {} after {} calls",
                        label,
                        user,
                        report.session.attempts.len()
                    );
                }
                SessionOutcome::Failed => {
                    info!(
                        "Generation failed for {} after {} calls",
                        user,
                        report.session.attempts.len()
                    );
                }
            },
            Err(e) => error!("Error processing prompt from {}: {}", user, e),
        },
        Dispatch::Callback {
            query_id,
            user,
            chat,
            data,
        } => {
            let toast = match bot.on_callback(user, chat, &data).await {
                Ok(confirmation) => confirmation,
                Err(OrchestratorError::InvalidAction(data)) => {
                    warn!("Ignoring unknown callback data from {}: {}", user, data);
                    String::new()
                }
                Err(e) => {
                    warn!("Settings action failed for {}: {}", user, e);
                    e.to_string()
                }
            };
            let text = (!toast.is_empty()).then_some(toast.as_str());
            if let Err(e) = client.answer_callback_query(&query_id, text).await {
                warn!("Failed to answer callback query: {}", e);
            }
        }
        Dispatch::Skip { reason } => {
            debug!("Skipping update {}: {}", update_id, reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update(value: serde_json::Value) -> Update {
        serde_json::from_value(value).unwrap()
    }

    fn text_update(text: &str) -> Update {
        update(json!({
            "update_id": 1,
            "message": {
                "message_id": 5,
                "date": 0,
                "chat": { "id": 100, "type": "private" },
                "from": { "id": 7, "is_bot": false, "first_name": "Ann" },
                "text": text
            }
        }))
    }

    #[test]
    fn test_dispatch_commands() {
        assert_eq!(
            dispatch(&text_update("/start")),
            Dispatch::Start { user: 7, chat: 100 }
        );
        assert_eq!(
            dispatch(&text_update("/help")),
            Dispatch::Start { user: 7, chat: 100 }
        );
        assert_eq!(
            dispatch(&text_update("/settings@imagine_bot")),
            Dispatch::Settings { user: 7, chat: 100 }
        );
    }

    #[test]
    fn test_unknown_command_gets_greeting() {
        assert_eq!(
            dispatch(&text_update("/draw a cat")),
            Dispatch::Start { user: 7, chat: 100 }
        );
    }

    #[test]
    fn test_dispatch_prompt() {
        assert_eq!(
            dispatch(&text_update("  a cat in space ")),
            Dispatch::Prompt {
                user: 7,
                chat: 100,
                text: "a cat in space".to_string()
            }
        );
        assert!(matches!(dispatch(&text_update("   ")), Dispatch::Skip { .. }));
    }

    #[test]
    fn test_dispatch_callback() {
        let update = update(json!({
            "update_id": 2,
            "callback_query": {
                "id": "q1",
                "from": { "id": 7, "is_bot": false, "first_name": "Ann" },
                "message": {
                    "message_id": 6,
                    "date": 0,
                    "chat": { "id": 100, "type": "private" }
                },
                "data": "model:flux"
            }
        }));

        assert_eq!(
            dispatch(&update),
            Dispatch::Callback {
                query_id: "q1".to_string(),
                user: 7,
                chat: 100,
                data: "model:flux".to_string()
            }
        );
    }

    #[test]
    fn test_dispatch_skips_bots_and_empty_updates() {
        let from_bot = update(json!({
            "update_id": 3,
            "message": {
                "message_id": 5,
                "date": 0,
                "chat": { "id": 100, "type": "private" },
                "from": { "id": 8, "is_bot": true, "first_name": "Other" },
                "text": "hi"
            }
        }));
        assert!(matches!(dispatch(&from_bot), Dispatch::Skip { .. }));

        let empty = update(json!({ "update_id": 4 }));
        assert!(matches!(dispatch(&empty), Dispatch::Skip { .. }));
    }
}
