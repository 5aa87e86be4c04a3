//! Telegram implementation of the orchestrator's status sink.

use async_trait::async_trait;
use orchestrator::{ChatId, MessageRef, OrchestratorError, SettingsMenu, StatusSink};
use telegram_client::{InlineKeyboardButton, InlineKeyboardMarkup, TelegramClient, TelegramError};
use tracing::debug;

/// File name attached to uploaded images.
const IMAGE_FILE_NAME: &str = "gen_image.png";

/// Sends status messages, menus and images through the Bot API.
#[derive(Debug, Clone)]
pub struct TelegramSink {
    client: TelegramClient,
}

impl TelegramSink {
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &TelegramClient {
        &self.client
    }
}

fn send_failed(e: TelegramError) -> OrchestratorError {
    OrchestratorError::SendFailed(e.to_string())
}

/// Render a settings menu as an inline keyboard.
pub fn keyboard(menu: &SettingsMenu) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: menu
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|button| {
                        InlineKeyboardButton::callback(&button.label, button.action.callback_data())
                    })
                    .collect()
            })
            .collect(),
    }
}

#[async_trait]
impl StatusSink for TelegramSink {
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<MessageRef, OrchestratorError> {
        let message = self
            .client
            .send_message(chat, text, None)
            .await
            .map_err(send_failed)?;
        Ok(MessageRef {
            chat: message.chat.id,
            message_id: message.message_id,
        })
    }

    async fn send_menu(
        &self,
        chat: ChatId,
        text: &str,
        menu: &SettingsMenu,
    ) -> Result<MessageRef, OrchestratorError> {
        let markup = keyboard(menu);
        let message = self
            .client
            .send_message(chat, text, Some(&markup))
            .await
            .map_err(send_failed)?;
        Ok(MessageRef {
            chat: message.chat.id,
            message_id: message.message_id,
        })
    }

    async fn edit_text(&self, message: MessageRef, text: &str) -> Result<(), OrchestratorError> {
        match self
            .client
            .edit_message_text(message.chat, message.message_id, text, None)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_modified() => {
                debug!("Status message {} already up to date", message.message_id);
                Ok(())
            }
            Err(e) => Err(send_failed(e)),
        }
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), OrchestratorError> {
        self.client
            .delete_message(message.chat, message.message_id)
            .await
            .map_err(send_failed)
    }

    async fn send_image(
        &self,
        chat: ChatId,
        image: Vec<u8>,
        caption: &str,
    ) -> Result<MessageRef, OrchestratorError> {
        let message = self
            .client
            .send_photo(chat, image, IMAGE_FILE_NAME, caption)
            .await
            .map_err(send_failed)?;
        Ok(MessageRef {
            chat: message.chat.id,
            message_id: message.message_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestrator::{Engine, MenuButton, SettingsAction};
    use telegram_client::TelegramConfig;

    #[test]
    fn test_keyboard_layout() {
        let menu = SettingsMenu::new(vec![
            vec![
                MenuButton::new("HuggingFace", SettingsAction::SetEngine(Engine::Primary)),
                MenuButton::new("Pollinations", SettingsAction::SetEngine(Engine::Secondary)),
            ],
            vec![MenuButton::new("Choose model", SettingsAction::ShowModels)],
        ]);

        let markup = keyboard(&menu);
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0][1].text, "Pollinations");
        assert_eq!(markup.inline_keyboard[0][1].callback_data, "engine:secondary");
        assert_eq!(markup.inline_keyboard[1][0].callback_data, "models");
    }

    #[tokio::test]
    async fn test_unreachable_api_is_send_failure() {
        let config = TelegramConfig::new("123:abc").with_api_url("http://127.0.0.1:9");
        let sink = TelegramSink::new(TelegramClient::new(config).unwrap());

        let err = sink.send_text(1, "hello").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::SendFailed(_)));
    }
}
