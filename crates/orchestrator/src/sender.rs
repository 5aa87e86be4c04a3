//! Status sink trait and implementations.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::actions::SettingsMenu;
use crate::error::OrchestratorError;

/// Transport-level chat identifier.
pub type ChatId = i64;

/// Handle to a message previously sent through a [`StatusSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat: ChatId,
    pub message_id: i64,
}

/// Trait for delivering texts, menus and images to a chat.
///
/// Abstracted to support different transports (Telegram, tests, etc.)
#[async_trait]
pub trait StatusSink: Send + Sync {
    /// Send a plain text message.
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<MessageRef, OrchestratorError>;

    /// Send a text message with a button menu attached.
    async fn send_menu(
        &self,
        chat: ChatId,
        text: &str,
        menu: &SettingsMenu,
    ) -> Result<MessageRef, OrchestratorError>;

    /// Replace the text of a previously sent message.
    async fn edit_text(&self, message: MessageRef, text: &str) -> Result<(), OrchestratorError>;

    /// Delete a previously sent message.
    async fn delete_message(&self, message: MessageRef) -> Result<(), OrchestratorError>;

    /// Send an image with a caption.
    async fn send_image(
        &self,
        chat: ChatId,
        image: Vec<u8>,
        caption: &str,
    ) -> Result<MessageRef, OrchestratorError>;
}

/// A no-op sink for testing that discards everything.
#[derive(Debug, Default)]
pub struct NoOpSink {
    next_id: AtomicI64,
}

impl NoOpSink {
    fn next_ref(&self, chat: ChatId) -> MessageRef {
        MessageRef {
            chat,
            message_id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }
}

#[async_trait]
impl StatusSink for NoOpSink {
    async fn send_text(&self, chat: ChatId, _text: &str) -> Result<MessageRef, OrchestratorError> {
        Ok(self.next_ref(chat))
    }

    async fn send_menu(
        &self,
        chat: ChatId,
        _text: &str,
        _menu: &SettingsMenu,
    ) -> Result<MessageRef, OrchestratorError> {
        Ok(self.next_ref(chat))
    }

    async fn edit_text(&self, _message: MessageRef, _text: &str) -> Result<(), OrchestratorError> {
        Ok(())
    }

    async fn delete_message(&self, _message: MessageRef) -> Result<(), OrchestratorError> {
        Ok(())
    }

    async fn send_image(
        &self,
        chat: ChatId,
        _image: Vec<u8>,
        _caption: &str,
    ) -> Result<MessageRef, OrchestratorError> {
        Ok(self.next_ref(chat))
    }
}

/// A logging sink for debugging that logs all operations.
#[derive(Debug, Default)]
pub struct LoggingSink {
    inner: NoOpSink,
}

#[async_trait]
impl StatusSink for LoggingSink {
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<MessageRef, OrchestratorError> {
        tracing::info!("[{}] Sending text: {}", chat, text);
        self.inner.send_text(chat, text).await
    }

    async fn send_menu(
        &self,
        chat: ChatId,
        text: &str,
        menu: &SettingsMenu,
    ) -> Result<MessageRef, OrchestratorError> {
        tracing::info!(
            "[{}] Sending menu ({} buttons): {}",
            chat,
            menu.buttons().count(),
            text
        );
        self.inner.send_menu(chat, text, menu).await
    }

    async fn edit_text(&self, message: MessageRef, text: &str) -> Result<(), OrchestratorError> {
        tracing::info!("[{}] Editing message {}: {}", message.chat, message.message_id, text);
        Ok(())
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), OrchestratorError> {
        tracing::info!("[{}] Deleting message {}", message.chat, message.message_id);
        Ok(())
    }

    async fn send_image(
        &self,
        chat: ChatId,
        image: Vec<u8>,
        caption: &str,
    ) -> Result<MessageRef, OrchestratorError> {
        tracing::info!("[{}] Sending image ({} bytes): {}", chat, image.len(), caption);
        self.inner.send_image(chat, image, caption).await
    }
}

/// An operation observed by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Text { message: MessageRef, text: String },
    Menu { message: MessageRef, text: String, menu: SettingsMenu },
    Edit { message: MessageRef, text: String },
    Delete { message: MessageRef },
    Image { message: MessageRef, bytes: usize, caption: String },
}

/// A sink that records every operation, with optional failure injection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    ids: NoOpSink,
    events: Mutex<Vec<SinkEvent>>,
    fail_sends: bool,
    fail_edits: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `send_text` fail, as if the chat could not be reached.
    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    /// Make `edit_text` fail.
    pub fn failing_edits(mut self) -> Self {
        self.fail_edits = true;
        self
    }

    pub async fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().await.clone()
    }

    /// Texts sent as new messages, in order.
    pub async fn sent_texts(&self) -> Vec<String> {
        self.events
            .lock()
            .await
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Texts applied through edits, in order.
    pub async fn edited_texts(&self) -> Vec<String> {
        self.events
            .lock()
            .await
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Edit { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    async fn record(&self, event: SinkEvent) {
        self.events.lock().await.push(event);
    }
}

#[async_trait]
impl StatusSink for RecordingSink {
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<MessageRef, OrchestratorError> {
        if self.fail_sends {
            return Err(OrchestratorError::SendFailed("chat unreachable".to_string()));
        }
        let message = self.ids.next_ref(chat);
        self.record(SinkEvent::Text {
            message,
            text: text.to_string(),
        })
        .await;
        Ok(message)
    }

    async fn send_menu(
        &self,
        chat: ChatId,
        text: &str,
        menu: &SettingsMenu,
    ) -> Result<MessageRef, OrchestratorError> {
        let message = self.ids.next_ref(chat);
        self.record(SinkEvent::Menu {
            message,
            text: text.to_string(),
            menu: menu.clone(),
        })
        .await;
        Ok(message)
    }

    async fn edit_text(&self, message: MessageRef, text: &str) -> Result<(), OrchestratorError> {
        if self.fail_edits {
            return Err(OrchestratorError::SendFailed("edit rejected".to_string()));
        }
        self.record(SinkEvent::Edit {
            message,
            text: text.to_string(),
        })
        .await;
        Ok(())
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), OrchestratorError> {
        self.record(SinkEvent::Delete { message }).await;
        Ok(())
    }

    async fn send_image(
        &self,
        chat: ChatId,
        image: Vec<u8>,
        caption: &str,
    ) -> Result<MessageRef, OrchestratorError> {
        let message = self.ids.next_ref(chat);
        self.record(SinkEvent::Image {
            message,
            bytes: image.len(),
            caption: caption.to_string(),
        })
        .await;
        Ok(message)
    }
}
