//! Single status message kept in step with a generation request.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::OrchestratorError;
use crate::formatting::{self, FAILURE_TEXT, INITIAL_ACK_TEXT};
use crate::orchestrator::{ProgressEvent, ProgressListener};
use crate::sender::{ChatId, MessageRef, StatusSink};

/// Owns the one status message of a request.
///
/// Progress updates edit the message in place. On success the image is sent
/// as a new message and the status message is deleted. On failure the status
/// message is edited to [`FAILURE_TEXT`] and left visible. Edit and delete
/// errors are logged and otherwise ignored; if the acknowledgment itself could
/// not be sent, the failure text is delivered as a fresh message instead.
pub struct StatusReporter<'a, S: StatusSink + ?Sized> {
    sink: &'a S,
    chat: ChatId,
    message: Option<MessageRef>,
    last_text: Mutex<String>,
}

impl<'a, S: StatusSink + ?Sized> StatusReporter<'a, S> {
    /// Send the initial acknowledgment and take ownership of it.
    pub async fn open(sink: &'a S, chat: ChatId) -> Self {
        let message = match sink.send_text(chat, INITIAL_ACK_TEXT).await {
            Ok(message) => Some(message),
            Err(e) => {
                warn!("Failed to send status message to {}: {}", chat, e);
                None
            }
        };

        Self {
            sink,
            chat,
            message,
            last_text: Mutex::new(INITIAL_ACK_TEXT.to_string()),
        }
    }

    pub fn message(&self) -> Option<MessageRef> {
        self.message
    }

    /// Replace the status text. Identical consecutive texts are not re-sent.
    pub async fn update(&self, text: &str) {
        let Some(message) = self.message else {
            return;
        };

        let mut last_text = self.last_text.lock().await;
        if *last_text == text {
            return;
        }

        match self.sink.edit_text(message, text).await {
            Ok(()) => *last_text = text.to_string(),
            Err(e) => warn!("Failed to update status message: {}", e),
        }
    }

    /// Deliver the image, then remove the status message.
    ///
    /// If the image cannot be sent the request is reported as failed instead.
    pub async fn finish_success(
        self,
        image: Vec<u8>,
        label: &str,
        prompt: &str,
    ) -> Result<(), OrchestratorError> {
        let caption = formatting::success_caption(label, prompt);
        if let Err(e) = self.sink.send_image(self.chat, image, &caption).await {
            warn!("Failed to deliver image to {}: {}", self.chat, e);
            self.finish_failure().await;
            return Err(e);
        }

        if let Some(message) = self.message {
            if let Err(e) = self.sink.delete_message(message).await {
                warn!("Failed to delete status message: {}", e);
            }
        }
        debug!("Delivered image from {} to {}", label, self.chat);
        Ok(())
    }

    /// Leave the failure text visible in the chat.
    pub async fn finish_failure(self) {
        if let Some(message) = self.message {
            match self.sink.edit_text(message, FAILURE_TEXT).await {
                Ok(()) => return,
                Err(e) => warn!("Failed to edit status message to failure text: {}", e),
            }
        }

        if let Err(e) = self.sink.send_text(self.chat, FAILURE_TEXT).await {
            warn!("Failed to send failure text to {}: {}", self.chat, e);
        }
    }
}

#[async_trait]
impl<'a, S: StatusSink + ?Sized> ProgressListener for StatusReporter<'a, S> {
    async fn on_progress(&self, event: &ProgressEvent) {
        self.update(&formatting::progress_text(event)).await;
    }
}
