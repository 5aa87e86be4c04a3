//! Telegram Bot API client library.
//!
//! This crate provides a small Rust client for the Telegram Bot API over
//! HTTPS. It supports:
//!
//! - Receiving updates via long polling (`getUpdates`)
//! - Sending, editing and deleting text messages
//! - Sending photos from in-memory bytes
//! - Inline keyboards and callback query answers
//!
//! # Example
//!
//! ```no_run
//! use futures::StreamExt;
//! use telegram_client::{TelegramClient, TelegramConfig};
//!
//! # async fn example() -> Result<(), telegram_client::TelegramError> {
//! let client = TelegramClient::connect(TelegramConfig::new("123:abc")).await?;
//!
//! let mut updates = Box::pin(telegram_client::subscribe(&client));
//! while let Some(result) = updates.next().await {
//!     match result {
//!         Ok(update) => {
//!             if let Some(message) = update.message {
//!                 client.send_message(message.chat.id, "Hello!", None).await?;
//!             }
//!         }
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod poll;
pub mod types;

pub use client::TelegramClient;
pub use config::TelegramConfig;
pub use error::TelegramError;
pub use poll::{subscribe, subscribe_with_backoff, PollBackoff};
pub use types::*;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
