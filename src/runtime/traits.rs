//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the session runtime with mock implementations.
//! The log store port lives in `logbook`, the model port in `llm`.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Chat that replies are sent to
pub type ChatId = i64;

/// Key for per-user session state
pub type UserId = i64;

/// One inline menu button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    /// Opaque identifier sent back when the button is pressed
    pub callback_data: String,
}

impl MenuButton {
    pub fn new(label: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback_data: callback_data.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error {code}: {description}")]
    Api { code: i32, description: String },
    #[error("file {0} has no download path")]
    MissingFilePath(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outgoing side of the messaging transport
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a plain text message
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TransportError>;

    /// Send a text message with an inline button menu, one button per row
    async fn send_menu(
        &self,
        chat_id: ChatId,
        text: &str,
        buttons: &[MenuButton],
    ) -> Result<(), TransportError>;

    /// Acknowledge a button press
    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError>;

    /// Download a file by transport id to `dest`, returning the byte count
    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<u64, TransportError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: Messenger + ?Sized> Messenger for Arc<T> {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TransportError> {
        (**self).send_text(chat_id, text).await
    }

    async fn send_menu(
        &self,
        chat_id: ChatId,
        text: &str,
        buttons: &[MenuButton],
    ) -> Result<(), TransportError> {
        (**self).send_menu(chat_id, text, buttons).await
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        (**self).answer_callback(callback_id).await
    }

    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<u64, TransportError> {
        (**self).download_file(file_id, dest).await
    }
}
