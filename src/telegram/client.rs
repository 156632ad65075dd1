//! HTTPS client for the Bot API

use super::types::{
    AnswerCallbackQuery, ApiResponse, File, GetFile, GetUpdates, InlineKeyboardButton,
    InlineKeyboardMarkup, SendMessage, Update,
};
use crate::runtime::{ChatId, MenuButton, Messenger, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Seconds the server holds a `getUpdates` call open
pub const POLL_TIMEOUT_SECS: u64 = 30;

/// Telegram rejects longer messages; measured in UTF-16 code units
const MAX_MESSAGE_UNITS: usize = 4096;

const ALLOWED_UPDATES: &[&str] = &["message", "callback_query"];

/// Bot API client
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    api_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(token: String) -> Result<Self, TransportError> {
        Self::with_api_url(token, DEFAULT_API_URL)
    }

    pub fn with_api_url(token: String, api_url: &str) -> Result<Self, TransportError> {
        // Must outlive the long-poll window
        let client = Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 30))
            .build()
            .map_err(network_error)?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_url, self.token, file_path)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(network_error)?;

        let envelope: ApiResponse<T> = response.json().await.map_err(network_error)?;
        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                error_code,
                description,
                ..
            } => Err(TransportError::Api {
                code: error_code.unwrap_or_default(),
                description: description.unwrap_or_else(|| format!("{method} failed")),
            }),
        }
    }

    /// Long-poll for updates starting at `offset`
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TransportError> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: POLL_TIMEOUT_SECS,
                allowed_updates: ALLOWED_UPDATES,
            },
        )
        .await
    }

    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<(), TransportError> {
        let _: serde_json::Value = self
            .call(
                "sendMessage",
                &SendMessage {
                    chat_id,
                    text,
                    reply_markup,
                },
            )
            .await?;
        Ok(())
    }
}

// The request URL embeds the bot token
fn network_error(e: reqwest::Error) -> TransportError {
    TransportError::Network(e.without_url().to_string())
}

/// Split text into pieces Telegram accepts, on char boundaries
fn split_message(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut units = 0;

    for c in text.chars() {
        let width = c.len_utf16();
        if units + width > MAX_MESSAGE_UNITS {
            parts.push(std::mem::take(&mut current));
            units = 0;
        }
        current.push(c);
        units += width;
    }

    if !current.is_empty() || parts.is_empty() {
        parts.push(current);
    }
    parts
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TransportError> {
        for part in split_message(text) {
            self.send_message(chat_id, &part, None).await?;
        }
        Ok(())
    }

    async fn send_menu(
        &self,
        chat_id: ChatId,
        text: &str,
        buttons: &[MenuButton],
    ) -> Result<(), TransportError> {
        let markup = InlineKeyboardMarkup {
            inline_keyboard: buttons
                .iter()
                .map(|b| {
                    vec![InlineKeyboardButton {
                        text: b.label.clone(),
                        callback_data: b.callback_data.clone(),
                    }]
                })
                .collect(),
        };
        self.send_message(chat_id, text, Some(markup)).await
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &AnswerCallbackQuery {
                    callback_query_id: callback_id,
                },
            )
            .await?;
        Ok(())
    }

    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<u64, TransportError> {
        let file: File = self.call("getFile", &GetFile { file_id }).await?;
        let file_path = file
            .file_path
            .ok_or_else(|| TransportError::MissingFilePath(file.file_id.clone()))?;

        let response = self
            .client
            .get(self.file_url(&file_path))
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Api {
                code: i32::from(status.as_u16()),
                description: format!("file download failed: {status}"),
            });
        }

        let bytes = response.bytes().await.map_err(network_error)?;
        tokio::fs::write(dest, &bytes).await?;

        tracing::debug!(file_id, bytes = bytes.len(), path = %dest.display(), "Downloaded file");
        Ok(bytes.len() as u64)
    }
}
