//! Handler failures and their user-facing messages

use super::TransportError;
use crate::llm::LlmError;
use crate::logbook::StoreError;
use thiserror::Error;

/// Failures caught at the handler boundary.
///
/// The `Display` form is for logs; users only ever see [`user_message`].
///
/// [`user_message`]: HandlerError::user_message
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("no calorie line in meal analysis")]
    NoCalories,
    #[error("meal photo download failed: {0}")]
    Download(#[source] TransportError),
    #[error("meal analysis failed: {0}")]
    Vision(#[source] LlmError),
    #[error("coach reply failed: {0}")]
    Coach(#[source] LlmError),
    #[error("log write failed: {0}")]
    LogWrite(#[source] StoreError),
    #[error("log read failed: {0}")]
    LogRead(#[source] StoreError),
}

impl HandlerError {
    /// Stable message shown to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            HandlerError::NoCalories => "⚠️ Couldn't find calorie info.",
            HandlerError::Download(_) => "⚠️ Couldn't download your photo. Please send it again.",
            HandlerError::Vision(_) => "❌ Couldn't analyze your meal right now. Try again later.",
            HandlerError::Coach(_) => "❌ Error: your coach is unavailable right now.",
            HandlerError::LogWrite(_) => "⚠️ Error logging: the entry was not saved.",
            HandlerError::LogRead(_) => "⚠️ Couldn't read your log.",
        }
    }

    /// Error class for logs
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerError::NoCalories => "extraction_ambiguity",
            HandlerError::Download(_) | HandlerError::Vision(_) | HandlerError::Coach(_) => {
                "external_call"
            }
            HandlerError::LogWrite(_) | HandlerError::LogRead(_) => "log_store",
        }
    }
}
