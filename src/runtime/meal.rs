//! Meal photo pipeline: download, analyse, parse, log

use super::{ChatId, HandlerError, SessionServices};
use crate::calories::parse_meal_report;
use crate::logbook::{now_timestamp, LogEntry};
use crate::replies;
use crate::system_prompt::meal_request;
use std::path::{Path, PathBuf};

/// Downloaded photo that is deleted when dropped
pub struct TempImage {
    path: PathBuf,
}

impl TempImage {
    /// Reserve a unique path under `dir`; nothing is created yet
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("meal_{}.jpg", uuid::Uuid::new_v4())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed temp image"),
            // Download never got as far as creating it
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove temp image");
            }
        }
    }
}

/// Handle one meal photo end to end, reporting every outcome to the chat
pub async fn handle_photo(services: &SessionServices, chat_id: ChatId, file_id: &str) {
    let outcome = analyze_and_log(services, chat_id, file_id).await;

    let reply = match &outcome {
        Ok(entry) => {
            tracing::info!(
                chat_id,
                meal = %entry.meal_description,
                calories = ?entry.meal_calories,
                "Meal logged"
            );
            replies::MEAL_LOGGED
        }
        Err(e) => {
            tracing::error!(chat_id, file_id, kind = e.kind(), error = %e, "Meal photo failed");
            e.user_message()
        }
    };

    send(services, chat_id, reply).await;
    send(services, chat_id, replies::PHOTO_DONE).await;
}

/// The temp image lives exactly as long as this call
async fn analyze_and_log(
    services: &SessionServices,
    chat_id: ChatId,
    file_id: &str,
) -> Result<LogEntry, HandlerError> {
    let image = TempImage::new(&services.temp_dir);

    services
        .messenger
        .download_file(file_id, image.path())
        .await
        .map_err(HandlerError::Download)?;
    send(services, chat_id, replies::PHOTO_RECEIVED).await;

    let bytes = tokio::fs::read(image.path())
        .await
        .map_err(|e| HandlerError::Download(e.into()))?;

    let response = services
        .vision
        .complete(&meal_request(&bytes))
        .await
        .map_err(HandlerError::Vision)?;
    let report = response.text();
    send(services, chat_id, &replies::analysis_report(&report)).await;

    let parsed = parse_meal_report(&report);
    tracing::debug!(chat_id, meal = %parsed.description, found = parsed.found(), "Parsed meal report");
    let calories = parsed.calories.ok_or(HandlerError::NoCalories)?;

    services
        .logbook
        .log_meal(&now_timestamp(), &parsed.description, calories)
        .await
        .map_err(HandlerError::LogWrite)
}

async fn send(services: &SessionServices, chat_id: ChatId, text: &str) {
    if let Err(e) = services.messenger.send_text(chat_id, text).await {
        tracing::warn!(chat_id, error = %e, "Failed to send reply");
    }
}
