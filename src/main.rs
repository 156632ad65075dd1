//! Calorie Coach - Telegram bot for meal and workout tracking
//!
//! Meal photos are estimated by a vision model and logged; workouts are
//! logged from free text; a coach persona answers questions grounded in
//! the log.

mod calories;
mod config;
mod db;
mod llm;
mod logbook;
mod replies;
mod router;
mod runtime;
mod state_machine;
mod system_prompt;
mod telegram;

use config::Config;
use db::Database;
use llm::{GeminiService, LlmService, LoggingService};
use logbook::LogBook;
use router::EventRouter;
use runtime::{SessionManager, SessionServices};
use std::sync::Arc;
use std::time::Duration;
use telegram::TelegramClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pause after a failed `getUpdates` before polling again
const POLL_BACKOFF: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calorie_coach=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    config::load_dotenv();
    let config = Config::from_env()?;
    tracing::info!(config = ?config, "Configuration loaded");

    // Ensure database directory exists
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::create_dir_all(&config.temp_dir)?;

    // Initialize database
    tracing::info!(path = %config.db_path.display(), "Opening database");
    let db = Database::open(&config.db_path)?;
    let logbook = LogBook::new(Arc::new(db)).with_context_rows(config.context_rows);

    // Model services, one per task
    let http = GeminiService::http_client()?;
    let vision: Arc<dyn LlmService> = Arc::new(LoggingService::new(Arc::new(
        GeminiService::new(http.clone(), config.gemini_api_key.clone(), &config.vision_model),
    )));
    let coach: Arc<dyn LlmService> = Arc::new(LoggingService::new(Arc::new(
        GeminiService::new(http, config.gemini_api_key.clone(), &config.chat_model),
    )));

    let telegram = TelegramClient::new(config.telegram_token.clone())?;
    let messenger = Arc::new(telegram.clone());

    let sessions = Arc::new(SessionManager::new(SessionServices {
        messenger: messenger.clone(),
        logbook,
        vision,
        coach,
        temp_dir: config.temp_dir.clone(),
    }));
    let router = EventRouter::new(sessions, messenger);

    tracing::info!("Bot is running");

    let mut offset = 0_i64;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
            result = telegram.get_updates(offset) => match result {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        router.dispatch(&update).await;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Polling failed");
                    tokio::time::sleep(POLL_BACKOFF).await;
                }
            },
        }
    }

    Ok(())
}
