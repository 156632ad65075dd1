//! Process configuration from the environment

use crate::logbook::DEFAULT_CONTEXT_ROWS;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_VISION_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-1.5-pro";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Clone)]
pub struct Config {
    pub telegram_token: String,
    pub gemini_api_key: String,
    pub db_path: PathBuf,
    /// Where meal photos are downloaded while being analysed
    pub temp_dir: PathBuf,
    pub vision_model: String,
    pub chat_model: String,
    /// Log rows included in the coach context
    pub context_rows: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let db_path = get("CALORIE_COACH_DB_PATH").map_or_else(
            || {
                let home = get("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".calorie-coach").join("log.db")
            },
            PathBuf::from,
        );

        let context_rows = match get("CALORIE_COACH_CONTEXT_ROWS") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                name: "CALORIE_COACH_CONTEXT_ROWS",
                reason: format!("{e}"),
            })?,
            None => DEFAULT_CONTEXT_ROWS,
        };

        Ok(Self {
            telegram_token: require("TELEGRAM_BOT_TOKEN")?,
            gemini_api_key: require("GEMINI_API_KEY")?,
            db_path,
            temp_dir: get("CALORIE_COACH_TEMP_DIR").map_or_else(std::env::temp_dir, PathBuf::from),
            vision_model: get("GEMINI_VISION_MODEL")
                .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            chat_model: get("GEMINI_CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            context_rows,
        })
    }
}

// Secrets stay out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("telegram_token", &"<redacted>")
            .field("gemini_api_key", &"<redacted>")
            .field("db_path", &self.db_path)
            .field("temp_dir", &self.temp_dir)
            .field("vision_model", &self.vision_model)
            .field("chat_model", &self.chat_model)
            .field("context_rows", &self.context_rows)
            .finish()
    }
}

/// Load `.env` from the working directory if there is one
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::info!(path = %path.display(), "Loaded .env");
    }
}
