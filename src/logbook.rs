//! Meal and workout log
//!
//! Append-only rows of (timestamp, meal, meal calories, workout, workout
//! calories). Each row records exactly one event.

use async_trait::async_trait;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Timestamp format for log rows (local time)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default number of rows fed back to the coach
pub const DEFAULT_CONTEXT_ROWS: usize = 20;

/// One row of the log.
///
/// Serialized with the column headers of the tracking sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Meal Description", default)]
    pub meal_description: String,
    #[serde(rename = "Calories", default)]
    pub meal_calories: Option<u64>,
    #[serde(rename = "Workout Description", default)]
    pub workout_description: String,
    #[serde(rename = "Workout Calories", default)]
    pub workout_calories: Option<u64>,
}

impl LogEntry {
    pub fn meal(timestamp: impl Into<String>, description: impl Into<String>, calories: u64) -> Self {
        Self {
            timestamp: timestamp.into(),
            meal_description: description.into(),
            meal_calories: Some(calories),
            workout_description: String::new(),
            workout_calories: None,
        }
    }

    pub fn workout(
        timestamp: impl Into<String>,
        description: impl Into<String>,
        calories: u64,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            meal_description: String::new(),
            meal_calories: None,
            workout_description: description.into(),
            workout_calories: Some(calories),
        }
    }

    pub fn is_meal(&self) -> bool {
        self.meal_calories.is_some()
    }

    pub fn is_workout(&self) -> bool {
        self.workout_calories.is_some()
    }

    /// Render the bullet lines used as coach context
    fn context_lines(&self, out: &mut String) {
        if !self.meal_description.is_empty() {
            out.push_str(&format!(
                "- {} : {} kcal\n",
                self.meal_description,
                display_calories(self.meal_calories)
            ));
        }
        if !self.workout_description.is_empty() {
            out.push_str(&format!(
                "- {} : 🔥 {} kcal\n",
                self.workout_description,
                display_calories(self.workout_calories)
            ));
        }
    }
}

fn display_calories(calories: Option<u64>) -> String {
    calories.map(|c| c.to_string()).unwrap_or_default()
}

/// Current local time in the log's timestamp format
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("log store unavailable: {0}")]
    Unavailable(String),
    #[error("log row rejected: {0}")]
    Rejected(String),
}

/// Durable append-only storage for log rows
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Append one row
    async fn append(&self, entry: &LogEntry) -> Result<(), StoreError>;

    /// All rows in insertion order
    async fn read_all(&self) -> Result<Vec<LogEntry>, StoreError>;
}

#[async_trait]
impl<T: LogStore + ?Sized> LogStore for Arc<T> {
    async fn append(&self, entry: &LogEntry) -> Result<(), StoreError> {
        (**self).append(entry).await
    }

    async fn read_all(&self) -> Result<Vec<LogEntry>, StoreError> {
        (**self).read_all().await
    }
}

/// Writer and reader over a [`LogStore`]
#[derive(Clone)]
pub struct LogBook {
    store: Arc<dyn LogStore>,
    context_rows: usize,
}

impl LogBook {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self {
            store,
            context_rows: DEFAULT_CONTEXT_ROWS,
        }
    }

    pub fn with_context_rows(mut self, rows: usize) -> Self {
        self.context_rows = rows;
        self
    }

    pub async fn log_meal(
        &self,
        timestamp: &str,
        description: &str,
        calories: u64,
    ) -> Result<LogEntry, StoreError> {
        self.append(LogEntry::meal(timestamp, description, calories))
            .await
    }

    pub async fn log_workout(
        &self,
        timestamp: &str,
        description: &str,
        calories: u64,
    ) -> Result<LogEntry, StoreError> {
        self.append(LogEntry::workout(timestamp, description, calories))
            .await
    }

    async fn append(&self, entry: LogEntry) -> Result<LogEntry, StoreError> {
        self.store.append(&entry).await?;
        tracing::info!(
            timestamp = %entry.timestamp,
            meal = entry.is_meal(),
            workout = entry.is_workout(),
            "Log row appended"
        );
        Ok(entry)
    }

    /// Context block for the configured number of rows
    pub async fn context(&self) -> Result<String, StoreError> {
        self.recent_context(self.context_rows).await
    }

    /// Render the last `limit` rows as bullet lines, oldest first
    pub async fn recent_context(&self, limit: usize) -> Result<String, StoreError> {
        let rows = self.store.read_all().await?;
        Ok(render_context(&rows, limit))
    }
}

/// Render the last `limit` rows as bullet lines, oldest first
pub fn render_context(rows: &[LogEntry], limit: usize) -> String {
    let start = rows.len().saturating_sub(limit);
    let mut out = String::new();
    for row in &rows[start..] {
        row.context_lines(&mut out);
    }
    out
}
