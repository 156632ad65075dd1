//! Database module for the calorie log
//!
//! SQLite-backed append-only store for meal and workout rows.

mod schema;

use schema::{INSERT_ROW, SCHEMA, SELECT_ALL};

use crate::logbook::{LogEntry, LogStore, StoreError};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Database lock poisoned")]
    LockPoisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Append a row
    pub fn insert_entry(&self, entry: &LogEntry) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute(
            INSERT_ROW,
            params![
                entry.timestamp,
                entry.meal_description,
                entry.meal_calories.map(to_sql_int),
                entry.workout_description,
                entry.workout_calories.map(to_sql_int),
            ],
        )?;
        Ok(())
    }

    /// All rows in insertion order
    pub fn list_entries(&self) -> DbResult<Vec<LogEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(SELECT_ALL)?;
        let rows = stmt.query_map([], |row| {
            Ok(LogEntry {
                timestamp: row.get(0)?,
                meal_description: row.get(1)?,
                meal_calories: row.get::<_, Option<i64>>(2)?.map(from_sql_int),
                workout_description: row.get(3)?,
                workout_calories: row.get::<_, Option<i64>>(4)?.map(from_sql_int),
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }
}

// SQLite integers are signed; calorie counts beyond i64 are clamped.
fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn from_sql_int(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

impl From<DbError> for StoreError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Sqlite(rusqlite::Error::SqliteFailure(err, msg))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Rejected(msg.unwrap_or_else(|| err.to_string()))
            }
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl LogStore for Database {
    async fn append(&self, entry: &LogEntry) -> Result<(), StoreError> {
        self.insert_entry(entry).map_err(StoreError::from)
    }

    async fn read_all(&self) -> Result<Vec<LogEntry>, StoreError> {
        self.list_entries().map_err(StoreError::from)
    }
}
