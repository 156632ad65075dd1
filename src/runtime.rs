//! Runtime for user sessions
//!
//! One task per user consumes that user's events in order, so mode changes
//! and log writes for the same user never interleave. Different users run
//! concurrently. Queues are unbounded so a user whose session is stuck on a
//! slow model call never holds up delivery to anyone else.

mod error;
mod executor;
mod meal;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use error::HandlerError;
pub use executor::SessionRuntime;
pub use traits::*;

use crate::llm::LlmService;
use crate::logbook::LogBook;
use crate::state_machine::Event;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// An event together with the chat it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub chat_id: ChatId,
    pub event: Event,
}

/// Collaborators shared by every session
#[derive(Clone)]
pub struct SessionServices {
    pub messenger: Arc<dyn Messenger>,
    pub logbook: LogBook,
    /// Model used for meal photos
    pub vision: Arc<dyn LlmService>,
    /// Model used for coach chat
    pub coach: Arc<dyn LlmService>,
    /// Directory for downloaded photos
    pub temp_dir: PathBuf,
}

/// Handle to a running session
struct SessionHandle {
    event_tx: mpsc::UnboundedSender<Inbound>,
}

/// Manager for all user sessions
pub struct SessionManager {
    services: SessionServices,
    sessions: RwLock<HashMap<UserId, SessionHandle>>,
}

impl SessionManager {
    pub fn new(services: SessionServices) -> Self {
        Self {
            services,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Get or start the session task for a user
    async fn get_or_create(&self, user_id: UserId) -> mpsc::UnboundedSender<Inbound> {
        {
            let sessions = self.sessions.read().await;
            if let Some(handle) = sessions.get(&user_id) {
                return handle.event_tx.clone();
            }
        }

        // Re-check under the write lock so a user never gets two runtimes
        let mut sessions = self.sessions.write().await;
        if let Some(handle) = sessions.get(&user_id) {
            return handle.event_tx.clone();
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let runtime = SessionRuntime::new(user_id, self.services.clone(), event_rx);
        tokio::spawn(runtime.run());

        tracing::info!(user_id, "Started session");
        sessions.insert(
            user_id,
            SessionHandle {
                event_tx: event_tx.clone(),
            },
        );
        event_tx
    }

    /// Queue an event for a user's session. Never waits on the session itself.
    pub async fn send_event(&self, user_id: UserId, inbound: Inbound) -> Result<(), String> {
        let event_tx = self.get_or_create(user_id).await;
        let Err(mpsc::error::SendError(inbound)) = event_tx.send(inbound) else {
            return Ok(());
        };

        // The session task is gone; start over from a fresh session
        tracing::warn!(user_id, "Session task stopped, restarting");
        self.sessions.write().await.remove(&user_id);
        self.get_or_create(user_id)
            .await
            .send(inbound)
            .map_err(|e| format!("Failed to send event: {e}"))
    }

    /// Number of users with a live session
    #[allow(dead_code)] // Used in tests
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
