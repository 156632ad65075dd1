//! Mock implementations for testing
//!
//! These mocks enable session tests without network or disk I/O beyond a
//! temp directory.

use super::traits::*;
use super::{SessionRuntime, SessionServices};
use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmService};
use crate::logbook::{LogBook, LogEntry, LogStore, StoreError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Polling interval for the `wait_for_*` helpers
const POLL_INTERVAL: Duration = Duration::from_millis(10);

// ============================================================================
// Mock LLM Client
// ============================================================================

/// Mock LLM client that returns queued responses
pub struct MockLlmClient {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    model_id: String,
    /// Record of all requests made
    pub requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmClient {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn queue_response(&self, response: LlmResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for MockLlmClient {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// LLM client whose calls never complete
pub struct HangingLlmClient {
    started: Mutex<usize>,
}

impl HangingLlmClient {
    pub fn new() -> Self {
        Self {
            started: Mutex::new(0),
        }
    }

    /// Number of calls that have started
    pub fn started(&self) -> usize {
        *self.started.lock().unwrap()
    }
}

#[async_trait]
impl LlmService for HangingLlmClient {
    async fn complete(&self, _request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        *self.started.lock().unwrap() += 1;
        std::future::pending().await
    }

    fn model_id(&self) -> &str {
        "mock-hanging"
    }
}

// ============================================================================
// Recording Messenger
// ============================================================================

/// Something the runtime sent through the messenger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat_id: ChatId,
        text: String,
    },
    Menu {
        chat_id: ChatId,
        text: String,
        buttons: Vec<MenuButton>,
    },
    CallbackAnswer {
        callback_id: String,
    },
}

/// Messenger that records outgoing traffic and fakes downloads
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<Sent>>,
    downloads: Mutex<Vec<PathBuf>>,
    fail_sends: Mutex<bool>,
    fail_downloads: Mutex<bool>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Plain text messages, in order
    pub fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn callback_answers(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter_map(|s| match s {
                Sent::CallbackAnswer { callback_id } => Some(callback_id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Destinations of every download attempt
    pub fn downloads(&self) -> Vec<PathBuf> {
        self.downloads.lock().unwrap().clone()
    }

    pub fn fail_sends(&self, fail: bool) {
        *self.fail_sends.lock().unwrap() = fail;
    }

    pub fn fail_downloads(&self, fail: bool) {
        *self.fail_downloads.lock().unwrap() = fail;
    }

    /// Wait until a text message equal to `expected` has been sent
    pub async fn wait_for_text(&self, expected: &str, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.texts().iter().any(|t| t == expected) {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    fn record(&self, sent: Sent) -> Result<(), TransportError> {
        if *self.fail_sends.lock().unwrap() {
            return Err(TransportError::Network("mock send failure".to_string()));
        }
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TransportError> {
        self.record(Sent::Text {
            chat_id,
            text: text.to_string(),
        })
    }

    async fn send_menu(
        &self,
        chat_id: ChatId,
        text: &str,
        buttons: &[MenuButton],
    ) -> Result<(), TransportError> {
        self.record(Sent::Menu {
            chat_id,
            text: text.to_string(),
            buttons: buttons.to_vec(),
        })
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        self.record(Sent::CallbackAnswer {
            callback_id: callback_id.to_string(),
        })
    }

    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<u64, TransportError> {
        self.downloads.lock().unwrap().push(dest.to_path_buf());
        if *self.fail_downloads.lock().unwrap() {
            return Err(TransportError::Api {
                code: 400,
                description: format!("Bad Request: invalid file_id {file_id}"),
            });
        }
        let bytes = format!("jpeg:{file_id}");
        tokio::fs::write(dest, bytes.as_bytes()).await?;
        Ok(bytes.len() as u64)
    }
}

// ============================================================================
// In-Memory Log Store
// ============================================================================

/// Log store backed by a vector
#[derive(Default)]
pub struct MemoryLogStore {
    rows: Mutex<Vec<LogEntry>>,
    fail_writes: Mutex<bool>,
    fail_reads: Mutex<bool>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<LogEntry> {
        self.rows.lock().unwrap().clone()
    }

    /// Insert a row directly, bypassing failure injection
    pub fn seed(&self, entry: LogEntry) {
        self.rows.lock().unwrap().push(entry);
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().unwrap() = fail;
    }

    /// Wait until at least `count` rows exist
    pub async fn wait_for_rows(&self, count: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.rows.lock().unwrap().len() >= count {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn append(&self, entry: &LogEntry) -> Result<(), StoreError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(StoreError::Unavailable("mock write failure".to_string()));
        }
        self.rows.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<LogEntry>, StoreError> {
        if *self.fail_reads.lock().unwrap() {
            return Err(StoreError::Unavailable("mock read failure".to_string()));
        }
        Ok(self.rows())
    }
}

// ============================================================================
// Test Harness
// ============================================================================

/// Mocks wired into a [`SessionServices`]
pub struct TestHarness {
    pub messenger: Arc<RecordingMessenger>,
    pub store: Arc<MemoryLogStore>,
    pub vision: Arc<MockLlmClient>,
    pub coach: Arc<MockLlmClient>,
    temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            messenger: Arc::new(RecordingMessenger::new()),
            store: Arc::new(MemoryLogStore::new()),
            vision: Arc::new(MockLlmClient::new("mock-vision")),
            coach: Arc::new(MockLlmClient::new("mock-coach")),
            temp_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn services(&self) -> SessionServices {
        SessionServices {
            messenger: self.messenger.clone(),
            logbook: LogBook::new(self.store.clone()),
            vision: self.vision.clone(),
            coach: self.coach.clone(),
            temp_dir: self.temp_dir.path().to_path_buf(),
        }
    }

    /// A runtime whose channel is already closed; drive it with `handle`
    pub fn runtime(&self) -> SessionRuntime {
        let (_tx, rx) = mpsc::unbounded_channel();
        SessionRuntime::new(1, self.services(), rx)
    }

    /// Every photo was downloaded into the temp dir and none survived
    pub fn assert_downloads_removed(&self, expected: usize) {
        let downloads = self.messenger.downloads();
        assert_eq!(downloads.len(), expected);
        for path in &downloads {
            assert_eq!(path.parent(), Some(self.temp_dir.path()));
            assert!(!path.exists(), "temp image left behind: {}", path.display());
        }
        let leftover = std::fs::read_dir(self.temp_dir.path()).unwrap().count();
        assert_eq!(leftover, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_llm_client() {
        let client = MockLlmClient::new("test-model");
        client.queue_response(LlmResponse::from_text("first"));
        client.queue_error(LlmError::rate_limit("slow down"));

        let request = LlmRequest::default();
        assert_eq!(client.complete(&request).await.unwrap().text(), "first");
        assert!(client.complete(&request).await.is_err());
        // Exhausted queue fails rather than hanging
        assert!(client.complete(&request).await.is_err());
        assert_eq!(client.recorded_requests().len(), 3);
        assert_eq!(client.model_id(), "test-model");
    }

    #[tokio::test]
    async fn test_memory_log_store_failure_injection() {
        let store = MemoryLogStore::new();
        let entry = LogEntry::meal("2024-01-01 12:00:00", "Soup", 150);

        store.append(&entry).await.unwrap();
        store.fail_writes(true);
        assert!(store.append(&entry).await.is_err());
        assert_eq!(store.rows().len(), 1);

        store.fail_reads(true);
        assert!(store.read_all().await.is_err());
    }

    #[tokio::test]
    async fn test_recording_messenger_download() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("photo.jpg");
        let messenger = RecordingMessenger::new();

        let size = messenger.download_file("abc", &dest).await.unwrap();
        assert_eq!(size, 7);
        assert_eq!(std::fs::read(&dest).unwrap(), b"jpeg:abc");

        messenger.fail_sends(true);
        assert!(messenger.send_text(1, "lost").await.is_err());
        assert!(messenger.texts().is_empty());
    }
}
