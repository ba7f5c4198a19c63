//! Mock backends for testing
//!
//! These mocks enable runtime tests without real I/O.

use crate::client::{ArticleBackend, AskResponse, ClientError, LoadResponse};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::{oneshot, Notify};

// ============================================================================
// Mock Backend
// ============================================================================

/// Mock backend that returns queued responses
#[derive(Default)]
pub struct MockBackend {
    loads: Mutex<VecDeque<Result<LoadResponse, ClientError>>>,
    answers: Mutex<VecDeque<Result<AskResponse, ClientError>>>,
    /// URLs of all load calls, in order
    pub load_requests: Mutex<Vec<String>>,
    /// Questions of all ask calls, in order
    pub ask_requests: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful load with a serialized summary
    pub fn queue_summary(&self, summary: impl Into<String>) {
        self.loads.lock().unwrap().push_back(Ok(LoadResponse {
            summary: Value::String(summary.into()),
        }));
    }

    pub fn queue_load_error(&self, error: ClientError) {
        self.loads.lock().unwrap().push_back(Err(error));
    }

    pub fn queue_answer(&self, answer: impl Into<String>) {
        self.answers.lock().unwrap().push_back(Ok(AskResponse {
            answer: answer.into(),
        }));
    }

    pub fn queue_ask_error(&self, error: ClientError) {
        self.answers.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_loads(&self) -> Vec<String> {
        self.load_requests.lock().unwrap().clone()
    }

    pub fn recorded_questions(&self) -> Vec<String> {
        self.ask_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArticleBackend for MockBackend {
    async fn load_article(&self, url: &str) -> Result<LoadResponse, ClientError> {
        self.load_requests.lock().unwrap().push(url.to_string());
        self.loads
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::network("No mock load queued")))
    }

    async fn ask(&self, question: &str) -> Result<AskResponse, ClientError> {
        self.ask_requests.lock().unwrap().push(question.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::network("No mock answer queued")))
    }
}

// ============================================================================
// Gated Backend (for ordering and reset testing)
// ============================================================================

type LoadGate = oneshot::Sender<Result<LoadResponse, ClientError>>;
type AskGate = oneshot::Sender<Result<AskResponse, ClientError>>;

/// Backend whose calls block until the test releases them
#[derive(Default)]
pub struct GatedBackend {
    pending_loads: Mutex<VecDeque<LoadGate>>,
    pending_asks: Mutex<VecDeque<AskGate>>,
    /// Notified when a request starts (for test synchronization)
    request_started: Notify,
}

impl GatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn wait_for_request(&self) {
        self.request_started.notified().await;
    }

    /// Resolve the oldest pending load with a serialized summary or an error
    pub fn release_load(&self, result: Result<&str, ClientError>) {
        let gate = self
            .pending_loads
            .lock()
            .unwrap()
            .pop_front()
            .expect("no load pending");
        let _ = gate.send(result.map(|summary| LoadResponse {
            summary: Value::String(summary.to_string()),
        }));
    }

    /// Resolve the oldest pending question
    pub fn release_answer(&self, result: Result<&str, ClientError>) {
        let gate = self
            .pending_asks
            .lock()
            .unwrap()
            .pop_front()
            .expect("no question pending");
        let _ = gate.send(result.map(|answer| AskResponse {
            answer: answer.to_string(),
        }));
    }
}

#[async_trait]
impl ArticleBackend for GatedBackend {
    async fn load_article(&self, _url: &str) -> Result<LoadResponse, ClientError> {
        let (tx, rx) = oneshot::channel();
        self.pending_loads.lock().unwrap().push_back(tx);
        self.request_started.notify_one();
        rx.await
            .unwrap_or_else(|_| Err(ClientError::network("Gate dropped")))
    }

    async fn ask(&self, _question: &str) -> Result<AskResponse, ClientError> {
        let (tx, rx) = oneshot::channel();
        self.pending_asks.lock().unwrap().push_back(tx);
        self.request_started.notify_one();
        rx.await
            .unwrap_or_else(|_| Err(ClientError::network("Gate dropped")))
    }
}

// ============================================================================
// Panicking Backend
// ============================================================================

/// Backend whose calls never return normally
pub struct PanickingBackend;

#[async_trait]
impl ArticleBackend for PanickingBackend {
    async fn load_article(&self, _url: &str) -> Result<LoadResponse, ClientError> {
        panic!("backend blew up while loading");
    }

    async fn ask(&self, _question: &str) -> Result<AskResponse, ClientError> {
        panic!("backend blew up while answering");
    }
}
