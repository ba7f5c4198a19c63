//! Backend collaborator
//!
//! The summarization service is reached through two request/response calls:
//! load an article by URL and ask a question about it. Everything behind
//! those calls (extraction, retrieval, generation) is the service's business.

mod error;
mod http;
mod types;

pub use error::{ClientError, ClientErrorKind};
pub use http::HttpBackend;
pub use types::{AskRequest, AskResponse, LoadRequest, LoadResponse};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for the backend
#[async_trait]
pub trait ArticleBackend: Send + Sync {
    /// Load an article and get its structured summary back
    async fn load_article(&self, url: &str) -> Result<LoadResponse, ClientError>;

    /// Ask a question about the loaded article
    async fn ask(&self, question: &str) -> Result<AskResponse, ClientError>;
}

#[async_trait]
impl<T: ArticleBackend + ?Sized> ArticleBackend for Arc<T> {
    async fn load_article(&self, url: &str) -> Result<LoadResponse, ClientError> {
        (**self).load_article(url).await
    }

    async fn ask(&self, question: &str) -> Result<AskResponse, ClientError> {
        (**self).ask(question).await
    }
}

/// Logging wrapper for backends
pub struct LoggingBackend<B> {
    inner: B,
}

impl<B: ArticleBackend> LoggingBackend<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<B: ArticleBackend> ArticleBackend for LoggingBackend<B> {
    async fn load_article(&self, url: &str) -> Result<LoadResponse, ClientError> {
        let request_id = uuid::Uuid::new_v4();
        let start = std::time::Instant::now();
        let result = self.inner.load_article(url).await;
        let duration = start.elapsed();

        match &result {
            Ok(_) => {
                tracing::info!(
                    %request_id,
                    %url,
                    duration_ms = %duration.as_millis(),
                    "Article loaded"
                );
            }
            Err(e) => {
                tracing::error!(
                    %request_id,
                    %url,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    status = ?e.status,
                    error = %e.message,
                    "Article load failed"
                );
            }
        }

        result
    }

    async fn ask(&self, question: &str) -> Result<AskResponse, ClientError> {
        let request_id = uuid::Uuid::new_v4();
        let start = std::time::Instant::now();
        let result = self.inner.ask(question).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    %request_id,
                    duration_ms = %duration.as_millis(),
                    question_chars = question.chars().count(),
                    answer_chars = response.answer.chars().count(),
                    "Question answered"
                );
            }
            Err(e) => {
                tracing::error!(
                    %request_id,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    status = ?e.status,
                    error = %e.message,
                    "Question failed"
                );
            }
        }

        result
    }
}
