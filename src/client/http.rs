//! HTTP implementation of the backend contracts

use super::types::{AskRequest, AskResponse, LoadRequest, LoadResponse};
use super::{ArticleBackend, ClientError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Backend reached over HTTP with JSON bodies
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a backend for `base_url`.
    ///
    /// `timeout` is applied per request; `None` waits as long as the server
    /// takes (summarizing a long article can be slow).
    ///
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, ClientError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    ClientError::network(format!("Connection failed: {e}"))
                } else {
                    ClientError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            tracing::debug!(path, status = status.as_u16(), body = %text, "Backend returned error");
            return Err(ClientError::from_status(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            ClientError::decode(format!("Failed to parse response: {e} - body: {text}"))
                .with_status(status.as_u16())
        })
    }
}

#[async_trait]
impl ArticleBackend for HttpBackend {
    async fn load_article(&self, url: &str) -> Result<LoadResponse, ClientError> {
        let request = LoadRequest {
            url: url.to_string(),
        };
        self.post_json("/api/load", &request).await
    }

    async fn ask(&self, question: &str) -> Result<AskResponse, ClientError> {
        let request = AskRequest {
            question: question.to_string(),
        };
        self.post_json("/api/ask", &request).await
    }
}
