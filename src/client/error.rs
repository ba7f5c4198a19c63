//! Backend error types

use thiserror::Error;

/// Backend error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub kind: ClientErrorKind,
    pub message: String,
    /// HTTP status, when the server answered at all
    pub status: Option<u16>,
}

impl ClientError {
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Network, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Server, message)
    }

    pub fn client(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Client, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Decode, message)
    }

    /// Classify a non-success HTTP response.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = error_detail(body);
        let err = match status {
            400..=499 => Self::client(format!("Request rejected (HTTP {status}): {detail}")),
            500..=599 => Self::server(format!("Server error (HTTP {status}): {detail}")),
            _ => Self::server(format!("Unexpected HTTP {status}: {detail}")),
        };
        err.with_status(status)
    }
}

/// Pull `detail` out of a JSON error body (the service's framework puts
/// it there); otherwise use the body text as-is.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .map(|detail| detail.as_str().map_or_else(|| detail.to_string(), str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// Connection refused, timeout, broken transfer
    Network,
    /// 5xx
    Server,
    /// 4xx
    Client,
    /// 2xx with a body that does not match the contract
    Decode,
}
