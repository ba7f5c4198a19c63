//! Wire types for the backend API

use crate::summary::SummaryPayload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST /api/load` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadRequest {
    pub url: String,
}

/// `POST /api/load` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadResponse {
    /// Serialized summary text or a structured object
    pub summary: Value,
}

impl LoadResponse {
    pub fn into_payload(self) -> SummaryPayload {
        SummaryPayload::from(self.summary)
    }
}

/// `POST /api/ask` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// `POST /api/ask` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}
