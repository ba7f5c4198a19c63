//! Structured article summary
//!
//! The backend returns the summary either as serialized JSON text or as an
//! already-structured JSON object. Both are kept verbatim as a
//! [`SummaryPayload`] and only parsed when projected for display.

mod render;

pub use render::{copy_synthesis, render, Section, SummaryView};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Number of words of the title shown in headers
pub const SHORT_TITLE_WORDS: usize = 4;

/// One entry of the technical stack table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackComponent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub component: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
}

/// One section of the detailed breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownSection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub section_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bullets: Vec<String>,
}

/// Parsed summary document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryDoc {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub executive_summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technical_stack: Vec<StackComponent>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub detailed_breakdown: Vec<BreakdownSection>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub use_cases: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tldr: String,
}

/// `null` reads like an absent field: empty text, no entries
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Summary data as it arrived from the backend
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryPayload {
    /// Serialized text that still has to be parsed
    Raw(String),
    /// Structured JSON delivered inline
    Structured(Value),
}

impl From<Value> for SummaryPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => SummaryPayload::Raw(text),
            other => SummaryPayload::Structured(other),
        }
    }
}

impl From<String> for SummaryPayload {
    fn from(text: String) -> Self {
        SummaryPayload::Raw(text)
    }
}

impl From<&str> for SummaryPayload {
    fn from(text: &str) -> Self {
        SummaryPayload::Raw(text.to_string())
    }
}

/// The payload could not be read as a summary document
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid data format: {reason}")]
pub struct SummaryError {
    pub reason: String,
}

impl From<serde_json::Error> for SummaryError {
    fn from(e: serde_json::Error) -> Self {
        Self {
            reason: e.to_string(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl SummaryPayload {
    /// Parse the payload into a document.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError`] when the text is not JSON or the JSON is not
    /// shaped like a summary document.
    pub fn parse(&self) -> Result<SummaryDoc, SummaryError> {
        let parsed;
        let value = match self {
            SummaryPayload::Raw(text) => {
                parsed = serde_json::from_str::<Value>(strip_code_fence(text))
                    .map_err(SummaryError::from)?;
                &parsed
            }
            SummaryPayload::Structured(value) => value,
        };
        // Derived structs would also accept a positional array
        if !value.is_object() {
            return Err(SummaryError {
                reason: format!("expected a JSON object, found {}", json_kind(value)),
            });
        }
        SummaryDoc::deserialize(value).map_err(SummaryError::from)
    }
}

/// Remove one surrounding Markdown code fence, if any.
///
/// Model output frequently arrives as "```json\n{...}\n```".
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Skip the info string ("json") up to the first newline
    match body.split_once('\n') {
        Some((info, inner)) if !info.trim_start().starts_with('{') => inner.trim(),
        _ => body.trim(),
    }
}
