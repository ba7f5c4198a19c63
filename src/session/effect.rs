//! Effects produced by state transitions

use super::state::Generation;

/// User-facing text for a failed article load
pub const LOAD_FAILURE_ALERT: &str = "Failed to load article. Check the URL and try again.";

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch and summarize an article (spawns as background task)
    FetchArticle { generation: Generation, url: String },

    /// Ask the backend a question (spawns as background task)
    AskQuestion {
        generation: Generation,
        question: String,
    },

    /// Blocking alert shown to the user
    RaiseAlert { message: String },

    /// Record a failed article load for diagnostics
    ReportLoadFailure { url: String, message: String },

    /// Record an unanswered question for diagnostics
    ReportAskFailure { question: String, message: String },
}

impl Effect {
    pub fn load_failure_alert() -> Self {
        Effect::RaiseAlert {
            message: LOAD_FAILURE_ALERT.to_string(),
        }
    }
}
