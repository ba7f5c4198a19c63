//! Events that can occur in a session

use super::state::Generation;
use crate::summary::SummaryPayload;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User actions
    LoadArticle {
        url: String,
    },
    SubmitQuestion {
        question: String,
    },
    ResetSession,

    // Collaborator results, tagged with the generation they were issued in
    ArticleLoaded {
        generation: Generation,
        /// URL the request was issued for; becomes the session URL
        url: String,
        summary: SummaryPayload,
    },
    ArticleFailed {
        generation: Generation,
        url: String,
        message: String,
    },
    AnswerReceived {
        generation: Generation,
        answer: String,
    },
    AnswerFailed {
        generation: Generation,
        message: String,
    },
}

impl Event {
    /// Generation tag of a collaborator result; `None` for user actions.
    pub fn generation(&self) -> Option<Generation> {
        match self {
            Event::ArticleLoaded { generation, .. }
            | Event::ArticleFailed { generation, .. }
            | Event::AnswerReceived { generation, .. }
            | Event::AnswerFailed { generation, .. } => Some(*generation),
            Event::LoadArticle { .. } | Event::SubmitQuestion { .. } | Event::ResetSession => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::LoadArticle { .. } => "load_article",
            Event::SubmitQuestion { .. } => "submit_question",
            Event::ResetSession => "reset_session",
            Event::ArticleLoaded { .. } => "article_loaded",
            Event::ArticleFailed { .. } => "article_failed",
            Event::AnswerReceived { .. } => "answer_received",
            Event::AnswerFailed { .. } => "answer_failed",
        }
    }
}
