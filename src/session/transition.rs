//! Pure state transition function
//!
//! Given the same session and event this always produces the same result,
//! with no I/O. Loads and questions are serialized per session: neither is
//! accepted while the other family has a request in flight.

use super::{Effect, Event, Session};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: Session) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    /// The session stays exactly as it was.
    pub fn unchanged(state: &Session) -> Self {
        Self::new(state.clone())
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Actions rejected because another request is still pending
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("An article is still loading")]
    LoadInProgress,
    #[error("Still waiting for the previous answer")]
    AnswerPending,
}

/// Pure transition function
pub fn transition(state: &Session, event: Event) -> Result<TransitionResult, TransitionError> {
    // Results from a previous generation belong to a session that no longer
    // exists; they must not touch the fresh one.
    if let Some(generation) = event.generation() {
        if !state.is_current(generation) {
            return Ok(TransitionResult::unchanged(state));
        }
    }

    match event {
        // ============================================================
        // Article loading
        // ============================================================
        Event::LoadArticle { url } => {
            let url = url.trim();
            if url.is_empty() {
                return Ok(TransitionResult::unchanged(state));
            }
            if state.is_loading {
                return Err(TransitionError::LoadInProgress);
            }
            if state.is_composing() {
                return Err(TransitionError::AnswerPending);
            }

            // The URL is only committed once the article arrives
            let mut next = state.clone();
            next.is_loading = true;
            Ok(TransitionResult::new(next).with_effect(Effect::FetchArticle {
                generation: state.generation,
                url: url.to_string(),
            }))
        }

        // Summary and log change together so no observer sees a stale log
        // against a new summary.
        Event::ArticleLoaded { url, summary, .. } => {
            let mut next = state.clone();
            next.url = url;
            next.summary = Some(summary);
            next.log.clear();
            next.is_loading = false;
            Ok(TransitionResult::new(next))
        }

        Event::ArticleFailed { url, message, .. } => {
            let mut next = state.clone();
            next.is_loading = false;
            Ok(TransitionResult::new(next)
                .with_effect(Effect::load_failure_alert())
                .with_effect(Effect::ReportLoadFailure { url, message }))
        }

        // ============================================================
        // Question / answer
        // ============================================================
        Event::SubmitQuestion { question } => {
            if question.trim().is_empty() {
                return Ok(TransitionResult::unchanged(state));
            }
            if state.is_loading {
                return Err(TransitionError::LoadInProgress);
            }
            if state.is_composing() {
                return Err(TransitionError::AnswerPending);
            }

            let mut next = state.clone();
            next.log.push_user(question.clone());
            next.log.set_composing(true);
            Ok(TransitionResult::new(next).with_effect(Effect::AskQuestion {
                generation: state.generation,
                question,
            }))
        }

        Event::AnswerReceived { answer, .. } => {
            let mut next = state.clone();
            next.log.push_assistant(answer);
            next.log.set_composing(false);
            Ok(TransitionResult::new(next))
        }

        // The user turn stays, visibly unanswered; no synthetic bubble.
        Event::AnswerFailed { message, .. } => {
            // A pending question is always the newest turn
            let question = state
                .log
                .last()
                .filter(|turn| !turn.is_assistant())
                .map(|turn| turn.content.clone())
                .unwrap_or_default();

            let mut next = state.clone();
            next.log.set_composing(false);
            Ok(TransitionResult::new(next)
                .with_effect(Effect::ReportAskFailure { question, message }))
        }

        // ============================================================
        // Reset
        // ============================================================
        Event::ResetSession => Ok(TransitionResult::new(state.reset())),
    }
}
