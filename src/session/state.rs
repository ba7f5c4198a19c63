//! Session state types

use crate::conversation::ConversationLog;
use crate::summary::SummaryPayload;
use std::fmt;

/// Identifies one session instance.
///
/// Bumped on every reset; results tagged with an older generation are stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing,
    Dashboard,
}

/// Everything the client knows about the current article and dialog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// URL of the article being loaded or shown
    pub url: String,
    pub summary: Option<SummaryPayload>,
    pub log: ConversationLog,
    /// An article fetch is in flight
    pub is_loading: bool,
    pub generation: Generation,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// An answer fetch is in flight
    pub fn is_composing(&self) -> bool {
        self.log.is_composing()
    }

    pub fn has_summary(&self) -> bool {
        self.summary.is_some()
    }

    /// Landing until there is a summary or a load in progress.
    pub fn view(&self) -> View {
        if self.summary.is_none() && !self.is_loading {
            View::Landing
        } else {
            View::Dashboard
        }
    }

    /// Dashboard with nothing to show yet but the "analyzing" placeholder.
    pub fn is_analyzing(&self) -> bool {
        self.is_loading && self.summary.is_none()
    }

    /// Fresh empty session for the next generation.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self {
            generation: self.generation.next(),
            ..Self::default()
        }
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }
}
