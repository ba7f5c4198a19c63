//! Conversation transcript
//!
//! An append-only log of user/assistant turns plus the transient
//! "assistant is composing" flag. Turns are never edited in place; the only
//! way to drop them is a full clear.

/// Marker the backend puts in operational notices.
pub const SYSTEM_NOTICE_SENTINEL: &str = "SYSTEM NOTICE";

/// Marker the backend puts in technical error reports.
pub const TECHNICAL_ERROR_SENTINEL: &str = "TECHNICAL ERROR";

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// Presentation class of an assistant turn carrying a sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Operational,
    TechnicalError,
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Classify this turn as a system notice.
    ///
    /// Computed on demand from the content; only assistant turns qualify.
    /// A technical error wins when both sentinels are present.
    pub fn notice_kind(&self) -> Option<NoticeKind> {
        if !self.is_assistant() {
            return None;
        }
        if self.content.contains(TECHNICAL_ERROR_SENTINEL) {
            Some(NoticeKind::TechnicalError)
        } else if self.content.contains(SYSTEM_NOTICE_SENTINEL) {
            Some(NoticeKind::Operational)
        } else {
            None
        }
    }

    pub fn is_system_notice(&self) -> bool {
        self.notice_kind().is_some()
    }
}

/// Ordered transcript of turns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationLog {
    turns: Vec<Turn>,
    /// An answer for the latest user turn is pending
    composing: bool,
}

impl ConversationLog {
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::assistant(content));
    }

    pub fn set_composing(&mut self, composing: bool) {
        self.composing = composing;
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Drop every turn and the composing flag.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.composing = false;
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// The turn that should be animated, with its index.
    ///
    /// Only the chronologically last turn qualifies, and only when it is an
    /// assistant turn that is not a system notice.
    pub fn reveal_candidate(&self) -> Option<(usize, &Turn)> {
        let index = self.turns.len().checked_sub(1)?;
        let turn = &self.turns[index];
        (turn.is_assistant() && !turn.is_system_notice()).then_some((index, turn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_classification() {
        assert_eq!(Turn::assistant("hello").notice_kind(), None);
        assert_eq!(
            Turn::assistant("SYSTEM NOTICE: index rebuilt").notice_kind(),
            Some(NoticeKind::Operational)
        );
        assert_eq!(
            Turn::assistant("TECHNICAL ERROR: upstream timed out").notice_kind(),
            Some(NoticeKind::TechnicalError)
        );
        // Sentinel anywhere in the text counts
        assert!(Turn::assistant("note -- SYSTEM NOTICE -- end").is_system_notice());
    }

    #[test]
    fn test_user_turns_are_never_notices() {
        assert!(!Turn::user("SYSTEM NOTICE").is_system_notice());
        assert!(!Turn::user("TECHNICAL ERROR").is_system_notice());
    }

    #[test]
    fn test_log_preserves_insertion_order_without_dedup() {
        let mut log = ConversationLog::default();
        log.push_user("q");
        log.push_user("q");
        log.push_assistant("a");

        let roles: Vec<Role> = log.turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::User, Role::Assistant]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_reveal_candidate_only_last_plain_assistant() {
        let mut log = ConversationLog::default();
        assert!(log.reveal_candidate().is_none());

        log.push_user("What is Rust?");
        assert!(log.reveal_candidate().is_none());

        log.push_assistant("A language.");
        let (index, turn) = log.reveal_candidate().unwrap();
        assert_eq!(index, 1);
        assert_eq!(turn.content, "A language.");

        log.push_user("More?");
        assert!(log.reveal_candidate().is_none());

        log.push_assistant("TECHNICAL ERROR: retrieval failed");
        assert!(log.reveal_candidate().is_none());
    }

    #[test]
    fn test_clear_resets_composing() {
        let mut log = ConversationLog::default();
        log.push_user("q");
        log.set_composing(true);
        log.clear();
        assert!(log.is_empty());
        assert!(!log.is_composing());
    }
}
