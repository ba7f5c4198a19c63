//! Property-based tests for the session state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::*;
use crate::conversation::Role;
use crate::summary::SummaryPayload;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_url() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t\n]{1,4}",
        "https://en\\.wikipedia\\.org/wiki/[A-Za-z_]{1,12}",
    ]
}

fn arb_question() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[ ]{1,3}", "[A-Za-z ?]{1,30}"]
}

fn arb_text() -> impl Strategy<Value = String> {
    "[A-Za-z .]{0,40}"
}

/// Collaborator results are generated relative to the current generation so
/// both fresh and stale results show up.
#[derive(Debug, Clone)]
enum Step {
    Load(String),
    Ask(String),
    Reset,
    Loaded { stale: bool, title: String },
    LoadFailed { stale: bool },
    Answered { stale: bool, answer: String },
    AnswerFailed { stale: bool },
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        arb_url().prop_map(Step::Load),
        arb_question().prop_map(Step::Ask),
        Just(Step::Reset),
        (any::<bool>(), arb_text()).prop_map(|(stale, title)| Step::Loaded { stale, title }),
        any::<bool>().prop_map(|stale| Step::LoadFailed { stale }),
        (any::<bool>(), arb_text()).prop_map(|(stale, answer)| Step::Answered { stale, answer }),
        any::<bool>().prop_map(|stale| Step::AnswerFailed { stale }),
    ]
}

fn to_event(state: &Session, step: Step) -> Event {
    // Every generation below the current one is stale; pick the oldest.
    let tag = |stale: bool| {
        if stale {
            Generation::default()
        } else {
            state.generation
        }
    };
    match step {
        Step::Load(url) => Event::LoadArticle { url },
        Step::Ask(question) => Event::SubmitQuestion { question },
        Step::Reset => Event::ResetSession,
        Step::Loaded { stale, title } => Event::ArticleLoaded {
            generation: tag(stale),
            url: format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_")),
            summary: SummaryPayload::from(format!(r#"{{"title":"{title}"}}"#)),
        },
        Step::LoadFailed { stale } => Event::ArticleFailed {
            generation: tag(stale),
            url: "https://en.wikipedia.org/wiki/Nope".to_string(),
            message: "failed".to_string(),
        },
        Step::Answered { stale, answer } => Event::AnswerReceived {
            generation: tag(stale),
            answer,
        },
        Step::AnswerFailed { stale } => Event::AnswerFailed {
            generation: tag(stale),
            message: "failed".to_string(),
        },
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Loading and composing never overlap, whatever arrives in whatever order.
    #[test]
    fn prop_loading_and_composing_never_both_set(steps in prop::collection::vec(arb_step(), 0..40)) {
        let mut state = Session::new();
        for step in steps {
            let event = to_event(&state, step);
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
            }
            prop_assert!(!(state.is_loading && state.is_composing()));
        }
    }

    /// Rejected actions never alter the session (the caller keeps the old one).
    /// Accepted events never shrink the log except through load or reset.
    #[test]
    fn prop_log_is_append_only(steps in prop::collection::vec(arb_step(), 0..40)) {
        let mut state = Session::new();
        for step in steps {
            let event = to_event(&state, step);
            let clears = matches!(event, Event::ResetSession | Event::ArticleLoaded { .. });
            let before = state.log.turns().to_vec();
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
            }
            if !clears {
                prop_assert!(state.log.turns().starts_with(&before));
            }
        }
    }

    /// Blank input never changes state and never produces effects.
    #[test]
    fn prop_blank_input_is_noop(
        steps in prop::collection::vec(arb_step(), 0..20),
        blank in "[ \t\n]{0,5}",
        as_question in any::<bool>(),
    ) {
        let mut state = Session::new();
        for step in steps {
            let event = to_event(&state, step);
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
            }
        }

        let event = if as_question {
            Event::SubmitQuestion { question: blank }
        } else {
            Event::LoadArticle { url: blank }
        };
        let result = transition(&state, event).unwrap();
        prop_assert_eq!(&result.new_state, &state);
        prop_assert!(result.effects.is_empty());
    }

    /// Stale results never change the session.
    #[test]
    fn prop_stale_results_are_discarded(
        resets in 1usize..4,
        step in arb_step(),
    ) {
        let mut state = Session::new();
        for _ in 0..resets {
            state = transition(&state, Event::ResetSession).unwrap().new_state;
        }

        let stale_step = match step {
            Step::Loaded { title, .. } => Step::Loaded { stale: true, title },
            Step::LoadFailed { .. } => Step::LoadFailed { stale: true },
            Step::Answered { answer, .. } => Step::Answered { stale: true, answer },
            Step::AnswerFailed { .. } => Step::AnswerFailed { stale: true },
            Step::Load(_) | Step::Ask(_) | Step::Reset => Step::AnswerFailed { stale: true },
        };
        let event = to_event(&state, stale_step);
        let result = transition(&state, event).unwrap();
        prop_assert_eq!(&result.new_state, &state);
        prop_assert!(result.effects.is_empty());
    }

    /// Questions asked one at a time, each awaited, alternate user/assistant
    /// and leave exactly 2N turns.
    #[test]
    fn prop_awaited_questions_alternate(
        exchanges in prop::collection::vec(("[A-Za-z]{1,10}", arb_text()), 0..15),
    ) {
        let mut state = Session::new();
        for (question, answer) in &exchanges {
            state = transition(&state, Event::SubmitQuestion { question: question.clone() })
                .unwrap()
                .new_state;
            let generation = state.generation;
            state = transition(&state, Event::AnswerReceived { generation, answer: answer.clone() })
                .unwrap()
                .new_state;
        }

        prop_assert_eq!(state.log.len(), 2 * exchanges.len());
        for (i, turn) in state.log.turns().iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            prop_assert_eq!(turn.role, expected);
            let (question, answer) = &exchanges[i / 2];
            let expected_content = if i % 2 == 0 { question } else { answer };
            prop_assert_eq!(&turn.content, expected_content);
        }
    }

    /// Reset always lands on an empty landing session.
    #[test]
    fn prop_reset_always_returns_to_landing(steps in prop::collection::vec(arb_step(), 0..40)) {
        let mut state = Session::new();
        for step in steps {
            let event = to_event(&state, step);
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
            }
        }

        let fresh = transition(&state, Event::ResetSession).unwrap().new_state;
        prop_assert!(fresh.summary.is_none());
        prop_assert!(fresh.log.is_empty());
        prop_assert!(fresh.url.is_empty());
        prop_assert_eq!(fresh.view(), View::Landing);
        prop_assert!(fresh.generation > state.generation);
    }
}
