//! Client session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! user actions and collaborator results come in as [`Event`]s, the
//! [`transition`] function computes the next [`Session`] plus the
//! [`Effect`]s the runtime has to perform.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{Generation, Session, View};
pub use transition::{transition, TransitionError, TransitionResult};
