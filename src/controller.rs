//! Session controller runtime
//!
//! Owns the single [`Session`] of the client, funnels every mutation through
//! the pure transition function and performs the resulting effects. Callers
//! interact through a cloneable [`SessionHandle`]; renderers subscribe to
//! whole-session snapshots so they never observe a half-applied transition.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;

use crate::client::ArticleBackend;
use crate::session::{Event, Session, TransitionError};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

const EVENT_CHANNEL_CAPACITY: usize = 32;
const NOTICE_CHANNEL_CAPACITY: usize = 16;

/// Out-of-band messages for the user interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Blocking alert (failed article load)
    Alert(String),
    /// An action was refused because another request is pending
    Rejected(TransitionError),
}

/// The runtime is gone
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Session runtime has stopped")]
pub struct ControllerStopped;

/// Handle to interact with the running session
#[derive(Clone)]
pub struct SessionHandle {
    event_tx: mpsc::Sender<Event>,
    state_rx: watch::Receiver<Session>,
    notice_tx: broadcast::Sender<Notice>,
}

impl SessionHandle {
    /// Load an article; blank URLs are ignored.
    ///
    /// # Errors
    ///
    /// Fails only if the runtime has stopped.
    pub async fn load_article(&self, url: impl Into<String>) -> Result<(), ControllerStopped> {
        self.send(Event::LoadArticle { url: url.into() }).await
    }

    /// Ask a question; blank questions are ignored.
    ///
    /// # Errors
    ///
    /// Fails only if the runtime has stopped.
    pub async fn submit_question(
        &self,
        question: impl Into<String>,
    ) -> Result<(), ControllerStopped> {
        self.send(Event::SubmitQuestion {
            question: question.into(),
        })
        .await
    }

    /// Start over with an empty session. In-flight requests keep running but
    /// their results are dropped.
    ///
    /// # Errors
    ///
    /// Fails only if the runtime has stopped.
    pub async fn reset_session(&self) -> Result<(), ControllerStopped> {
        self.send(Event::ResetSession).await
    }

    /// Current session state
    pub fn snapshot(&self) -> Session {
        self.state_rx.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state_rx.clone()
    }

    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.notice_tx.subscribe()
    }

    async fn send(&self, event: Event) -> Result<(), ControllerStopped> {
        self.event_tx.send(event).await.map_err(|_| ControllerStopped)
    }
}

/// Start a session runtime on the current tokio runtime.
///
/// The runtime stops when `shutdown` is cancelled or every handle is dropped.
pub fn spawn_session<B>(backend: B, shutdown: CancellationToken) -> SessionHandle
where
    B: ArticleBackend + 'static,
{
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (state_tx, state_rx) = watch::channel(Session::new());
    let (notice_tx, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);

    let runtime = SessionRuntime::new(
        backend,
        event_rx,
        event_tx.downgrade(),
        state_tx,
        notice_tx.clone(),
        shutdown,
    );
    tokio::spawn(runtime.run());

    SessionHandle {
        event_tx,
        state_rx,
        notice_tx,
    }
}
