//! Session runtime executor

use super::Notice;
use crate::client::ArticleBackend;
use crate::session::{transition, Effect, Event, Session};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Runs the session state machine against a backend
pub struct SessionRuntime<B>
where
    B: ArticleBackend + 'static,
{
    state: Session,
    backend: Arc<B>,
    event_rx: mpsc::Receiver<Event>,
    /// Upgraded for request tasks so their results come back as events.
    /// Weak so the runtime stops once every handle is gone.
    event_tx: mpsc::WeakSender<Event>,
    state_tx: watch::Sender<Session>,
    notice_tx: broadcast::Sender<Notice>,
    shutdown: CancellationToken,
}

impl<B> SessionRuntime<B>
where
    B: ArticleBackend + 'static,
{
    pub fn new(
        backend: B,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::WeakSender<Event>,
        state_tx: watch::Sender<Session>,
        notice_tx: broadcast::Sender<Notice>,
        shutdown: CancellationToken,
    ) -> Self {
        let state = state_tx.borrow().clone();
        Self {
            state,
            backend: Arc::new(backend),
            event_rx,
            event_tx,
            state_tx,
            notice_tx,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Starting session runtime");

        loop {
            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => break,
                event = self.event_rx.recv() => match event {
                    Some(event) => self.process_event(event),
                    None => break,
                },
            }
        }

        tracing::info!(generation = %self.state.generation, "Session runtime stopped");
    }

    fn process_event(&mut self, event: Event) {
        let name = event.name();

        if let Some(generation) = event.generation() {
            if !self.state.is_current(generation) {
                tracing::debug!(
                    event = name,
                    %generation,
                    current = %self.state.generation,
                    "Discarding result from a previous session"
                );
                return;
            }
        }

        let result = match transition(&self.state, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(event = name, error = %e, "Action rejected");
                let _ = self.notice_tx.send(Notice::Rejected(e));
                return;
            }
        };

        // Publish the whole new session at once, before any effect runs
        if result.new_state != self.state {
            self.state = result.new_state;
            self.state_tx.send_replace(self.state.clone());
            tracing::debug!(
                event = name,
                generation = %self.state.generation,
                loading = self.state.is_loading,
                composing = self.state.is_composing(),
                turns = self.state.log.len(),
                "Session updated"
            );
        }

        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::FetchArticle { generation, url } => {
                tracing::debug!(%generation, %url, "Requesting article");
                let backend = Arc::clone(&self.backend);
                let fallback = Event::ArticleFailed {
                    generation,
                    url: url.clone(),
                    message: "Article request aborted".to_string(),
                };
                self.spawn_request(
                    async move {
                        match backend.load_article(&url).await {
                            Ok(response) => Event::ArticleLoaded {
                                generation,
                                url,
                                summary: response.into_payload(),
                            },
                            Err(e) => Event::ArticleFailed {
                                generation,
                                url,
                                message: e.to_string(),
                            },
                        }
                    },
                    fallback,
                );
            }

            Effect::AskQuestion {
                generation,
                question,
            } => {
                tracing::debug!(%generation, "Requesting answer");
                let backend = Arc::clone(&self.backend);
                let fallback = Event::AnswerFailed {
                    generation,
                    message: "Question request aborted".to_string(),
                };
                self.spawn_request(
                    async move {
                        match backend.ask(&question).await {
                            Ok(response) => Event::AnswerReceived {
                                generation,
                                answer: response.answer,
                            },
                            Err(e) => Event::AnswerFailed {
                                generation,
                                message: e.to_string(),
                            },
                        }
                    },
                    fallback,
                );
            }

            Effect::RaiseAlert { message } => {
                tracing::warn!(alert = %message, "Alerting user");
                let _ = self.notice_tx.send(Notice::Alert(message));
            }

            Effect::ReportLoadFailure { url, message } => {
                tracing::warn!(%url, error = %message, "Article failed to load");
            }

            Effect::ReportAskFailure { question, message } => {
                tracing::warn!(%question, error = %message, "Question went unanswered");
            }
        }
    }

    /// Run a backend call in its own task and feed its outcome back as an
    /// event. If the call dies without producing one, `fallback` is sent so
    /// the pending flag is always cleared.
    fn spawn_request<F>(&self, request: F, fallback: Event)
    where
        F: Future<Output = Event> + Send + 'static,
    {
        // Every handle is gone; nobody is left to see the result
        let Some(event_tx) = self.event_tx.upgrade() else {
            tracing::debug!(event = fallback.name(), "Dropping request, no handles left");
            return;
        };
        let task = tokio::spawn(request);
        tokio::spawn(async move {
            let event = match task.await {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!(error = %e, event = fallback.name(), "Backend request task failed");
                    fallback
                }
            };
            // Only fails once the runtime is gone, and then nobody cares
            let _ = event_tx.send(event).await;
        });
    }
}
