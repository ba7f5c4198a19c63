//! Terminal client
//!
//! [`App`] is the presentation state (inputs, reveal cursor, alert, scroll)
//! layered over the latest session snapshot. Key presses are turned into
//! [`Command`]s, which the event loop forwards to the session controller.

mod clipboard;
mod input;
mod view;

use crate::controller::{ControllerStopped, Notice, SessionHandle};
use crate::reveal::{RevealKey, TypingRevealer};
use crate::session::{Session, View};
use crate::summary::copy_synthesis;
use crossterm::event::{Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use input::InputField;
use ratatui::DefaultTerminal;
use std::io;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::MissedTickBehavior;

const SCROLL_STEP: u16 = 5;

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("Terminal error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Stopped(#[from] ControllerStopped),
}

/// What a key press asks the controller (or terminal) to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load(String),
    Ask(String),
    Reset,
    Copy(String),
    Quit,
}

/// Which input receives typing on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Url,
    Question,
}

/// Presentation state of the terminal client
#[derive(Debug)]
pub struct App {
    session: Session,
    url_input: InputField,
    question_input: InputField,
    focus: Focus,
    revealer: TypingRevealer,
    /// Blocking alert; swallows input until dismissed
    alert: Option<String>,
    /// One-line transient status in the footer
    status: Option<String>,
    summary_scroll: u16,
    should_quit: bool,
}

impl App {
    pub fn new(reveal_step: usize) -> Self {
        Self {
            session: Session::new(),
            url_input: InputField::new(),
            question_input: InputField::new(),
            focus: Focus::Question,
            revealer: TypingRevealer::new(reveal_step),
            alert: None,
            status: None,
            summary_scroll: 0,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The question input accepts a submission.
    pub fn can_ask(&self) -> bool {
        self.session.has_summary() && !self.session.is_composing() && !self.session.is_loading
    }

    /// The URL input accepts a submission.
    pub fn can_load(&self) -> bool {
        !self.session.is_loading && !self.session.is_composing()
    }

    /// Take in a new session snapshot.
    pub fn apply_snapshot(&mut self, session: Session) {
        if session.generation != self.session.generation || session.url != self.session.url {
            self.summary_scroll = 0;
        }
        if session.generation != self.session.generation {
            self.focus = Focus::Question;
        }
        if session.url != self.session.url {
            self.url_input.set(session.url.clone());
        }
        self.session = session;
        self.sync_reveal();
    }

    fn sync_reveal(&mut self) {
        match self.session.log.reveal_candidate() {
            Some((index, turn)) => {
                let key = RevealKey::new(self.session.generation, index);
                self.revealer.sync(key, &turn.content);
            }
            None => self.revealer.clear(),
        }
    }

    pub fn apply_notice(&mut self, notice: Notice) {
        match notice {
            Notice::Alert(message) => self.alert = Some(message),
            Notice::Rejected(e) => self.status = Some(e.to_string()),
        }
    }

    pub fn is_revealing(&self) -> bool {
        self.revealer.is_revealing()
    }

    /// Advance the typing reveal by one tick.
    pub fn on_reveal_tick(&mut self) -> bool {
        self.revealer.tick()
    }

    /// Text to show for the turn at `index`.
    pub fn visible_text(&self, index: usize) -> &str {
        let Some(turn) = self.session.log.turns().get(index) else {
            return "";
        };
        let key = RevealKey::new(self.session.generation, index);
        self.revealer.visible(key, &turn.content)
    }

    /// Translate a key press into a command, updating local state on the way.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Some(Command::Quit);
        }

        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.alert = None;
            }
            return None;
        }

        self.status = None;

        if ctrl {
            return match key.code {
                KeyCode::Char('r') => {
                    self.url_input.take();
                    self.question_input.take();
                    self.revealer.clear();
                    Some(Command::Reset)
                }
                KeyCode::Char('y') => self.copy_command(),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Esc => {
                self.revealer.finish();
                None
            }
            KeyCode::PageUp => {
                self.summary_scroll = self.summary_scroll.saturating_sub(SCROLL_STEP);
                None
            }
            KeyCode::PageDown => {
                self.summary_scroll = self.summary_scroll.saturating_add(SCROLL_STEP);
                None
            }
            KeyCode::Tab | KeyCode::BackTab if self.session.view() == View::Dashboard => {
                self.focus = match self.focus {
                    Focus::Url => Focus::Question,
                    Focus::Question => Focus::Url,
                };
                None
            }
            KeyCode::Enter => self.submit(),
            _ => {
                if let Some(field) = self.active_input() {
                    edit(field, key.code);
                }
                None
            }
        }
    }

    fn submit(&mut self) -> Option<Command> {
        match self.active_target() {
            // The URL stays in the field so a failed load can be corrected
            Some(Focus::Url) if self.can_load() && !self.url_input.is_blank() => {
                Some(Command::Load(self.url_input.value().trim().to_string()))
            }
            Some(Focus::Question) if self.can_ask() && !self.question_input.is_blank() => {
                Some(Command::Ask(self.question_input.take()))
            }
            _ => None,
        }
    }

    fn copy_command(&mut self) -> Option<Command> {
        match self.session.summary.as_ref().map(crate::summary::SummaryPayload::parse) {
            Some(Ok(doc)) => {
                self.status = Some("Synthesis copied to clipboard".to_string());
                Some(Command::Copy(copy_synthesis(&doc)))
            }
            _ => {
                self.status = Some("Nothing to copy".to_string());
                None
            }
        }
    }

    /// Which input is live right now, if any
    fn active_target(&self) -> Option<Focus> {
        match self.session.view() {
            View::Landing => Some(Focus::Url),
            View::Dashboard if self.session.is_analyzing() => None,
            View::Dashboard => Some(self.focus),
        }
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.active_target()? {
            Focus::Url => Some(&mut self.url_input),
            Focus::Question => Some(&mut self.question_input),
        }
    }
}

fn edit(field: &mut InputField, code: KeyCode) {
    match code {
        KeyCode::Char(c) => field.insert(c),
        KeyCode::Backspace => field.backspace(),
        KeyCode::Delete => field.delete(),
        KeyCode::Left => field.move_left(),
        KeyCode::Right => field.move_right(),
        KeyCode::Home => field.move_home(),
        KeyCode::End => field.move_end(),
        _ => {}
    }
}

/// Take over the terminal and run until the user quits.
///
/// # Errors
///
/// Terminal I/O failures, or the session runtime going away.
pub async fn run(
    handle: SessionHandle,
    initial_url: Option<String>,
    reveal_tick: Duration,
    reveal_step: usize,
) -> Result<(), TuiError> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &handle, initial_url, reveal_tick, reveal_step).await;
    ratatui::restore();
    result
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    handle: &SessionHandle,
    initial_url: Option<String>,
    reveal_tick: Duration,
    reveal_step: usize,
) -> Result<(), TuiError> {
    let mut app = App::new(reveal_step);
    let mut state_rx = handle.subscribe();
    let mut notices = handle.notices();
    // Subscribed first so a fast failure still raises its alert
    if let Some(url) = initial_url {
        handle.load_article(url).await?;
    }
    let mut terminal_events = EventStream::new();
    let mut ticker = tokio::time::interval(reveal_tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    app.apply_snapshot(state_rx.borrow_and_update().clone());

    loop {
        terminal.draw(|frame| view::draw(frame, &app))?;

        tokio::select! {
            maybe_event = terminal_events.next() => match maybe_event {
                Some(Ok(TermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(command) = app.handle_key(key) {
                        execute(handle, command).await?;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let session = state_rx.borrow_and_update().clone();
                app.apply_snapshot(session);
            },
            notice = notices.recv() => match notice {
                Ok(notice) => app.apply_notice(notice),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Dropped session notices");
                }
                Err(RecvError::Closed) => break,
            },
            _ = ticker.tick(), if app.is_revealing() => {
                app.on_reveal_tick();
            },
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

async fn execute(handle: &SessionHandle, command: Command) -> Result<(), TuiError> {
    match command {
        Command::Load(url) => handle.load_article(url).await?,
        Command::Ask(question) => handle.submit_question(question).await?,
        Command::Reset => handle.reset_session().await?,
        Command::Copy(text) => {
            if let Err(e) = clipboard::copy_to_clipboard(&text) {
                tracing::warn!(error = %e, "Clipboard export failed");
            }
        }
        Command::Quit => {}
    }
    Ok(())
}
