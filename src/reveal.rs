//! Incremental "typing" reveal of the newest assistant message
//!
//! The revealer is a presentation-only cursor over the target text. It never
//! holds back data from the conversation log: callers always pass the full
//! text in and get back the prefix that should currently be on screen.

use crate::session::Generation;

/// Identity of a revealed message: which session it belongs to and where it
/// sits in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RevealKey {
    pub generation: Generation,
    pub index: usize,
}

impl RevealKey {
    pub fn new(generation: Generation, index: usize) -> Self {
        Self { generation, index }
    }
}

#[derive(Debug, Clone)]
struct Reveal {
    key: RevealKey,
    text: String,
    /// Byte offset of the end of the visible prefix, always on a char boundary
    shown: usize,
}

impl Reveal {
    fn is_complete(&self) -> bool {
        self.shown >= self.text.len()
    }
}

/// Tick-driven reveal of one message at a time
#[derive(Debug, Clone)]
pub struct TypingRevealer {
    /// Code points revealed per tick
    step: usize,
    active: Option<Reveal>,
}

impl Default for TypingRevealer {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TypingRevealer {
    pub fn new(step: usize) -> Self {
        Self {
            step: step.max(1),
            active: None,
        }
    }

    /// Point the revealer at a message.
    ///
    /// Same key and text: nothing happens, so re-rendering never replays.
    /// Anything else abandons the current reveal and starts over from an
    /// empty prefix. Returns `true` when a fresh reveal was started.
    pub fn sync(&mut self, key: RevealKey, text: &str) -> bool {
        if let Some(reveal) = &self.active {
            if reveal.key == key && reveal.text == text {
                return false;
            }
        }
        self.active = Some(Reveal {
            key,
            text: text.to_string(),
            shown: 0,
        });
        true
    }

    /// Reveal the next `step` code points. Returns `true` if anything changed.
    pub fn tick(&mut self) -> bool {
        let Some(reveal) = self.active.as_mut() else {
            return false;
        };
        if reveal.is_complete() {
            return false;
        }
        let rest = reveal.text.get(reveal.shown..).unwrap_or_default();
        let advance = rest
            .char_indices()
            .nth(self.step)
            .map_or(rest.len(), |(offset, _)| offset);
        reveal.shown += advance;
        true
    }

    /// Jump straight to the full text.
    pub fn finish(&mut self) {
        if let Some(reveal) = self.active.as_mut() {
            reveal.shown = reveal.text.len();
        }
    }

    /// Forget the current reveal entirely.
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// A reveal is running and has not reached the end yet.
    pub fn is_revealing(&self) -> bool {
        self.active.as_ref().is_some_and(|r| !r.is_complete())
    }

    /// Text that should be on screen for `text` under `key`.
    ///
    /// Anything the revealer is not currently animating is shown in full.
    pub fn visible<'a>(&self, key: RevealKey, text: &'a str) -> &'a str {
        match &self.active {
            Some(reveal) if reveal.key == key && reveal.text == text => {
                text.get(..reveal.shown).unwrap_or(text)
            }
            _ => text,
        }
    }
}
