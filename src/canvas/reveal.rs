//! Progressive reveal of generated text
//!
//! The assistant returns a whole document at once; the canvas shows it
//! growing a few characters at a time. [`Reveal`] yields the successive
//! prefixes and the caller decides how to wait between steps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::document::CanvasCommand;

/// Delay between steps
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealOptions {
    pub step_delay: Duration,
    pub chars_per_step: usize,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            step_delay: DEFAULT_STEP_DELAY,
            chars_per_step: 1,
        }
    }
}

/// Successive char-boundary prefixes of a text
#[derive(Debug, Clone)]
pub struct Reveal {
    text: String,
    shown: usize,
    chars_per_step: usize,
}

impl Reveal {
    pub fn new(text: impl Into<String>, chars_per_step: usize) -> Self {
        Self {
            text: text.into(),
            shown: 0,
            chars_per_step: chars_per_step.max(1),
        }
    }

    /// Advance one step. Returns the new prefix, or `None` once the whole
    /// text has been shown.
    pub fn next_prefix(&mut self) -> Option<&str> {
        if self.is_done() {
            return None;
        }
        let rest = &self.text[self.shown..];
        let advance = rest
            .char_indices()
            .nth(self.chars_per_step)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.shown += advance;
        Some(&self.text[..self.shown])
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.text.len()
    }

    /// Prefix shown so far
    pub fn shown(&self) -> &str {
        &self.text[..self.shown]
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Shared flag that stops a running reveal (e.g. when the panel closes)
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    Completed,
    Cancelled,
}

/// Feed `text` to `sink` as [`CanvasCommand::Reveal`] steps, sleeping
/// between steps. The last step is marked `done`, including on cancel,
/// where it carries the prefix shown so far.
#[cfg(feature = "native")]
pub async fn reveal_into<F>(
    text: &str,
    options: RevealOptions,
    cancel: &CancelHandle,
    mut sink: F,
) -> RevealOutcome
where
    F: FnMut(CanvasCommand),
{
    let mut reveal = Reveal::new(text, options.chars_per_step);

    if reveal.is_done() {
        sink(CanvasCommand::Reveal {
            text: String::new(),
            done: true,
        });
        return RevealOutcome::Completed;
    }

    loop {
        if cancel.is_cancelled() {
            tracing::debug!(shown = reveal.shown().len(), "reveal cancelled");
            sink(CanvasCommand::Reveal {
                text: reveal.shown().to_string(),
                done: true,
            });
            return RevealOutcome::Cancelled;
        }
        tokio::time::sleep(options.step_delay).await;

        let Some(prefix) = reveal.next_prefix().map(str::to_string) else {
            return RevealOutcome::Completed;
        };
        let done = reveal.is_done();
        sink(CanvasCommand::Reveal { text: prefix, done });
        if done {
            return RevealOutcome::Completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasDocument;

    #[test]
    fn test_prefixes_char_by_char() {
        let mut reveal = Reveal::new("ab中", 1);
        assert_eq!(reveal.next_prefix(), Some("a"));
        assert_eq!(reveal.next_prefix(), Some("ab"));
        assert_eq!(reveal.next_prefix(), Some("ab中"));
        assert_eq!(reveal.next_prefix(), None);
        assert!(reveal.is_done());
    }

    #[test]
    fn test_prefixes_multiple_chars() {
        let mut reveal = Reveal::new("abcde", 2);
        assert_eq!(reveal.next_prefix(), Some("ab"));
        assert_eq!(reveal.next_prefix(), Some("abcd"));
        assert_eq!(reveal.next_prefix(), Some("abcde"));
        assert_eq!(reveal.next_prefix(), None);
    }

    #[test]
    fn test_zero_step_is_one_char() {
        let mut reveal = Reveal::new("xy", 0);
        assert_eq!(reveal.next_prefix(), Some("x"));
    }

    #[tokio::test]
    async fn test_reveal_into_document() {
        let mut doc = CanvasDocument::new("T", "");
        let options = RevealOptions {
            step_delay: Duration::from_millis(0),
            chars_per_step: 3,
        };

        let outcome = reveal_into("# Report\nbody", options, &CancelHandle::new(), |cmd| {
            doc.apply(cmd);
        })
        .await;

        assert_eq!(outcome, RevealOutcome::Completed);
        assert_eq!(doc.content(), "# Report\nbody");
        assert_eq!(doc.history().len(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_reveal_stops() {
        let mut doc = CanvasDocument::new("T", "");
        let cancel = CancelHandle::new();
        let handle = cancel.clone();
        let mut steps = 0;

        let outcome = reveal_into(
            "a long generated document",
            RevealOptions {
                step_delay: Duration::from_millis(0),
                chars_per_step: 1,
            },
            &cancel,
            |cmd| {
                if let CanvasCommand::Reveal { done: false, .. } = cmd {
                    steps += 1;
                    if steps == 3 {
                        handle.cancel();
                    }
                }
                doc.apply(cmd);
            },
        )
        .await;

        assert_eq!(outcome, RevealOutcome::Cancelled);
        assert_eq!(steps, 3);
        assert_eq!(doc.content(), "a l");
        assert_eq!(doc.content(), doc.history().current());
        assert_eq!(doc.history().len(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_reveal_survives_undo_redo() {
        let mut doc = CanvasDocument::new("T", "");
        let cancel = CancelHandle::new();
        let handle = cancel.clone();
        let mut steps = 0;

        reveal_into(
            "abcdef",
            RevealOptions {
                step_delay: Duration::from_millis(0),
                chars_per_step: 1,
            },
            &cancel,
            |cmd| {
                steps += 1;
                if steps == 3 {
                    handle.cancel();
                }
                doc.apply(cmd);
            },
        )
        .await;
        assert_eq!(doc.content(), "abc");

        doc.apply(CanvasCommand::Edit("abc!".into()));
        doc.apply(CanvasCommand::Undo);
        assert_eq!(doc.content(), "abc");
        doc.apply(CanvasCommand::Undo);
        assert_eq!(doc.content(), "");
        doc.apply(CanvasCommand::Redo);
        assert_eq!(doc.content(), "abc");
    }

    #[test]
    fn test_shown_tracks_prefix() {
        let mut reveal = Reveal::new("xyz", 2);
        assert_eq!(reveal.shown(), "");
        reveal.next_prefix();
        assert_eq!(reveal.shown(), "xy");
    }
}
