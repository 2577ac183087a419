//! Canvas Panel State
//!
//! The document open in the side panel, its display mode and the timer
//! that reveals generated text.

use gloo_timers::callback::{Interval, Timeout};
use leptos::*;
use shopdesk::assistant::GeneratedDocument;
use shopdesk::canvas::{
    export_filename, CancelHandle, CanvasCommand, CanvasDocument, DocumentFormat, EditorMode,
    Reveal, RevealOptions, ScratchDraft, ScratchError, ScratchStore,
};
use shopdesk::{Locale, Message};

use crate::api::{download, LocalScratchStore};

#[derive(Clone, Copy)]
pub struct CanvasState {
    pub open: RwSignal<bool>,
    pub document: RwSignal<CanvasDocument>,
    pub mode: RwSignal<EditorMode>,
    /// Generated text is still being revealed
    pub revealing: RwSignal<bool>,
    timer: StoredValue<Option<Interval>>,
    cancel: StoredValue<CancelHandle>,
}

impl CanvasState {
    pub fn new(locale: Locale) -> Self {
        Self {
            open: create_rw_signal(false),
            document: create_rw_signal(CanvasDocument::untitled(locale)),
            mode: create_rw_signal(EditorMode::Split),
            revealing: create_rw_signal(false),
            timer: store_value(None),
            cancel: store_value(CancelHandle::new()),
        }
    }

    pub fn apply(&self, command: CanvasCommand) {
        self.document.update(|doc| {
            doc.apply(command);
        });
    }

    /// Open a generated document and reveal its content step by step
    pub fn open_generated(&self, generated: &GeneratedDocument, options: RevealOptions) {
        self.stop_reveal();
        self.document.set(CanvasDocument::new(generated.title.clone(), ""));
        self.open.set(true);

        let mut reveal = Reveal::new(generated.content.clone(), options.chars_per_step);
        if reveal.is_done() {
            self.apply(CanvasCommand::Reveal {
                text: String::new(),
                done: true,
            });
            return;
        }

        let cancel = CancelHandle::new();
        self.cancel.set_value(cancel.clone());
        self.revealing.set(true);

        let state = *self;
        let step_ms = options.step_delay.as_millis().max(1) as u32;
        let interval = Interval::new(step_ms, move || {
            if cancel.is_cancelled() {
                return;
            }
            let Some(prefix) = reveal.next_prefix().map(str::to_string) else {
                return;
            };
            let done = reveal.is_done();
            state.apply(CanvasCommand::Reveal { text: prefix, done });
            if done {
                cancel.cancel();
                state.revealing.set(false);
                // The interval cannot be dropped from inside its own tick
                Timeout::new(0, move || state.timer.set_value(None)).forget();
            }
        });
        self.timer.set_value(Some(interval));
    }

    /// Stop a running reveal, keeping what has been shown so far as a
    /// history entry
    pub fn stop_reveal(&self) {
        self.cancel.with_value(CancelHandle::cancel);
        self.timer.set_value(None);
        if self.revealing.get_untracked() {
            let shown = self.document.with_untracked(|doc| doc.content().to_string());
            self.apply(CanvasCommand::Reveal {
                text: shown,
                done: true,
            });
        }
        self.revealing.set(false);
    }

    pub fn close(&self) {
        self.stop_reveal();
        self.open.set(false);
    }

    pub fn save_scratch(&self) -> Result<Message, ScratchError> {
        let draft = self.document.with_untracked(ScratchDraft::capture);
        LocalScratchStore.save(&draft)?;
        Ok(Message::DraftSaved)
    }

    /// Replace the open document with the scratch draft, if there is one
    pub fn restore_scratch(&self) -> Result<Message, ScratchError> {
        match LocalScratchStore.load()? {
            Some(draft) => {
                self.stop_reveal();
                self.document.set(draft.into_document());
                Ok(Message::DraftRestored)
            }
            None => Ok(Message::NoScratchDraft),
        }
    }

    pub fn export(&self, format: DocumentFormat) -> Result<(), String> {
        self.document.with_untracked(|doc| {
            download(
                &export_filename(doc.title(), format),
                doc.content(),
                format.mime_type(),
            )
        })
    }
}

/// Convert a DOM selection offset (UTF-16 code units) into a char offset
pub fn utf16_to_char_offset(text: &str, utf16_offset: u32) -> usize {
    let mut units = 0u32;
    for (chars, ch) in text.chars().enumerate() {
        if units >= utf16_offset {
            return chars;
        }
        units += ch.len_utf16() as u32;
    }
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16_offsets() {
        assert_eq!(utf16_to_char_offset("hello", 3), 3);
        assert_eq!(utf16_to_char_offset("订单报告", 2), 2);
        // U+1F4C8 is a surrogate pair in UTF-16
        assert_eq!(utf16_to_char_offset("📈销售", 2), 1);
        assert_eq!(utf16_to_char_offset("abc", 99), 3);
    }
}
