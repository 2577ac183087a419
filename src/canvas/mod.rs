//! Canvas Editor
//!
//! Markdown document editing for the assistant panel.
//!
//! ## Architecture
//!
//! - **Document**: content, title, selection and the undo log, mutated
//!   through [`CanvasCommand`]
//! - **Markdown**: preview renderer
//! - **Reveal**: progressive display of generated text
//! - **Scratch**: single-slot draft persistence and file export

mod document;
mod history;
pub mod markdown;
mod reveal;
mod scratch;

pub use document::{CanvasCommand, CanvasDocument, EditorMode, Format, RewriteAction, Selection};
pub use history::EditHistory;
pub use markdown::render;
#[cfg(feature = "native")]
pub use reveal::reveal_into;
pub use reveal::{CancelHandle, Reveal, RevealOptions, RevealOutcome, DEFAULT_STEP_DELAY};
pub use scratch::{
    export_document, export_filename, DocumentFormat, FileScratchStore, ScratchDraft, ScratchError,
    ScratchResult, ScratchStore, SCRATCH_KEY,
};
