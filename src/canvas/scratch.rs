//! Scratch persistence and document export
//!
//! A single scratch slot (`canvas_draft`) holds the last saved canvas
//! document. Saving overwrites it; it is only read back by an explicit
//! restore.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::document::CanvasDocument;

/// Storage key (and file stem) of the scratch slot
pub const SCRATCH_KEY: &str = "canvas_draft";

#[derive(Error, Debug)]
pub enum ScratchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type ScratchResult<T> = Result<T, ScratchError>;

/// Saved document snapshot; `timestamp` is milliseconds since the epoch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScratchDraft {
    pub title: String,
    pub content: String,
    pub timestamp: i64,
}

impl ScratchDraft {
    pub fn capture(document: &CanvasDocument) -> Self {
        Self {
            title: document.title().to_string(),
            content: document.content().to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Reopen the snapshot as a fresh document (new undo log)
    pub fn into_document(self) -> CanvasDocument {
        CanvasDocument::new(self.title, self.content)
    }
}

/// Backend of the scratch slot
pub trait ScratchStore {
    fn save(&self, draft: &ScratchDraft) -> ScratchResult<()>;
    fn load(&self) -> ScratchResult<Option<ScratchDraft>>;
}

/// Scratch slot as a JSON file in a directory
#[derive(Debug, Clone)]
pub struct FileScratchStore {
    path: PathBuf,
}

impl FileScratchStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", SCRATCH_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScratchStore for FileScratchStore {
    fn save(&self, draft: &ScratchDraft) -> ScratchResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(draft)?)?;
        tracing::debug!(path = %self.path.display(), "scratch draft saved");
        Ok(())
    }

    fn load(&self) -> ScratchResult<Option<ScratchDraft>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }
}

// ============================================
// Export
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Md,
    Txt,
}

impl DocumentFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Md => "md",
            DocumentFormat::Txt => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        "text/plain;charset=utf-8"
    }
}

/// Title with every char outside ASCII alphanumerics and the CJK unified
/// ideographs block (U+4E00..=U+9FA5) replaced by `_`, plus the extension
pub fn export_filename(title: &str, format: DocumentFormat) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || ('\u{4e00}'..='\u{9fa5}').contains(&c) {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.{}", stem, format.extension())
}

/// Write the raw content to `dir` and return the file path
pub fn export_document(
    document: &CanvasDocument,
    format: DocumentFormat,
    dir: impl AsRef<Path>,
) -> ScratchResult<PathBuf> {
    let path = dir
        .as_ref()
        .join(export_filename(document.title(), format));
    fs::write(&path, document.content())?;
    tracing::info!(path = %path.display(), "document exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename("Q3 销售报告 (v2)", DocumentFormat::Md),
            "Q3_销售报告__v2_.md"
        );
        assert_eq!(export_filename("", DocumentFormat::Txt), ".txt");
    }

    #[test]
    fn test_scratch_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileScratchStore::new(dir.path());
        assert!(store.load().unwrap().is_none());

        let doc = CanvasDocument::new("Plan", "# Plan\n- item");
        let draft = ScratchDraft::capture(&doc);
        store.save(&draft).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, draft);
        assert!(store.path().ends_with("canvas_draft.json"));

        let restored = loaded.into_document();
        assert_eq!(restored.content(), "# Plan\n- item");
        assert!(!restored.can_undo());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = FileScratchStore::new(dir.path());

        store
            .save(&ScratchDraft {
                title: "a".into(),
                content: "first".into(),
                timestamp: 1,
            })
            .unwrap();
        store
            .save(&ScratchDraft {
                title: "b".into(),
                content: "second".into(),
                timestamp: 2,
            })
            .unwrap();

        assert_eq!(store.load().unwrap().unwrap().content, "second");
    }

    #[test]
    fn test_export_document() {
        let dir = TempDir::new().unwrap();
        let doc = CanvasDocument::new("周报", "本周完成。");
        let path = export_document(&doc, DocumentFormat::Txt, dir.path()).unwrap();

        assert!(path.ends_with("周报.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "本周完成。");
    }
}
