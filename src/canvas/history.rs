//! Linear undo/redo log
//!
//! Snapshots of the whole document text. Recording after an undo discards
//! the redo tail; there are no branches.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl EditHistory {
    /// Start a log whose only entry is the content at open time
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            entries: vec![seed.into()],
            cursor: 0,
        }
    }

    /// The entry under the cursor
    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    /// Record a new snapshot. Returns `false` if it equals the current entry.
    pub fn record(&mut self, content: &str) -> bool {
        if content == self.current() {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(content.to_string());
        self.cursor = self.entries.len() - 1;
        true
    }

    pub fn undo(&mut self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn redo(&mut self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_with_initial_content() {
        let history = EditHistory::new("A");
        assert_eq!(history.current(), "A");
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_undo_redo() {
        let mut history = EditHistory::new("A");
        assert!(history.record("AB"));
        assert!(history.record("ABC"));

        assert_eq!(history.undo(), Some("AB"));
        assert_eq!(history.undo(), Some("A"));
        assert_eq!(history.undo(), None);

        assert_eq!(history.redo(), Some("AB"));
        assert_eq!(history.redo(), Some("ABC"));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_record_same_content_is_noop() {
        let mut history = EditHistory::new("A");
        assert!(!history.record("A"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_record_after_undo_drops_redo_tail() {
        let mut history = EditHistory::new("A");
        history.record("AB");
        history.record("ABC");
        history.undo();

        assert!(history.record("ABX"));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(history.undo(), Some("AB"));
    }

    #[test]
    fn test_undo_then_redo_restores_content() {
        let mut history = EditHistory::new("");
        for text in ["a", "ab", "abc"] {
            history.record(text);
        }
        let before = history.current().to_string();
        history.undo();
        history.redo();
        assert_eq!(history.current(), before);
    }
}
