//! Canvas document buffer
//!
//! The editable document behind the canvas panel. All mutations go through
//! [`CanvasDocument::apply`] with a [`CanvasCommand`], which keeps the
//! content, the undo log and the selection consistent.
//!
//! Positions are char offsets into the content and are clamped to its
//! length.

use serde::{Deserialize, Serialize};

use super::history::EditHistory;
use crate::locale::{Locale, Message};

/// Editor layout of the canvas panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    #[default]
    Edit,
    Split,
    Preview,
}

impl EditorMode {
    pub const ALL: [EditorMode; 3] = [EditorMode::Edit, EditorMode::Split, EditorMode::Preview];

    pub fn shows_editor(&self) -> bool {
        matches!(self, EditorMode::Edit | EditorMode::Split)
    }

    pub fn shows_preview(&self) -> bool {
        matches!(self, EditorMode::Split | EditorMode::Preview)
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (EditorMode::Edit, Locale::ZhCn) => "编辑",
            (EditorMode::Split, Locale::ZhCn) => "分屏",
            (EditorMode::Preview, Locale::ZhCn) => "预览",
            (EditorMode::Edit, Locale::En) => "Edit",
            (EditorMode::Split, Locale::En) => "Split",
            (EditorMode::Preview, Locale::En) => "Preview",
        }
    }
}

/// Toolbar formatting actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Bold,
    Italic,
    Heading1,
    Heading2,
    BulletList,
    NumberedList,
    Quote,
}

impl Format {
    pub const ALL: [Format; 7] = [
        Format::Bold,
        Format::Italic,
        Format::Heading1,
        Format::Heading2,
        Format::BulletList,
        Format::NumberedList,
        Format::Quote,
    ];

    /// Text inserted before and after the selection
    pub fn markers(&self) -> (&'static str, &'static str) {
        match self {
            Format::Bold => ("**", "**"),
            Format::Italic => ("*", "*"),
            Format::Heading1 => ("# ", ""),
            Format::Heading2 => ("## ", ""),
            Format::BulletList => ("- ", ""),
            Format::NumberedList => ("1. ", ""),
            Format::Quote => ("> ", ""),
        }
    }

    pub fn title(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Format::Bold, Locale::ZhCn) => "粗体",
            (Format::Italic, Locale::ZhCn) => "斜体",
            (Format::Heading1, Locale::ZhCn) => "标题1",
            (Format::Heading2, Locale::ZhCn) => "标题2",
            (Format::BulletList, Locale::ZhCn) => "无序列表",
            (Format::NumberedList, Locale::ZhCn) => "有序列表",
            (Format::Quote, Locale::ZhCn) => "引用",
            (Format::Bold, Locale::En) => "Bold",
            (Format::Italic, Locale::En) => "Italic",
            (Format::Heading1, Locale::En) => "Heading 1",
            (Format::Heading2, Locale::En) => "Heading 2",
            (Format::BulletList, Locale::En) => "Bulleted list",
            (Format::NumberedList, Locale::En) => "Numbered list",
            (Format::Quote, Locale::En) => "Quote",
        }
    }
}

/// Local rewrite applied to the selected text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteAction {
    Improve,
    Expand,
    Simplify,
}

impl RewriteAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "improve" => Some(RewriteAction::Improve),
            "expand" => Some(RewriteAction::Expand),
            "simplify" => Some(RewriteAction::Simplify),
            _ => None,
        }
    }

    /// Rewrite `selection`. Rules operate on Chinese punctuation; the
    /// locale only picks the wording that gets added.
    pub fn apply(&self, selection: &str, locale: Locale) -> String {
        match self {
            RewriteAction::Improve => {
                let joined = selection.replace('。', "，同时").replace('，', "、");
                match locale {
                    Locale::ZhCn => format!("【优化后】{}", joined),
                    Locale::En => format!("[Improved] {}", joined),
                }
            }
            RewriteAction::Expand => {
                let elaboration = match locale {
                    Locale::ZhCn => "更进一步地说，这个观点可以从以下几个角度来理解：\n- 第一，从数据层面来看...\n- 第二，从实践经验来看...\n- 第三，从行业趋势来看...",
                    Locale::En => "Going further, this point can be understood from several angles:\n- First, from the data...\n- Second, from practical experience...\n- Third, from industry trends...",
                };
                format!("{}\n\n{}", selection, elaboration)
            }
            RewriteAction::Simplify => {
                let first = selection.split('。').next().unwrap_or_default();
                format!("{}。", first)
            }
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (RewriteAction::Improve, Locale::ZhCn) => "优化",
            (RewriteAction::Expand, Locale::ZhCn) => "扩写",
            (RewriteAction::Simplify, Locale::ZhCn) => "精简",
            (RewriteAction::Improve, Locale::En) => "Improve",
            (RewriteAction::Expand, Locale::En) => "Expand",
            (RewriteAction::Simplify, Locale::En) => "Simplify",
        }
    }
}

/// A non-empty selected range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Every way the document can change
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasCommand {
    /// Replace the whole content (keystroke in the editor)
    Edit(String),
    /// Wrap the selection (or insert at the caret) with format markers
    Insert(Format),
    /// Move the selection; `start == end` places the caret
    Select { start: usize, end: usize },
    /// Replace the first occurrence of `original` in the content
    ReplaceSelection { original: String, replacement: String },
    Undo,
    Redo,
    SetTitle(String),
    /// Streamed text from the assistant. Intermediate steps are not
    /// recorded; the final step (`done`) records one history entry.
    Reveal { text: String, done: bool },
}

#[derive(Debug, Clone)]
pub struct CanvasDocument {
    title: String,
    content: String,
    history: EditHistory,
    selection: Option<Selection>,
    caret: usize,
}

impl CanvasDocument {
    /// Open a document seeded with `content`
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            title: title.into(),
            caret: content.chars().count(),
            history: EditHistory::new(content.clone()),
            content,
            selection: None,
        }
    }

    /// Empty document with the localized placeholder title
    pub fn untitled(locale: Locale) -> Self {
        Self::new(locale.text(&Message::UntitledDocument), "")
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Apply a command. Returns whether anything changed.
    pub fn apply(&mut self, command: CanvasCommand) -> bool {
        match command {
            CanvasCommand::Edit(text) => {
                if text == self.content {
                    return false;
                }
                self.set_content(text);
                self.history.record(&self.content);
                true
            }
            CanvasCommand::Insert(format) => self.insert(format),
            CanvasCommand::Select { start, end } => self.select(start, end),
            CanvasCommand::ReplaceSelection {
                original,
                replacement,
            } => self.replace_first(&original, &replacement),
            CanvasCommand::Undo => match self.history.undo() {
                Some(entry) => {
                    let entry = entry.to_string();
                    self.set_content(entry);
                    true
                }
                None => false,
            },
            CanvasCommand::Redo => match self.history.redo() {
                Some(entry) => {
                    let entry = entry.to_string();
                    self.set_content(entry);
                    true
                }
                None => false,
            },
            CanvasCommand::SetTitle(title) => {
                if title == self.title {
                    return false;
                }
                self.title = title;
                true
            }
            CanvasCommand::Reveal { text, done } => {
                let changed = text != self.content;
                if changed {
                    self.set_content(text);
                }
                if done {
                    self.history.record(&self.content);
                }
                changed
            }
        }
    }

    /// Rewrite the current selection in place
    pub fn rewrite_selection(&mut self, action: RewriteAction, locale: Locale) -> bool {
        let Some(selection) = self.selection.clone() else {
            return false;
        };
        let replacement = action.apply(&selection.text, locale);
        self.apply(CanvasCommand::ReplaceSelection {
            original: selection.text,
            replacement,
        })
    }

    fn set_content(&mut self, content: String) {
        self.content = content;
        self.selection = None;
        self.caret = self.caret.min(self.char_count());
    }

    fn select(&mut self, start: usize, end: usize) -> bool {
        let len = self.char_count();
        let (start, end) = (start.min(len), end.min(len));
        let (start, end) = if start <= end { (start, end) } else { (end, start) };

        let next = if start == end {
            None
        } else {
            Some(Selection {
                start,
                end,
                text: slice_chars(&self.content, start, end).to_string(),
            })
        };

        let changed = next != self.selection || self.caret != end;
        self.selection = next;
        self.caret = end;
        changed
    }

    fn insert(&mut self, format: Format) -> bool {
        let (prefix, suffix) = format.markers();
        let (start, end) = match &self.selection {
            Some(selection) => (selection.start, selection.end),
            None => (self.caret, self.caret),
        };

        let selected = slice_chars(&self.content, start, end).to_string();
        let mut next = String::with_capacity(self.content.len() + prefix.len() + suffix.len());
        next.push_str(slice_chars(&self.content, 0, start));
        next.push_str(prefix);
        next.push_str(&selected);
        next.push_str(suffix);
        next.push_str(slice_chars(&self.content, end, usize::MAX));

        self.content = next;
        self.history.record(&self.content);

        // Keep the wrapped text selected, inside the markers
        let inner_start = start + prefix.chars().count();
        let inner_end = inner_start + selected.chars().count();
        self.selection = None;
        self.caret = inner_start;
        self.select(inner_start, inner_end);
        true
    }

    fn replace_first(&mut self, original: &str, replacement: &str) -> bool {
        if original.is_empty() || !self.content.contains(original) {
            return false;
        }
        let next = self.content.replacen(original, replacement, 1);
        if next == self.content {
            return false;
        }
        self.set_content(next);
        self.history.record(&self.content);
        true
    }
}

/// Slice by char offsets, clamped to the string
fn slice_chars(s: &str, start: usize, end: usize) -> &str {
    let byte_at = |offset: usize| {
        s.char_indices()
            .nth(offset)
            .map(|(i, _)| i)
            .unwrap_or(s.len())
    };
    let start = byte_at(start);
    let end = byte_at(end).max(start);
    &s[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_document() {
        let doc = CanvasDocument::new("Title", "A");
        assert_eq!(doc.content(), "A");
        assert_eq!(doc.history().current(), "A");
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_edit_undo_redo() {
        let mut doc = CanvasDocument::new("T", "A");
        assert!(doc.apply(CanvasCommand::Edit("AB".into())));
        assert!(doc.apply(CanvasCommand::Edit("ABC".into())));

        assert!(doc.apply(CanvasCommand::Undo));
        assert_eq!(doc.content(), "AB");
        assert!(doc.apply(CanvasCommand::Undo));
        assert_eq!(doc.content(), "A");
        assert!(!doc.apply(CanvasCommand::Undo));

        assert!(doc.apply(CanvasCommand::Redo));
        assert_eq!(doc.content(), "AB");
    }

    #[test]
    fn test_undo_does_not_record() {
        let mut doc = CanvasDocument::new("T", "A");
        doc.apply(CanvasCommand::Edit("AB".into()));
        doc.apply(CanvasCommand::Undo);
        assert_eq!(doc.history().len(), 2);
        assert!(doc.can_redo());
    }

    #[test]
    fn test_edit_same_content_is_noop() {
        let mut doc = CanvasDocument::new("T", "A");
        assert!(!doc.apply(CanvasCommand::Edit("A".into())));
        assert_eq!(doc.history().len(), 1);
    }

    #[test]
    fn test_bold_wraps_selection() {
        let mut doc = CanvasDocument::new("T", "hello world");
        doc.apply(CanvasCommand::Select { start: 6, end: 11 });
        assert!(doc.apply(CanvasCommand::Insert(Format::Bold)));

        assert_eq!(doc.content(), "hello **world**");
        let selection = doc.selection().unwrap();
        assert_eq!((selection.start, selection.end), (8, 13));
        assert_eq!(selection.text, "world");
        assert!(doc.can_undo());
    }

    #[test]
    fn test_heading_at_caret() {
        let mut doc = CanvasDocument::new("T", "title");
        doc.apply(CanvasCommand::Select { start: 0, end: 0 });
        doc.apply(CanvasCommand::Insert(Format::Heading1));
        assert_eq!(doc.content(), "# title");
        assert_eq!(doc.caret(), 2);
        assert!(doc.selection().is_none());
    }

    #[test]
    fn test_insert_uses_char_offsets() {
        let mut doc = CanvasDocument::new("T", "销售数据分析");
        doc.apply(CanvasCommand::Select { start: 2, end: 4 });
        assert_eq!(doc.selection().unwrap().text, "数据");

        doc.apply(CanvasCommand::Insert(Format::Italic));
        assert_eq!(doc.content(), "销售*数据*分析");
    }

    #[test]
    fn test_select_is_clamped_and_ordered() {
        let mut doc = CanvasDocument::new("T", "abc");
        doc.apply(CanvasCommand::Select { start: 10, end: 1 });
        let selection = doc.selection().unwrap();
        assert_eq!((selection.start, selection.end), (1, 3));
        assert_eq!(selection.text, "bc");
    }

    #[test]
    fn test_replace_first_occurrence_only() {
        let mut doc = CanvasDocument::new("T", "a b a");
        assert!(doc.apply(CanvasCommand::ReplaceSelection {
            original: "a".into(),
            replacement: "x".into(),
        }));
        assert_eq!(doc.content(), "x b a");
    }

    #[test]
    fn test_replace_empty_selection_is_noop() {
        let mut doc = CanvasDocument::new("T", "abc");
        assert!(!doc.apply(CanvasCommand::ReplaceSelection {
            original: String::new(),
            replacement: "x".into(),
        }));
        assert_eq!(doc.content(), "abc");
    }

    #[test]
    fn test_reveal_records_once() {
        let mut doc = CanvasDocument::new("T", "");
        for prefix in ["#", "# ", "# T", "# To"] {
            doc.apply(CanvasCommand::Reveal {
                text: prefix.into(),
                done: false,
            });
        }
        assert_eq!(doc.history().len(), 1);

        doc.apply(CanvasCommand::Reveal {
            text: "# Top".into(),
            done: true,
        });
        assert_eq!(doc.content(), "# Top");
        assert_eq!(doc.history().len(), 2);
        assert_eq!(doc.history().current(), "# Top");
    }

    #[test]
    fn test_rewrite_improve() {
        let result = RewriteAction::Improve.apply("销量上升。利润增加", Locale::ZhCn);
        assert_eq!(result, "【优化后】销量上升、同时利润增加");
    }

    #[test]
    fn test_rewrite_simplify() {
        assert_eq!(
            RewriteAction::Simplify.apply("第一句。第二句。", Locale::ZhCn),
            "第一句。"
        );
        assert_eq!(RewriteAction::Simplify.apply("no period", Locale::En), "no period。");
    }

    #[test]
    fn test_rewrite_selection_in_document() {
        let mut doc = CanvasDocument::new("T", "前言。要点一。要点二。");
        doc.apply(CanvasCommand::Select { start: 3, end: 11 });
        assert_eq!(doc.selection().unwrap().text, "要点一。要点二。");

        assert!(doc.rewrite_selection(RewriteAction::Simplify, Locale::ZhCn));
        assert_eq!(doc.content(), "前言。要点一。");
    }

    #[test]
    fn test_rewrite_without_selection_is_noop() {
        let mut doc = CanvasDocument::new("T", "text");
        assert!(!doc.rewrite_selection(RewriteAction::Expand, Locale::ZhCn));
    }

    #[test]
    fn test_counts() {
        let doc = CanvasDocument::new("T", "one two\nthree  中文");
        assert_eq!(doc.word_count(), 4);
        assert_eq!(doc.char_count(), 17);
    }
}
