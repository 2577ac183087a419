//! Markdown preview renderer
//!
//! Restricted Markdown to HTML fragment via ordered regex substitutions.
//! Each pass sees the output of the previous one, so pass order is part of
//! the contract:
//!
//! 1. headings (`###`, `##`, `#`)
//! 2. emphasis (`***`, `**`, `*`)
//! 3. list items (ordered, then unordered), no `<ul>`/`<ol>` wrapper
//! 4. blockquotes
//! 5. fenced code blocks
//! 6. inline code
//! 7. links
//! 8. table rows
//! 9. remaining newlines to `<br/>`
//!
//! No HTML escaping is performed. The output is a preview of the user's own
//! text and must not be fed untrusted input.

use std::sync::OnceLock;

use regex::{Captures, Regex};

struct Pipeline {
    h3: Regex,
    h2: Regex,
    h1: Regex,
    bold_italic: Regex,
    bold: Regex,
    italic: Regex,
    ordered_item: Regex,
    unordered_item: Regex,
    blockquote: Regex,
    code_fence: Regex,
    inline_code: Regex,
    link: Regex,
    table_row: Regex,
    separator_cell: Regex,
    newline: Regex,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("markdown patterns are valid literals")
}

fn pipeline() -> &'static Pipeline {
    static PIPELINE: OnceLock<Pipeline> = OnceLock::new();
    PIPELINE.get_or_init(|| Pipeline {
        h3: compile(r"(?mR)^### (.*)$"),
        h2: compile(r"(?mR)^## (.*)$"),
        h1: compile(r"(?mR)^# (.*)$"),
        bold_italic: compile(r"(?R)\*\*\*(.*?)\*\*\*"),
        bold: compile(r"(?R)\*\*(.*?)\*\*"),
        italic: compile(r"(?R)\*(.*?)\*"),
        ordered_item: compile(r"(?mR)^\s*[0-9]+\.\s+(.*)$"),
        unordered_item: compile(r"(?mR)^\s*[-*]\s+(.*)$"),
        blockquote: compile(r"(?mR)^>\s+(.*)$"),
        code_fence: compile(r"(?s)```([A-Za-z0-9_]+)?\n(.*?)```"),
        inline_code: compile(r"`([^`]+)`"),
        link: compile(r"\[([^\]]+)\]\(([^)]+)\)"),
        table_row: compile(r"(?R)\|(.+)\|"),
        separator_cell: compile(r"^[-:]+$"),
        newline: compile(r"\n"),
    })
}

/// Render restricted Markdown to an HTML fragment.
///
/// Total: any input produces some output, malformed constructs pass through
/// as text.
pub fn render(text: &str) -> String {
    let p = pipeline();

    let html = p.h3.replace_all(text, "<h3>${1}</h3>");
    let html = p.h2.replace_all(&html, "<h2>${1}</h2>");
    let html = p.h1.replace_all(&html, "<h1>${1}</h1>");

    let html = p
        .bold_italic
        .replace_all(&html, "<strong><em>${1}</em></strong>");
    let html = p.bold.replace_all(&html, "<strong>${1}</strong>");
    let html = p.italic.replace_all(&html, "<em>${1}</em>");

    let html = p.ordered_item.replace_all(&html, "<li>${1}</li>");
    let html = p.unordered_item.replace_all(&html, "<li>${1}</li>");

    let html = p.blockquote.replace_all(&html, "<blockquote>${1}</blockquote>");

    let html = p.code_fence.replace_all(&html, "<pre><code>${2}</code></pre>");
    let html = p.inline_code.replace_all(&html, "<code>${1}</code>");

    let html = p.link.replace_all(&html, "<a href=\"${2}\">${1}</a>");

    let html = p
        .table_row
        .replace_all(&html, |caps: &Captures| table_row(p, &caps[0]));

    p.newline.replace_all(&html, "<br/>").into_owned()
}

/// One `|`-delimited row. Separator rows (only `-` and `:` cells) vanish.
/// A row whose raw text contains `---` is rendered with header cells.
fn table_row(p: &Pipeline, row: &str) -> String {
    let cells: Vec<&str> = row
        .split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect();

    if cells.iter().all(|cell| p.separator_cell.is_match(cell)) {
        return String::new();
    }

    let tag = if row.contains("---") { "th" } else { "td" };
    let mut html = String::from("<tr>");
    for cell in cells {
        html.push_str(&format!("<{tag}>{cell}</{tag}>", tag = tag, cell = cell));
    }
    html.push_str("</tr>");
    html
}
