//! Display-title extraction from a notebook's leading markdown cell.

use nbview_notebook::{Cell, CellKind, NotebookDocument};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches an ATX heading line: one or more `#` characters, whitespace, text.
/// Any heading level yields a title, not just `# `.
static HEADING_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#+\s+(.+?)\s*$").expect("Invalid heading regex"));

/// Extract a display title from the document's first cell.
///
/// Inspects the first cell only. If it is a markdown cell whose first source
/// line is a heading, the heading text becomes the title; in every other
/// case (empty document, non-markdown first cell, no heading, empty heading
/// text) the caller-supplied `fallback` — conventionally the filename stem —
/// is returned. This function never fails on a structurally valid document.
#[must_use = "returns the extracted or fallback title"]
pub fn extract_title(document: &NotebookDocument, fallback: &str) -> String {
    heading_title(document).unwrap_or_else(|| fallback.to_string())
}

/// Title from the first cell's leading heading, if there is one.
pub(crate) fn heading_title(document: &NotebookDocument) -> Option<String> {
    let first = document.cells.first()?;
    if first.kind != CellKind::Markdown {
        return None;
    }
    heading_text(first.source.lines().next()?)
}

/// Heading text of a single line, if the line is a heading.
pub(crate) fn heading_text(line: &str) -> Option<String> {
    let caps = HEADING_PATTERN.captures(line.trim())?;
    Some(caps[1].to_string())
}

/// True when the cell contains nothing but a single heading line.
///
/// Such a cell is redundant with page chrome that displays the title
/// separately and is skipped during rendering.
pub(crate) fn is_title_only_cell(cell: &Cell) -> bool {
    if cell.kind != CellKind::Markdown {
        return false;
    }
    let trimmed = cell.source.trim();
    !trimmed.contains('\n') && heading_text(trimmed).is_some()
}
