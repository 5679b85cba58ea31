//! Notebook serialization module
//!
//! This module provides the serializer that converts a parsed
//! [`NotebookDocument`](nbview_notebook::NotebookDocument) to an embeddable
//! HTML fragment plus its extracted binary resources.

pub mod html;

pub use html::{HtmlOptions, HtmlSerializer};

use std::collections::BTreeMap;

/// Output of rendering a notebook.
///
/// Transient value: the caller decides whether and where to persist
/// `resources` (conventionally under a publicly servable static path, keyed
/// by the generated filename that `html_body` references).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedNotebook {
    /// Sanitized HTML fragment, safe to embed inside a larger page template.
    /// Never contains `<html>`/`<head>` wrapper tags.
    pub html_body: String,
    /// Extracted binary payloads keyed by generated resource filename.
    pub resources: BTreeMap<String, Vec<u8>>,
}
