//! # nbview-core
//!
//! Core of a small notebook-viewing web application: locate Jupyter
//! notebooks in a directory, extract display titles, and render a parsed
//! notebook to a sanitized, embeddable HTML fragment with its binary
//! resources extracted for the caller to persist.
//!
//! The HTTP layer is not part of this crate; it is a collaborator that calls
//! [`list_notebooks`] for the index view, [`resolve_notebook`] +
//! [`parse_notebook`](nbview_notebook::parse_notebook) +
//! [`HtmlSerializer::render`] for the detail view, and writes
//! [`RenderedNotebook::resources`] under its static path.
//!
//! ## Quick Start
//!
//! ```no_run
//! use nbview_core::{resolve_notebook, HtmlSerializer};
//! use nbview_notebook::parse_notebook;
//! use std::path::Path;
//!
//! # fn main() -> nbview_core::Result<()> {
//! let root = Path::new("/var/notebooks");
//! let path = resolve_notebook(root, "intro")?;
//! let document = parse_notebook(&path)?;
//! let rendered = HtmlSerializer::new().render(&document)?;
//! println!("{}", rendered.html_body);
//! # Ok(())
//! # }
//! ```
//!
//! Every operation is a pure synchronous transformation over its inputs;
//! there is no shared mutable state and no cross-request caching, so
//! independent calls may run concurrently.

/// Error types for locating and rendering
pub mod error;
/// Directory listing and id resolution
pub mod locator;
/// Notebook-to-HTML serialization
pub mod serializer;
/// Display-title extraction
pub mod title;

pub use error::{Result, ViewerError};
pub use locator::{list_notebooks, resolve_notebook, NotebookSummary, NOTEBOOK_EXTENSION};
pub use serializer::{HtmlOptions, HtmlSerializer, RenderedNotebook};
pub use title::extract_title;

// Re-exported so callers can parse without naming the parsing crate.
pub use nbview_notebook::{
    parse_notebook, parse_notebook_from_str, Cell, CellKind, CellOutput, NotebookDocument,
    NotebookMetadata, OutputKind,
};
