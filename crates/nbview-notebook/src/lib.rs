//! # nbview-notebook
//!
//! Jupyter notebook (.ipynb) parsing library for nbview.
//!
//! This crate parses notebook files (nbformat 4.x) into a strongly-typed
//! document model, validating the format marker up front:
//! - Markdown cells (documentation)
//! - Code cells (with execution counts and outputs)
//! - Cell outputs (stream, display data, execute results, errors)
//! - Notebook metadata (kernel, language, free-form extras)
//!
//! ## Example
//!
//! ```no_run
//! use nbview_notebook::parse_notebook;
//!
//! let notebook = parse_notebook("example.ipynb")?;
//! for cell in &notebook.cells {
//!     println!("Cell type: {}", cell.kind);
//! }
//! # Ok::<(), nbview_notebook::NotebookError>(())
//! ```

/// Error types for notebook parsing
pub mod error;
/// Jupyter notebook (ipynb) parser and document model
pub mod ipynb;

pub use error::{NotebookError, Result};
pub use ipynb::{
    parse_notebook, parse_notebook_from_str, Cell, CellKind, CellOutput, NotebookDocument,
    NotebookMetadata, OutputKind, SUPPORTED_NBFORMAT_MAJOR,
};
