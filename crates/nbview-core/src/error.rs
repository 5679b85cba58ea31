//! Error types for notebook locating and rendering.

use nbview_notebook::NotebookError;
use thiserror::Error;

/// Error types that can occur while locating or rendering notebooks.
///
/// # Examples
///
/// ```
/// use nbview_core::{resolve_notebook, ViewerError};
/// use std::path::Path;
///
/// match resolve_notebook(Path::new("/var/notebooks"), "missing") {
///     Err(ViewerError::NotFound(id)) => eprintln!("no such notebook: {id}"),
///     Err(e) => eprintln!("error: {e}"),
///     Ok(path) => println!("found at {}", path.display()),
/// }
/// ```
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Requested notebook id does not resolve to an existing file.
    #[error("Notebook not found: {0}")]
    NotFound(String),

    /// Notebook id contains a path separator or traversal segment.
    ///
    /// Rejected before touching the filesystem so an id can never name a
    /// file outside the configured notebook directory.
    #[error("Invalid notebook id: {0}")]
    InvalidId(String),

    /// File content is not a valid notebook document.
    #[error("Parse error: {0}")]
    Parse(#[from] NotebookError),

    /// A recognized but unconvertible structure was encountered while
    /// producing HTML (e.g., an image payload that is not valid base64).
    #[error("Render error: {0}")]
    Render(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Type alias for [`Result<T, ViewerError>`].
pub type Result<T> = std::result::Result<T, ViewerError>;
