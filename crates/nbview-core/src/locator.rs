//! Notebook discovery: directory listing and id resolution.

use crate::error::{Result, ViewerError};
use crate::title;
use nbview_notebook::parse_notebook;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension (without dot) recognized as a notebook.
pub const NOTEBOOK_EXTENSION: &str = "ipynb";

/// Lightweight listing entry derived from a notebook file.
///
/// Created fresh on every [`list_notebooks`] call; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotebookSummary {
    /// Identifier derived from the filename stem.
    pub id: String,
    /// Display title extracted from the notebook content, falling back to
    /// the id when extraction is not possible.
    pub title: String,
    /// Resolved path of the notebook file.
    pub path: PathBuf,
}

/// List the notebooks directly inside `root`, sorted by `(title, id)`.
///
/// The scan is non-recursive and only considers regular files with the
/// `.ipynb` extension. A file that cannot be parsed still appears in the
/// listing with its filename stem as the title; the failure is logged and
/// downgraded so one bad notebook does not break the listing of all others.
/// Files that vanish between enumeration and inspection are silently absent.
///
/// Sort order is case-sensitive lexicographic byte order (uppercase before
/// lowercase), with ties broken by id, so listings are deterministic and
/// independent of filesystem enumeration order.
///
/// # Errors
///
/// Returns an I/O error only when `root` itself cannot be read; that is a
/// configuration problem for the caller to surface at startup.
pub fn list_notebooks(root: &Path) -> Result<Vec<NotebookSummary>> {
    let mut notebooks = Vec::new();

    for entry in fs::read_dir(root)? {
        let Ok(entry) = entry else { continue };
        let path = entry.path();

        if path.extension().and_then(|ext| ext.to_str()) != Some(NOTEBOOK_EXTENSION) {
            continue;
        }
        if !path.is_file() {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
            log::warn!("Skipping notebook with non-UTF-8 name: {}", path.display());
            continue;
        };
        let id = id.to_string();

        let title = match parse_notebook(&path) {
            Ok(document) => title::extract_title(&document, &id),
            Err(err) => {
                log::warn!("Error extracting title from {}: {err}", path.display());
                id.clone()
            }
        };

        notebooks.push(NotebookSummary { id, title, path });
    }

    notebooks.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
    Ok(notebooks)
}

/// Resolve a notebook id to its file path under `root`.
///
/// # Errors
///
/// - [`ViewerError::InvalidId`] when the id is empty or contains a path
///   separator or `..` segment. Checked before touching the filesystem so an
///   id can never reference a file outside `root`.
/// - [`ViewerError::NotFound`] when `root/<id>.ipynb` is not an existing
///   regular file.
pub fn resolve_notebook(root: &Path, id: &str) -> Result<PathBuf> {
    if !is_valid_id(id) {
        return Err(ViewerError::InvalidId(id.to_string()));
    }

    let path = root.join(format!("{id}.{NOTEBOOK_EXTENSION}"));
    if path.is_file() {
        Ok(path)
    } else {
        Err(ViewerError::NotFound(id.to_string()))
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains('/') && !id.contains('\\') && !id.contains("..")
}
