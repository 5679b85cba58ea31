use crate::error::{NotebookError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Major notebook format version accepted by the parser.
///
/// Matches nbformat 4.x; older major versions use an incompatible cell layout
/// and are rejected with [`NotebookError::UnsupportedVersion`].
pub const SUPPORTED_NBFORMAT_MAJOR: u32 = 4;

/// Parsed Jupyter notebook document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotebookDocument {
    /// Notebook-level metadata
    pub metadata: NotebookMetadata,
    /// Ordered list of cells in the notebook
    pub cells: Vec<Cell>,
}

/// Notebook-level metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotebookMetadata {
    /// Kernel name from `kernelspec.name` (e.g., "python3")
    pub kernel_name: Option<String>,
    /// Language name from `language_info.name` (e.g., "python")
    pub language: Option<String>,
    /// Remaining free-form metadata entries, preserved as parsed
    pub extra: BTreeMap<String, Value>,
}

/// Individual notebook cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    /// Type of cell (markdown, code, raw)
    pub kind: CellKind,
    /// Cell source, joined into a single string
    pub source: String,
    /// Execution count for executed code cells
    pub execution_count: Option<i32>,
    /// Cell outputs, in document order (non-empty only for code cells)
    pub outputs: Vec<CellOutput>,
}

/// Type of notebook cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Markdown documentation cell
    Markdown,
    /// Executable code cell
    #[default]
    Code,
    /// Raw text cell (no formatting)
    Raw,
}

impl std::fmt::Display for CellKind {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Markdown => "markdown",
            Self::Code => "code",
            Self::Raw => "raw",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for CellKind {
    type Err = String;

    /// Strict match on the wire names used by the ipynb format.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "markdown" => Ok(Self::Markdown),
            "code" => Ok(Self::Code),
            "raw" => Ok(Self::Raw),
            _ => Err(format!(
                "Unknown cell type '{s}'. Expected: markdown, code, raw"
            )),
        }
    }
}

/// A single output attached to a code cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellOutput {
    /// Type of output (`stream`, `display_data`, `execute_result`, `error`)
    pub kind: OutputKind,
    /// Inline text content, when the output carries any
    pub text: Option<String>,
    /// Media payloads keyed by MIME type (base64 text for binary formats)
    pub data: BTreeMap<String, String>,
}

/// Type of cell output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// Stream output (stdout/stderr)
    #[default]
    Stream,
    /// Rich display data (images, HTML, etc.)
    DisplayData,
    /// Result of code execution
    ExecuteResult,
    /// Error traceback
    Error,
}

impl std::fmt::Display for OutputKind {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Stream => "stream",
            Self::DisplayData => "display_data",
            Self::ExecuteResult => "execute_result",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OutputKind {
    type Err = String;

    /// Strict match on the wire names used by the ipynb format.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "stream" => Ok(Self::Stream),
            "display_data" => Ok(Self::DisplayData),
            "execute_result" => Ok(Self::ExecuteResult),
            "error" => Ok(Self::Error),
            _ => Err(format!(
                "Unknown output type '{s}'. Expected: stream, display_data, execute_result, error"
            )),
        }
    }
}

// Raw deserialization layer. The ipynb format encodes `source` and `text`
// either as a single string or a list of line strings, and media payloads as
// arbitrary JSON; these structs absorb that looseness so the public model
// above stays strict.

#[derive(Debug, Deserialize)]
struct RawNotebook {
    nbformat: u32,
    #[serde(default)]
    nbformat_minor: u32,
    #[serde(default)]
    metadata: serde_json::Map<String, Value>,
    #[serde(default)]
    cells: Vec<RawCell>,
}

#[derive(Debug, Deserialize)]
struct RawCell {
    cell_type: String,
    #[serde(default)]
    source: SourceText,
    #[serde(default)]
    execution_count: Option<i32>,
    #[serde(default)]
    outputs: Vec<RawOutput>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SourceText {
    Joined(String),
    Lines(Vec<String>),
}

impl Default for SourceText {
    #[inline]
    fn default() -> Self {
        Self::Joined(String::new())
    }
}

impl SourceText {
    fn into_text(self) -> String {
        match self {
            Self::Joined(s) => s,
            Self::Lines(lines) => lines.concat(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawOutput {
    output_type: String,
    #[serde(default)]
    text: Option<SourceText>,
    #[serde(default)]
    data: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    ename: Option<String>,
    #[serde(default)]
    evalue: Option<String>,
    #[serde(default)]
    traceback: Option<Vec<String>>,
}

/// Parse a Jupyter notebook from a file path
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The notebook JSON is malformed or missing the `nbformat` marker
/// - The format version is unsupported
#[must_use = "this function returns a parsed notebook that should be processed"]
pub fn parse_notebook<P: AsRef<Path>>(path: P) -> Result<NotebookDocument> {
    let content = fs::read_to_string(path)?;
    parse_notebook_from_str(&content)
}

/// Parse a Jupyter notebook from a string
///
/// # Errors
///
/// Returns an error if the notebook JSON is malformed, the `nbformat` marker
/// is absent, the version is unsupported, or a cell or output carries an
/// unrecognized type.
#[must_use = "this function returns a parsed notebook that should be processed"]
pub fn parse_notebook_from_str(content: &str) -> Result<NotebookDocument> {
    let raw: RawNotebook = serde_json::from_str(content)?;

    if raw.nbformat != SUPPORTED_NBFORMAT_MAJOR {
        return Err(NotebookError::UnsupportedVersion {
            major: raw.nbformat,
            minor: raw.nbformat_minor,
        });
    }

    let metadata = extract_metadata(raw.metadata);
    let cells = raw
        .cells
        .into_iter()
        .map(convert_cell)
        .collect::<Result<Vec<_>>>()?;

    Ok(NotebookDocument { metadata, cells })
}

/// Lift kernel and language names out of the free-form metadata mapping
fn extract_metadata(metadata: serde_json::Map<String, Value>) -> NotebookMetadata {
    let kernel_name = metadata
        .get("kernelspec")
        .and_then(|ks| ks.get("name"))
        .and_then(Value::as_str)
        .map(String::from);

    let language = metadata
        .get("language_info")
        .and_then(|li| li.get("name"))
        .and_then(Value::as_str)
        .map(String::from);

    let extra = metadata.into_iter().collect();

    NotebookMetadata {
        kernel_name,
        language,
        extra,
    }
}

fn convert_cell(raw: RawCell) -> Result<Cell> {
    let kind: CellKind = raw.cell_type.parse().map_err(NotebookError::InvalidFormat)?;

    let outputs = match kind {
        CellKind::Code => raw
            .outputs
            .into_iter()
            .map(convert_output)
            .collect::<Result<Vec<_>>>()?,
        // Markdown and raw cells never carry outputs
        CellKind::Markdown | CellKind::Raw => Vec::new(),
    };

    Ok(Cell {
        kind,
        source: raw.source.into_text(),
        execution_count: raw.execution_count,
        outputs,
    })
}

fn convert_output(raw: RawOutput) -> Result<CellOutput> {
    let kind: OutputKind = raw
        .output_type
        .parse()
        .map_err(NotebookError::InvalidFormat)?;

    let text = match kind {
        OutputKind::Error => Some(format_error_text(
            raw.ename.as_deref(),
            raw.evalue.as_deref(),
            raw.traceback.as_deref(),
        )),
        OutputKind::Stream | OutputKind::DisplayData | OutputKind::ExecuteResult => {
            raw.text.map(SourceText::into_text)
        }
    };

    let data = raw
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|(mime, value)| (mime, data_value_to_text(value)))
        .collect();

    Ok(CellOutput { kind, text, data })
}

/// Fold an error output's name/value/traceback triple into a single text block
fn format_error_text(
    ename: Option<&str>,
    evalue: Option<&str>,
    traceback: Option<&[String]>,
) -> String {
    let mut text = String::new();
    match (ename, evalue) {
        (Some(name), Some(value)) => {
            text.push_str(name);
            text.push_str(": ");
            text.push_str(value);
        }
        (Some(name), None) => text.push_str(name),
        (None, Some(value)) => text.push_str(value),
        (None, None) => {}
    }
    if let Some(lines) = traceback {
        if !lines.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&lines.join("\n"));
        }
    }
    text
}

/// Normalize a MIME payload to a single string.
///
/// Payloads arrive as a string, a list of line strings, or (for JSON media
/// types) arbitrary JSON; the latter is re-serialized compactly.
fn data_value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_notebook() {
        let notebook_json = r##"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {
                "kernelspec": {
                    "name": "python3",
                    "display_name": "Python 3"
                },
                "language_info": {
                    "name": "python",
                    "version": "3.9.0"
                }
            },
            "cells": [
                {
                    "cell_type": "markdown",
                    "metadata": {},
                    "source": ["# Hello World\n", "This is a test notebook."]
                },
                {
                    "cell_type": "code",
                    "metadata": {},
                    "execution_count": 1,
                    "source": ["print(\"Hello, World!\")"],
                    "outputs": [
                        {
                            "output_type": "stream",
                            "name": "stdout",
                            "text": ["Hello, World!\n"]
                        }
                    ]
                }
            ]
        }"##;

        let result = parse_notebook_from_str(notebook_json);
        assert!(
            result.is_ok(),
            "Failed to parse notebook: {:?}",
            result.err()
        );

        let notebook = result.unwrap();
        assert_eq!(notebook.cells.len(), 2);
        assert_eq!(notebook.cells[0].kind, CellKind::Markdown);
        assert_eq!(
            notebook.cells[0].source,
            "# Hello World\nThis is a test notebook."
        );
        assert_eq!(notebook.cells[1].kind, CellKind::Code);
        assert_eq!(notebook.metadata.kernel_name, Some("python3".to_string()));
        assert_eq!(notebook.metadata.language, Some("python".to_string()));
    }

    #[test]
    fn test_source_as_single_string() {
        let notebook_json = r##"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {},
            "cells": [
                {"cell_type": "markdown", "metadata": {}, "source": "# Title\nBody"}
            ]
        }"##;

        let notebook = parse_notebook_from_str(notebook_json).unwrap();
        assert_eq!(notebook.cells[0].source, "# Title\nBody");
    }

    #[test]
    fn test_extract_execute_result() {
        let notebook_json = r#"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {},
            "cells": [
                {
                    "cell_type": "code",
                    "metadata": {},
                    "execution_count": 1,
                    "source": ["2 + 2"],
                    "outputs": [
                        {
                            "output_type": "execute_result",
                            "execution_count": 1,
                            "data": {
                                "text/plain": "4"
                            },
                            "metadata": {}
                        }
                    ]
                }
            ]
        }"#;

        let notebook = parse_notebook_from_str(notebook_json).unwrap();
        assert_eq!(notebook.cells.len(), 1);
        assert_eq!(notebook.cells[0].outputs.len(), 1);
        let output = &notebook.cells[0].outputs[0];
        assert_eq!(output.kind, OutputKind::ExecuteResult);
        assert_eq!(output.data.get("text/plain"), Some(&"4".to_string()));
    }

    #[test]
    fn test_error_output_folds_traceback() {
        let notebook_json = r#"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {},
            "cells": [
                {
                    "cell_type": "code",
                    "metadata": {},
                    "execution_count": 1,
                    "source": ["1 / 0"],
                    "outputs": [
                        {
                            "output_type": "error",
                            "ename": "ZeroDivisionError",
                            "evalue": "division by zero",
                            "traceback": [
                                "Traceback (most recent call last):",
                                "ZeroDivisionError: division by zero"
                            ]
                        }
                    ]
                }
            ]
        }"#;

        let notebook = parse_notebook_from_str(notebook_json).unwrap();
        let text = notebook.cells[0].outputs[0].text.as_deref().unwrap();
        assert!(text.starts_with("ZeroDivisionError: division by zero"));
        assert!(text.contains("Traceback (most recent call last):"));
    }

    #[test]
    fn test_missing_nbformat_marker_rejected() {
        let notebook_json = r#"{
            "metadata": {},
            "cells": []
        }"#;

        let result = parse_notebook_from_str(notebook_json);
        assert!(
            matches!(result, Err(NotebookError::JsonError(_))),
            "Document without nbformat marker should fail to parse"
        );
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let notebook_json = r#"{
            "nbformat": 3,
            "nbformat_minor": 0,
            "metadata": {},
            "cells": []
        }"#;

        let result = parse_notebook_from_str(notebook_json);
        match result {
            Err(NotebookError::UnsupportedVersion { major, minor }) => {
                assert_eq!(major, 3);
                assert_eq!(minor, 0);
            }
            other => panic!("Expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_cell_type_rejected() {
        let notebook_json = r#"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {},
            "cells": [
                {"cell_type": "widget", "metadata": {}, "source": ""}
            ]
        }"#;

        let result = parse_notebook_from_str(notebook_json);
        match result {
            Err(NotebookError::InvalidFormat(msg)) => {
                assert!(msg.contains("widget"), "Error should name the bad type");
            }
            other => panic!("Expected InvalidFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_output_type_rejected() {
        let notebook_json = r#"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {},
            "cells": [
                {
                    "cell_type": "code",
                    "metadata": {},
                    "execution_count": 1,
                    "source": ["x"],
                    "outputs": [{"output_type": "hologram"}]
                }
            ]
        }"#;

        let result = parse_notebook_from_str(notebook_json);
        assert!(matches!(result, Err(NotebookError::InvalidFormat(_))));
    }

    #[test]
    fn test_empty_notebook() {
        let notebook_json = r#"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {},
            "cells": []
        }"#;

        let notebook = parse_notebook_from_str(notebook_json).unwrap();
        assert!(notebook.cells.is_empty());
        assert_eq!(notebook.metadata, NotebookMetadata::default());
    }

    #[test]
    fn test_multiline_image_payload_joined() {
        // Binary payloads are often wrapped as a list of base64 lines
        let notebook_json = r#"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {},
            "cells": [
                {
                    "cell_type": "code",
                    "metadata": {},
                    "execution_count": 2,
                    "source": ["plot()"],
                    "outputs": [
                        {
                            "output_type": "display_data",
                            "data": {
                                "image/png": ["aGVs", "bG8="],
                                "text/plain": "<Figure>"
                            },
                            "metadata": {}
                        }
                    ]
                }
            ]
        }"#;

        let notebook = parse_notebook_from_str(notebook_json).unwrap();
        let output = &notebook.cells[0].outputs[0];
        assert_eq!(output.data.get("image/png"), Some(&"aGVsbG8=".to_string()));
        assert_eq!(
            output.data.get("text/plain"),
            Some(&"<Figure>".to_string())
        );
    }

    #[test]
    fn test_json_media_payload_reserialized() {
        let notebook_json = r#"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {},
            "cells": [
                {
                    "cell_type": "code",
                    "metadata": {},
                    "execution_count": 1,
                    "source": ["show()"],
                    "outputs": [
                        {
                            "output_type": "display_data",
                            "data": {"application/json": {"answer": 42}},
                            "metadata": {}
                        }
                    ]
                }
            ]
        }"#;

        let notebook = parse_notebook_from_str(notebook_json).unwrap();
        let output = &notebook.cells[0].outputs[0];
        assert_eq!(
            output.data.get("application/json"),
            Some(&r#"{"answer":42}"#.to_string())
        );
    }

    #[test]
    fn test_metadata_extra_preserved() {
        let notebook_json = r#"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {"title": "Analysis", "celltoolbar": "Tags"},
            "cells": []
        }"#;

        let notebook = parse_notebook_from_str(notebook_json).unwrap();
        assert_eq!(
            notebook.metadata.extra.get("title").and_then(Value::as_str),
            Some("Analysis")
        );
        assert!(notebook.metadata.extra.contains_key("celltoolbar"));
    }

    #[test]
    fn test_cell_kind_display_roundtrip() {
        for kind in [CellKind::Markdown, CellKind::Code, CellKind::Raw] {
            let s = kind.to_string();
            let parsed: CellKind = s.parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("Markdown".parse::<CellKind>().is_err(), "wire names are exact");
    }

    #[test]
    fn test_output_kind_display_roundtrip() {
        for kind in [
            OutputKind::Stream,
            OutputKind::DisplayData,
            OutputKind::ExecuteResult,
            OutputKind::Error,
        ] {
            let s = kind.to_string();
            let parsed: OutputKind = s.parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("display-data".parse::<OutputKind>().is_err());
    }

    #[test]
    fn test_markdown_cell_outputs_dropped() {
        // A malformed producer may attach outputs to a markdown cell; the
        // typed model guarantees only code cells carry them.
        let notebook_json = r#"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {},
            "cells": [
                {
                    "cell_type": "markdown",
                    "metadata": {},
                    "source": "text",
                    "outputs": [{"output_type": "stream", "text": "noise"}]
                }
            ]
        }"#;

        let notebook = parse_notebook_from_str(notebook_json).unwrap();
        assert!(notebook.cells[0].outputs.is_empty());
    }
}
