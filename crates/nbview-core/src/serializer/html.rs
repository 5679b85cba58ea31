//! HTML serializer for parsed notebooks.
//!
//! Converts a [`NotebookDocument`] into an embeddable HTML fragment plus a
//! mapping of extracted binary resources. Markdown cells go through
//! pulldown-cmark with raw HTML demoted to escaped text during event
//! processing, so the fragment is sanitized as it is generated rather than
//! patched afterwards. Code cells render their literal source followed by
//! each output in document order; image payloads are decoded and handed back
//! to the caller under stable generated filenames.

use crate::error::{Result, ViewerError};
use crate::serializer::RenderedNotebook;
use crate::title;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use nbview_notebook::{Cell, CellKind, CellOutput, NotebookDocument, OutputKind};
use pulldown_cmark::{html, Event, Options, Parser};
use std::collections::BTreeMap;
use std::fmt::Write;

/// MIME type of the plain-text representation carried by rich outputs.
const MIME_TEXT_PLAIN: &str = "text/plain";

/// Embeddable image payload types, in rendering priority order, with the
/// file extension used for the extracted resource.
const IMAGE_FORMATS: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/svg+xml", "svg"),
];

/// Language class applied to code blocks when the notebook metadata does not
/// name a language.
const DEFAULT_LANGUAGE: &str = "python";

/// Options for HTML rendering.
///
/// An explicit immutable value passed to [`HtmlSerializer`] at construction
/// time; there is no process-wide converter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Prefix prepended to extracted-resource filenames in `<img>` `src`
    /// attributes (e.g., `/static/notebooks/`). Empty by default, producing
    /// bare filenames.
    pub resource_url_prefix: String,

    /// Skip a first markdown cell that contains nothing but the title
    /// heading; the surrounding page chrome displays the title separately.
    ///
    /// Default: `true`.
    pub strip_title_cell: bool,

    /// Render `In [n]:` prompt labels before code cells.
    ///
    /// Default: `false` (prompts excluded).
    pub include_execution_count: bool,
}

impl HtmlOptions {
    /// Create options with the default configuration.
    #[inline]
    #[must_use = "creates an options value to configure a serializer with"]
    pub const fn new() -> Self {
        Self {
            resource_url_prefix: String::new(),
            strip_title_cell: true,
            include_execution_count: false,
        }
    }

    /// Set the URL prefix for extracted-resource references.
    #[inline]
    #[must_use = "returns options with the prefix configured"]
    pub fn with_resource_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.resource_url_prefix = prefix.into();
        self
    }

    /// Enable or disable stripping of a redundant leading title cell.
    #[inline]
    #[must_use = "returns options with the title-strip setting configured"]
    pub const fn with_strip_title_cell(mut self, enable: bool) -> Self {
        self.strip_title_cell = enable;
        self
    }

    /// Enable or disable `In [n]:` prompt labels.
    #[inline]
    #[must_use = "returns options with the prompt setting configured"]
    pub const fn with_execution_count(mut self, enable: bool) -> Self {
        self.include_execution_count = enable;
        self
    }
}

impl Default for HtmlOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// HTML serializer for notebook documents.
///
/// Stateless across calls: every [`render`](Self::render) operates only on
/// the document it is given and its own output buffers, so independent
/// renders may run concurrently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlSerializer {
    options: HtmlOptions,
}

impl HtmlSerializer {
    /// Create a serializer with default options.
    #[inline]
    #[must_use = "creates serializer with default options"]
    pub const fn new() -> Self {
        Self {
            options: HtmlOptions::new(),
        }
    }

    /// Create a serializer with custom options.
    #[inline]
    #[must_use = "creates serializer with custom options"]
    pub const fn with_options(options: HtmlOptions) -> Self {
        Self { options }
    }

    /// Render a document to an HTML fragment and its extracted resources.
    ///
    /// A document with zero cells renders to an empty fragment and an empty
    /// resource mapping. Cell order and output order are preserved exactly.
    /// The input document is never mutated; the title-strip transform works
    /// on a borrowed slice of the cell sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Render`] when an image payload is not valid
    /// base64.
    pub fn render(&self, document: &NotebookDocument) -> Result<RenderedNotebook> {
        let mut cells: &[Cell] = &document.cells;

        // Drop a first cell that holds only the title heading; the title is
        // displayed by the page chrome, not the fragment.
        if self.options.strip_title_cell {
            if let Some(first) = cells.first() {
                if title::is_title_only_cell(first) {
                    cells = &cells[1..];
                }
            }
        }

        let language = document
            .metadata
            .language
            .as_deref()
            .unwrap_or(DEFAULT_LANGUAGE);

        let mut html_body = String::new();
        let mut resources = BTreeMap::new();

        for (cell_index, cell) in cells.iter().enumerate() {
            match cell.kind {
                CellKind::Markdown => Self::push_markdown_cell(&mut html_body, &cell.source),
                CellKind::Code => self.push_code_cell(
                    &mut html_body,
                    &mut resources,
                    cell,
                    cell_index,
                    language,
                )?,
                CellKind::Raw => Self::push_raw_cell(&mut html_body, &cell.source),
            }
        }

        Ok(RenderedNotebook {
            html_body,
            resources,
        })
    }

    fn push_markdown_cell(out: &mut String, source: &str) {
        out.push_str("<section class=\"nb-cell nb-cell-markdown\">\n");
        push_markdown(out, source);
        out.push_str("</section>\n");
    }

    fn push_raw_cell(out: &mut String, source: &str) {
        // Raw cells pass through as opaque preformatted text
        out.push_str("<section class=\"nb-cell nb-cell-raw\">\n<pre class=\"nb-raw\">");
        push_escaped(out, source);
        out.push_str("</pre>\n</section>\n");
    }

    fn push_code_cell(
        &self,
        out: &mut String,
        resources: &mut BTreeMap<String, Vec<u8>>,
        cell: &Cell,
        cell_index: usize,
        language: &str,
    ) -> Result<()> {
        out.push_str("<section class=\"nb-cell nb-cell-code\">\n");

        if self.options.include_execution_count {
            if let Some(count) = cell.execution_count {
                let _ = write!(out, "<span class=\"nb-prompt\">In [{count}]:</span>");
                out.push('\n');
            }
        }

        out.push_str("<pre class=\"nb-input\"><code class=\"language-");
        push_escaped(out, language);
        out.push_str("\">");
        push_escaped(out, &cell.source);
        out.push_str("</code></pre>\n");

        for (output_index, output) in cell.outputs.iter().enumerate() {
            self.push_output(out, resources, output, cell_index, output_index)?;
        }

        out.push_str("</section>\n");
        Ok(())
    }

    fn push_output(
        &self,
        out: &mut String,
        resources: &mut BTreeMap<String, Vec<u8>>,
        output: &CellOutput,
        cell_index: usize,
        output_index: usize,
    ) -> Result<()> {
        match output.kind {
            OutputKind::Stream => {
                if let Some(text) = &output.text {
                    push_pre_block(out, "nb-output nb-stream", text);
                }
            }
            OutputKind::Error => {
                if let Some(text) = &output.text {
                    push_pre_block(out, "nb-output nb-error", text);
                }
            }
            OutputKind::DisplayData | OutputKind::ExecuteResult => {
                if let Some((mime, extension, payload)) = pick_image(output) {
                    let bytes = decode_image_payload(mime, payload)?;
                    let filename = format!("output_{cell_index}_{output_index}.{extension}");

                    out.push_str("<img class=\"nb-output nb-image\" src=\"");
                    push_escaped(out, &self.options.resource_url_prefix);
                    push_escaped(out, &filename);
                    out.push_str("\" alt=\"");
                    push_escaped(out, image_alt_text(output));
                    out.push_str("\">\n");

                    resources.insert(filename, bytes);
                } else if let Some(text) =
                    output.data.get(MIME_TEXT_PLAIN).or(output.text.as_ref())
                {
                    push_pre_block(out, "nb-output", text);
                } else if !output.data.is_empty() {
                    log::debug!(
                        "Skipping output with no renderable representation: {:?}",
                        output.data.keys().collect::<Vec<_>>()
                    );
                }
            }
        }
        Ok(())
    }
}

/// Render markdown through pulldown-cmark with raw HTML demoted to text.
///
/// Demoting `Html`/`InlineHtml` events makes the writer escape them like any
/// other text, so authored markup cannot inject tags into the fragment.
fn push_markdown(out: &mut String, source: &str) {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    html::push_html(out, parser);
}

/// Append a `<pre>` block with the given class and escaped text.
fn push_pre_block(out: &mut String, class: &str, text: &str) {
    out.push_str("<pre class=\"");
    out.push_str(class);
    out.push_str("\">");
    push_escaped(out, text);
    out.push_str("</pre>\n");
}

/// Escape text for use in HTML content and attribute values.
fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Highest-priority embeddable image payload of an output, if any.
fn pick_image(output: &CellOutput) -> Option<(&'static str, &'static str, &str)> {
    IMAGE_FORMATS.iter().find_map(|&(mime, extension)| {
        output
            .data
            .get(mime)
            .map(|payload| (mime, extension, payload.as_str()))
    })
}

/// Decode an image payload to raw bytes.
///
/// SVG payloads are textual and pass through as-is; the binary formats are
/// base64 with optional line wrapping.
fn decode_image_payload(mime: &str, payload: &str) -> Result<Vec<u8>> {
    if mime == "image/svg+xml" {
        return Ok(payload.as_bytes().to_vec());
    }

    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64_STANDARD
        .decode(cleaned)
        .map_err(|e| ViewerError::Render(format!("Invalid base64 in {mime} output: {e}")))
}

/// Alt text for an extracted image: the first line of the output's
/// plain-text representation, when one is present.
fn image_alt_text(output: &CellOutput) -> &str {
    output
        .data
        .get(MIME_TEXT_PLAIN)
        .and_then(|text| text.lines().next())
        .unwrap_or("")
        .trim()
}
