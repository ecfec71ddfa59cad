// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Jupyter notebook output for segmented lessons.
//!
//! This module turns a list of [`Cell`]s into an nbformat 4.5 document, the
//! JSON format read by Jupyter, `JupyterLab`, and most notebook editors.
//!
//! # Output Format
//!
//! The written JSON follows the conventions of Jupyter's own writer so that
//! regenerated notebooks diff cleanly:
//! - keys are sorted, indentation is a single space
//! - `source` is a list of lines, each keeping its `\n` except the last
//! - code cells are unexecuted (`execution_count: null`, no outputs)
//! - cell ids are derived from the cell's position, so output is stable
//!
//! # Example
//!
//! ```
//! use md2nb::notebook::render_notebook;
//! use md2nb::segmenter::segment;
//!
//! let cells = segment("# Intro\n\n```python\nprint(1)\n```");
//! let json = render_notebook(&cells).unwrap();
//!
//! assert!(json.contains("\"cell_type\": \"markdown\""));
//! assert!(json.contains("\"nbformat\": 4"));
//! ```

use crate::segmenter::Cell;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use snafu::prelude::*;

/// Major nbformat version written by this module.
pub const NBFORMAT: u32 = 4;

/// Minor nbformat version; 4.5 introduced cell ids.
pub const NBFORMAT_MINOR: u32 = 5;

/// Error type for notebook serialization failures.
#[derive(Debug, Snafu)]
pub enum NotebookError {
    /// Failed to serialize the notebook as JSON.
    #[snafu(display("failed to serialize notebook: {source}"))]
    Json {
        /// The underlying JSON serialization error.
        source: serde_json::Error,
    },

    /// The serialized notebook was not valid UTF-8.
    #[snafu(display("serialized notebook is not valid UTF-8: {source}"))]
    Utf8 {
        /// The underlying conversion error.
        source: std::string::FromUtf8Error,
    },
}

/// An nbformat 4 notebook document.
///
/// Field order matches the sorted key order Jupyter writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notebook {
    /// The notebook's cells, in source order.
    pub cells: Vec<NotebookCell>,

    /// Notebook-level metadata.
    pub metadata: NotebookMetadata,

    /// Major format version.
    pub nbformat: u32,

    /// Minor format version.
    pub nbformat_minor: u32,
}

/// Notebook-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotebookMetadata {
    /// The primary language of the notebook's code cells, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_info: Option<LanguageInfo>,
}

/// The `language_info` block of notebook metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    /// Language name as written on the opening fence (e.g., "python").
    pub name: String,
}

/// A single notebook cell as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum NotebookCell {
    /// A markdown cell.
    Markdown {
        /// Cell id, unique within the notebook.
        id: String,
        /// Per-cell metadata (always empty for markdown).
        metadata: CellMetadata,
        /// Cell text split into lines.
        source: Vec<String>,
    },

    /// An unexecuted code cell.
    Code {
        /// Always `None`; the notebook has not been run.
        execution_count: Option<u32>,
        /// Cell id, unique within the notebook.
        id: String,
        /// Per-cell metadata, carrying the fence's language tag.
        metadata: CellMetadata,
        /// Always empty.
        outputs: Vec<serde_json::Value>,
        /// Cell code split into lines.
        source: Vec<String>,
    },
}

/// Per-cell metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CellMetadata {
    /// Language tag from the code fence, when one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Notebook {
    /// Builds a notebook from segmented cells.
    ///
    /// The first tagged code cell decides the notebook's `language_info`.
    #[must_use]
    pub fn from_cells(cells: &[Cell]) -> Self {
        let language_info = cells
            .iter()
            .find_map(Cell::language)
            .map(|name| LanguageInfo {
                name: name.to_owned(),
            });

        Self {
            cells: cells
                .iter()
                .enumerate()
                .map(|(index, cell)| NotebookCell::from_cell(index, cell))
                .collect(),
            metadata: NotebookMetadata { language_info },
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        }
    }

    /// Serializes the notebook to its on-disk JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, NotebookError> {
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
        self.serialize(&mut ser).context(JsonSnafu)?;
        buf.push(b'\n');
        String::from_utf8(buf).context(Utf8Snafu)
    }
}

impl NotebookCell {
    fn from_cell(index: usize, cell: &Cell) -> Self {
        let id = format!("cell-{index}");
        match cell {
            Cell::Markdown { text } => Self::Markdown {
                id,
                metadata: CellMetadata::default(),
                source: split_lines(text),
            },
            Cell::Code { text, language } => Self::Code {
                execution_count: None,
                id,
                metadata: CellMetadata {
                    language: language.clone(),
                },
                outputs: Vec::new(),
                source: split_lines(text),
            },
        }
    }
}

/// Splits text into lines, keeping each line's terminator.
fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_owned).collect()
}

/// Renders segmented cells as notebook JSON.
///
/// Shorthand for [`Notebook::from_cells`] followed by [`Notebook::to_json`].
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_notebook(cells: &[Cell]) -> Result<String, NotebookError> {
    Notebook::from_cells(cells).to_json()
}
