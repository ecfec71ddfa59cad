// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Splitting Markdown lessons into notebook cells.
//!
//! A lesson is plain Markdown prose with fenced code blocks embedded in it.
//! This module walks the document once, left to right, and cuts it into an
//! ordered list of [`Cell`]s: prose becomes markdown cells, the body of each
//! fenced block becomes a code cell tagged with the fence's language.
//!
//! # Fences
//!
//! A fence is a line starting with three backticks. The first fence opens a
//! block and the next fence after it closes the block; fences do not nest.
//! An opening fence with no closing fence is left in place as ordinary text.
//!
//! Only the first three backticks count as the fence. Longer fences such as
//! four backticks leave the extra backtick on the line, where it becomes part
//! of the language tag on an opening fence or markdown text after a closing
//! one.
//!
//! # Example
//!
//! ```
//! use md2nb::segmenter::{segment, Cell};
//!
//! let cells = segment("Hello\n\n```python\nprint(1)\n```\n\nBye");
//!
//! assert_eq!(
//!     cells,
//!     vec![
//!         Cell::markdown("Hello"),
//!         Cell::code("print(1)", Some("python")),
//!         Cell::markdown("Bye"),
//!     ]
//! );
//! ```

use std::ops::Range;

/// The delimiter that opens and closes a fenced code block.
const FENCE: &str = "```";

/// A single unit of notebook content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Prose between (or around) code blocks.
    Markdown {
        /// The trimmed Markdown text.
        text: String,
    },

    /// The body of a fenced code block.
    Code {
        /// The trimmed code, without the fence lines.
        text: String,

        /// The token following the opening fence (e.g., "python").
        ///
        /// `None` when the opening fence carries no tag.
        language: Option<String>,
    },
}

impl Cell {
    /// Creates a markdown cell.
    #[must_use]
    pub fn markdown(text: impl Into<String>) -> Self {
        Self::Markdown { text: text.into() }
    }

    /// Creates a code cell with an optional language tag.
    #[must_use]
    pub fn code(text: impl Into<String>, language: Option<&str>) -> Self {
        Self::Code {
            text: text.into(),
            language: language.map(str::to_owned),
        }
    }

    /// Returns the cell's text content.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Markdown { text } | Self::Code { text, .. } => text,
        }
    }

    /// Returns the language tag of a code cell.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        match self {
            Self::Markdown { .. } => None,
            Self::Code { language, .. } => language.as_deref(),
        }
    }

    /// Returns `true` for code cells.
    #[must_use]
    pub const fn is_code(&self) -> bool {
        matches!(self, Self::Code { .. })
    }
}

/// A matched pair of fences, as byte offsets into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FencedBlock<'a> {
    /// Start of the opening fence line.
    start: usize,
    /// The text strictly between the opening and closing fence lines.
    body: Range<usize>,
    /// Just past the closing fence's backticks.
    end: usize,
    language: Option<&'a str>,
}

/// Splits a Markdown document into markdown and code cells.
///
/// Cells come back in source order. Every cell's text is trimmed, and spans
/// that are empty after trimming are dropped, so whitespace-only input yields
/// no cells at all. Malformed fencing never fails; an unmatched fence is kept
/// as prose.
#[must_use]
pub fn segment(markdown: &str) -> Vec<Cell> {
    let mut cells = Vec::new();
    let mut cursor = 0;

    while let Some(block) = next_block(markdown, cursor) {
        push_markdown(&mut cells, &markdown[cursor..block.start]);

        let body = markdown[block.body].trim();
        if !body.is_empty() {
            cells.push(Cell::code(body, block.language));
        }

        cursor = block.end;
    }

    push_markdown(&mut cells, &markdown[cursor..]);
    cells
}

fn push_markdown(cells: &mut Vec<Cell>, span: &str) {
    let text = span.trim();
    if !text.is_empty() {
        cells.push(Cell::markdown(text));
    }
}

/// Finds the next complete fenced block at or after `from`.
fn next_block(text: &str, from: usize) -> Option<FencedBlock<'_>> {
    let start = find_fence(text, from)?;

    // The body begins on the line after the opening fence, so the opening
    // fence needs a line terminator of its own.
    let line_len = text[start..].find('\n')?;
    let info = &text[start + FENCE.len()..start + line_len];
    let body_start = start + line_len + 1;

    let close = find_fence(text, body_start)?;

    Some(FencedBlock {
        start,
        body: body_start..close,
        end: close + FENCE.len(),
        language: info.split_whitespace().next(),
    })
}

/// Returns the offset of the next fence that begins a line, at or after `from`.
fn find_fence(text: &str, from: usize) -> Option<usize> {
    text[from..]
        .match_indices(FENCE)
        .map(|(offset, _)| from + offset)
        .find(|&pos| pos == 0 || text.as_bytes()[pos - 1] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_prose_and_code() {
        let cells = segment("Hello\n\n```python\nprint(1)\n```\n\nBye");

        assert_eq!(
            cells,
            vec![
                Cell::markdown("Hello"),
                Cell::code("print(1)", Some("python")),
                Cell::markdown("Bye"),
            ]
        );
    }

    #[test]
    fn code_without_language_tag() {
        let cells = segment("```\nx=1\n```");

        assert_eq!(cells, vec![Cell::code("x=1", None)]);
        assert!(cells[0].language().is_none());
    }

    #[test]
    fn whitespace_only_input_yields_no_cells() {
        assert!(segment("   \n\n   ").is_empty());
        assert!(segment("").is_empty());
    }

    #[test]
    fn unterminated_fence_is_plain_text() {
        let input = "Text\n```python\ncode";
        let cells = segment(input);

        assert_eq!(cells, vec![Cell::markdown(input)]);
    }

    #[test]
    fn prose_only_is_one_trimmed_cell() {
        let cells = segment("\n  # Title\n\nSome *prose* here.\n\n");

        assert_eq!(cells, vec![Cell::markdown("# Title\n\nSome *prose* here.")]);
    }

    #[test]
    fn empty_code_block_is_dropped() {
        let cells = segment("Before\n```python\n   \n```\nAfter");

        assert_eq!(cells, vec![Cell::markdown("Before"), Cell::markdown("After")]);
    }

    #[test]
    fn adjacent_blocks_produce_no_empty_markdown() {
        let cells = segment("```python\na = 1\n```\n\n```python\nb = 2\n```\n");

        assert_eq!(
            cells,
            vec![
                Cell::code("a = 1", Some("python")),
                Cell::code("b = 2", Some("python")),
            ]
        );
    }

    #[test]
    fn language_tag_is_first_token_verbatim() {
        let cells = segment("```Python3 {.output}\nprint('x')\n```");

        assert_eq!(cells[0].language(), Some("Python3"));
    }

    #[test]
    fn inline_backticks_do_not_open_blocks() {
        let input = "Use ```inline``` here.\n```bash\nls\n```";
        let cells = segment(input);

        assert_eq!(
            cells,
            vec![
                Cell::markdown("Use ```inline``` here."),
                Cell::code("ls", Some("bash")),
            ]
        );
    }

    #[test]
    fn body_keeps_backticks_that_are_not_fences() {
        let cells = segment("```python\ns = \"```\"\nprint(s)\n```");

        assert_eq!(cells, vec![Cell::code("s = \"```\"\nprint(s)", Some("python"))]);
    }

    #[test]
    fn nested_fence_closes_at_first_inner_fence() {
        let cells = segment("```markdown\n```python\nx\n```\n```");

        // The inner opener closes the outer block, leaving an empty body.
        // The inner closer then opens a second, also empty, block.
        assert_eq!(cells, vec![Cell::markdown("python\nx")]);
    }

    #[test]
    fn text_after_closing_fence_stays_in_markdown() {
        let cells = segment("```sh\nls\n``` trailing\nmore");

        assert_eq!(
            cells,
            vec![Cell::code("ls", Some("sh")), Cell::markdown("trailing\nmore")]
        );
    }

    #[test]
    fn opening_fence_at_end_of_input_is_text() {
        let cells = segment("Intro\n```python");

        assert_eq!(cells, vec![Cell::markdown("Intro\n```python")]);
    }

    #[test]
    fn longer_fences_keep_extra_backticks() {
        let cells = segment("````python\nx\n````");

        assert_eq!(
            cells,
            vec![Cell::code("x", Some("`python")), Cell::markdown("`")]
        );
    }

    #[test]
    fn handles_crlf_line_endings() {
        let cells = segment("Hi\r\n```python\r\nprint(1)\r\n```\r\nBye\r\n");

        assert_eq!(
            cells,
            vec![
                Cell::markdown("Hi"),
                Cell::code("print(1)", Some("python")),
                Cell::markdown("Bye"),
            ]
        );
    }

    #[test]
    fn keeps_non_ascii_text() {
        let cells = segment("Café ☕\n```python\nprint(\"héllo\")\n```");

        assert_eq!(cells[0].text(), "Café ☕");
        assert_eq!(cells[1].text(), "print(\"héllo\")");
    }

    #[test]
    fn counts_blocks_in_source_order() {
        let input = "A\n```python\n1\n```\nB\n```r\n2\n```\nC\n```\n3\n```\nD";
        let cells = segment(input);

        let code: Vec<_> = cells.iter().filter(|c| c.is_code()).collect();
        assert_eq!(code.len(), 3);
        assert_eq!(cells.len(), 7);
        let texts: Vec<_> = cells.iter().map(Cell::text).collect();
        assert_eq!(texts, ["A", "1", "B", "2", "C", "3", "D"]);
    }

    #[test]
    fn segmentation_is_repeatable() {
        let input = "Intro\n```python\nx = 1\n```\nOutro";

        assert_eq!(segment(input), segment(input));
    }
}
