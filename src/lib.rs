// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Convert Markdown lessons to Jupyter notebooks.
//!
//! This crate turns Markdown lesson files into `.ipynb` notebooks, splitting
//! each fenced code block into its own executable cell.
//!
//! # Overview
//!
//! 1. The lesson text is segmented into markdown and code cells
//! 2. The cells are serialized as an nbformat 4 notebook
//! 3. A driver applies this to every lesson in a directory
//!
//! # Example
//!
//! ```
//! use md2nb::{notebook, segmenter};
//!
//! let lesson = "# Loops\n\n```python\nfor i in range(3):\n    print(i)\n```\n";
//! let cells = segmenter::segment(lesson);
//! assert_eq!(cells.len(), 2);
//!
//! let json = notebook::render_notebook(&cells).unwrap();
//! assert!(json.contains("\"cell_type\": \"code\""));
//! ```
//!
//! # Modules
//!
//! - [`segmenter`]: splitting Markdown into typed cells
//! - [`notebook`]: nbformat JSON output
//! - [`convert`]: directory-level conversion with exclusions

#![deny(missing_docs)]

pub mod convert;
pub mod notebook;
pub mod segmenter;
