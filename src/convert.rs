// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Batch conversion of a lesson directory into notebooks.
//!
//! [`convert_dir`] lists the Markdown files directly inside a source
//! directory, skips any whose file name is excluded, and writes one `.ipynb`
//! per remaining lesson into the output directory. Files are processed in
//! file-name order and the first I/O error stops the run.
//!
//! # Example
//!
//! ```no_run
//! use md2nb::convert::{Config, convert_dir};
//!
//! let config = Config::new("episodes", "notebooks").exclude("index.md");
//! let report = convert_dir(&config, |_| {}).unwrap();
//! println!("{report}");
//! ```

use crate::{notebook, segmenter};
use snafu::prelude::*;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of the lesson files picked up from the source directory.
pub const SOURCE_EXTENSION: &str = "md";

/// Extension given to written notebooks.
pub const NOTEBOOK_EXTENSION: &str = "ipynb";

/// Error type for conversion failures.
#[derive(Debug, Snafu)]
pub enum Error {
    /// Failed to list the source directory.
    #[snafu(display("failed to list {}: {source}", path.display()))]
    ListSources {
        /// The directory being listed.
        path: PathBuf,
        /// The underlying traversal error.
        source: walkdir::Error,
    },

    /// Failed to create the output directory.
    #[snafu(display("failed to create output directory {}: {source}", path.display()))]
    CreateOutputDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A source path had no file stem to name the notebook after.
    #[snafu(display("invalid input filename: {}", path.display()))]
    InvalidFilename {
        /// The offending source path.
        path: PathBuf,
    },

    /// Failed to read a lesson.
    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile {
        /// The lesson being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to serialize a notebook.
    #[snafu(display("failed to render {}: {source}", path.display()))]
    RenderNotebook {
        /// The lesson being converted.
        path: PathBuf,
        /// The underlying serialization error.
        source: notebook::NotebookError,
    },

    /// Failed to write a notebook.
    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteFile {
        /// The notebook being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Settings for a conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory containing the Markdown lessons.
    pub source_dir: PathBuf,

    /// Directory receiving the notebooks; created if missing.
    pub output_dir: PathBuf,

    /// File names (including extension) to skip.
    pub excluded: BTreeSet<String>,

    /// When set, lessons are read and segmented but nothing is written.
    pub dry_run: bool,
}

impl Config {
    /// Creates a configuration with no exclusions.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            excluded: BTreeSet::new(),
            dry_run: false,
        }
    }

    /// Adds a file name to the exclusion set.
    #[must_use]
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.excluded.insert(name.into());
        self
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns `true` if the given file name is excluded.
    #[must_use]
    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.excluded.contains(file_name)
    }
}

/// A single lesson converted (or, in dry-run mode, planned).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// The Markdown lesson.
    pub source: PathBuf,
    /// The notebook path.
    pub output: PathBuf,
    /// Total number of cells.
    pub cells: usize,
    /// Number of code cells.
    pub code_cells: usize,
}

/// Outcome of a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Lessons converted, in processing order.
    pub converted: Vec<Conversion>,
    /// Names of lessons skipped because they were excluded.
    pub excluded: Vec<String>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Conversion complete! Excluded: ")?;
        if self.excluded.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", self.excluded.join(", "))
        }
    }
}

/// Lists the Markdown files directly inside `dir`, sorted by file name.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn collect_sources(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.context(ListSourcesSnafu { path: dir })?;
        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext == SOURCE_EXTENSION)
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Returns where the notebook for `source` goes inside `output_dir`.
///
/// # Errors
///
/// Returns an error if `source` has no file stem.
pub fn output_path(source: &Path, output_dir: &Path) -> Result<PathBuf, Error> {
    let stem = source
        .file_stem()
        .context(InvalidFilenameSnafu { path: source })?;
    Ok(output_dir.join(format!("{}.{NOTEBOOK_EXTENSION}", stem.to_string_lossy())))
}

/// Converts one lesson to notebook JSON without writing it.
///
/// # Errors
///
/// Returns an error if the lesson cannot be read or serialized.
pub fn render_file(source: &Path) -> Result<(String, Vec<segmenter::Cell>), Error> {
    let markdown = std::fs::read_to_string(source).context(ReadFileSnafu { path: source })?;
    let cells = segmenter::segment(&markdown);
    let json = notebook::render_notebook(&cells).context(RenderNotebookSnafu { path: source })?;
    Ok((json, cells))
}

/// Converts one lesson and writes the notebook to `output`.
///
/// An existing file at `output` is overwritten.
///
/// # Errors
///
/// Returns an error if the lesson cannot be read, or the notebook cannot be
/// serialized or written.
pub fn convert_file(source: &Path, output: &Path) -> Result<Conversion, Error> {
    let (json, cells) = render_file(source)?;
    std::fs::write(output, json).context(WriteFileSnafu { path: output })?;
    Ok(conversion(source, output, &cells))
}

fn conversion(source: &Path, output: &Path, cells: &[segmenter::Cell]) -> Conversion {
    Conversion {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        cells: cells.len(),
        code_cells: cells.iter().filter(|cell| cell.is_code()).count(),
    }
}

/// Converts every non-excluded lesson in `config.source_dir`.
///
/// `on_file` is called after each lesson is converted, so callers can
/// report progress before the run finishes.
///
/// # Errors
///
/// Stops at and returns the first failure; notebooks written before it
/// are left in place.
pub fn convert_dir(
    config: &Config,
    mut on_file: impl FnMut(&Conversion),
) -> Result<Report, Error> {
    let sources = collect_sources(&config.source_dir)?;

    if !config.dry_run {
        std::fs::create_dir_all(&config.output_dir).context(CreateOutputDirSnafu {
            path: &config.output_dir,
        })?;
    }

    let mut report = Report::default();
    for source in &sources {
        let name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if config.is_excluded(&name) {
            report.excluded.push(name);
            continue;
        }

        let output = output_path(source, &config.output_dir)?;
        let converted = if config.dry_run {
            let (_, cells) = render_file(source)?;
            conversion(source, &output, &cells)
        } else {
            convert_file(source, &output)?
        };

        on_file(&converted);
        report.converted.push(converted);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_swaps_extension() {
        let out = output_path(Path::new("episodes/01-intro.md"), Path::new("notebooks")).unwrap();

        assert_eq!(out, Path::new("notebooks/01-intro.ipynb"));
    }

    #[test]
    fn output_path_keeps_inner_dots() {
        let out = output_path(Path::new("a/v1.2-setup.md"), Path::new("out")).unwrap();

        assert_eq!(out, Path::new("out/v1.2-setup.ipynb"));
    }

    #[test]
    fn output_path_rejects_missing_stem() {
        let result = output_path(Path::new(".."), Path::new("out"));

        assert!(matches!(result, Err(Error::InvalidFilename { .. })));
    }

    #[test]
    fn exclusion_is_exact_name_match() {
        let config = Config::new("src", "out").exclude("setup.md");

        assert!(config.is_excluded("setup.md"));
        assert!(!config.is_excluded("setup"));
        assert!(!config.is_excluded("Setup.md"));
        assert!(!config.is_excluded("01-setup.md"));
    }

    #[test]
    fn config_defaults() {
        let config = Config::new("episodes", "notebooks");

        assert!(config.excluded.is_empty());
        assert!(!config.dry_run);
        assert!(config.dry_run(true).dry_run);
    }

    #[test]
    fn report_summary_without_exclusions() {
        let report = Report::default();

        assert_eq!(report.to_string(), "Conversion complete! Excluded: none");
    }

    #[test]
    fn report_summary_lists_exclusions() {
        let report = Report {
            converted: Vec::new(),
            excluded: vec!["index.md".into(), "setup.md".into()],
        };

        assert_eq!(
            report.to_string(),
            "Conversion complete! Excluded: index.md, setup.md"
        );
    }

    #[test]
    fn missing_source_dir_is_an_error() {
        let config = Config::new("/nonexistent/md2nb-test-source", "/nonexistent/out");
        let result = convert_dir(&config, |_| {});

        assert!(matches!(result, Err(Error::ListSources { .. })));
    }
}
