// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for md2nb.
//!
//! This binary provides the `md2nb` command for converting a directory of
//! Markdown lessons into Jupyter notebooks.

use lexopt::prelude::*;
use md2nb::convert::{self, Config};
use snafu::prelude::*;
use std::path::PathBuf;

/// Source directory used when none is given.
const DEFAULT_SOURCE: &str = "episodes";

/// Output directory used when `--output` is not given.
const DEFAULT_OUTPUT: &str = "notebooks";

struct Cli {
    source: PathBuf,
    output: PathBuf,
    excluded: Vec<String>,
    quiet: bool,
    dry_run: bool,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("{source}"))]
    Convert { source: convert::Error },
}

fn print_help() {
    println!(
        "\
{name} {version}
Convert Markdown lessons to Jupyter notebooks

Usage: {name} [OPTIONS] [SOURCE]

Arguments:
  [SOURCE]  Directory of Markdown lessons (default: {source})

Options:
  -o, --output <DIR>    Output directory (default: {output})
  -x, --exclude <NAME>  Skip a lesson by exact file name (repeatable)
  -q, --quiet           Suppress progress messages
  -n, --dry-run         Show what would be written without writing
  -h, --help            Print help
  -V, --version         Print version",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        source = DEFAULT_SOURCE,
        output = DEFAULT_OUTPUT,
    );
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    let mut source: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut excluded = Vec::new();
    let mut quiet = false;
    let mut dry_run = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('o') | Long("output") => output = Some(parser.value()?.parse()?),
            Short('x') | Long("exclude") => excluded.push(parser.value()?.string()?),
            Short('q') | Long("quiet") => quiet = true,
            Short('n') | Long("dry-run") => dry_run = true,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) if source.is_none() => source = Some(val.parse()?),
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Cli {
        source: source.unwrap_or_else(|| DEFAULT_SOURCE.into()),
        output: output.unwrap_or_else(|| DEFAULT_OUTPUT.into()),
        excluded,
        quiet,
        dry_run,
    })
}

fn make_config(cli: Cli) -> Config {
    cli.excluded
        .into_iter()
        .fold(Config::new(cli.source, cli.output), Config::exclude)
        .dry_run(cli.dry_run)
}

fn main() -> Result<(), Error> {
    let cli = parse_args().context(ParseArgsSnafu)?;
    let quiet = cli.quiet;
    let config = make_config(cli);

    let report = convert::convert_dir(&config, |file| {
        if quiet {
            return;
        }
        if config.dry_run {
            eprintln!("Would write {} ({} cells)", file.output.display(), file.cells);
        } else {
            eprintln!(
                "Wrote {} ({} cells, {} code)",
                file.output.display(),
                file.cells,
                file.code_cells
            );
        }
    })
    .context(ConvertSnafu)?;

    println!("{report}");
    Ok(())
}
