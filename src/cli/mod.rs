//! Command-line parsing for the progenitor search.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! scan engine and file formats.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "progen",
    version,
    about = "Find binary-evolution progenitors that pass through an observed window"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v: debug). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan the simulation grid and write the progenitor file.
    Search(SearchArgs),
    /// Show which partitions and how many coordinates a query would scan.
    ///
    /// Records are not loaded; use `--list` to print every expected record path.
    Grid(GridArgs),
}

/// Options for a search run.
#[derive(Debug, Parser, Clone)]
pub struct SearchArgs {
    /// Query file (accretor flag line + five `low,high` rows).
    #[arg(value_name = "QUERY")]
    pub query: PathBuf,

    /// Result file (default: `progens_<query file name>` next to the query).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Root of the simulation tree (falls back to `PROGEN_DATA_ROOT`, then `.`).
    #[arg(long, value_name = "DIR")]
    pub data_root: Option<PathBuf>,

    /// Number of scan workers (default: one per CPU).
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Also export query, progenitors and errors as JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Do not print the run summary to stdout.
    #[arg(long)]
    pub no_summary: bool,
}

/// Options for inspecting the candidate set.
#[derive(Debug, Parser, Clone)]
pub struct GridArgs {
    /// Query file (accretor flag line + five `low,high` rows).
    #[arg(value_name = "QUERY")]
    pub query: PathBuf,

    /// Root of the simulation tree (falls back to `PROGEN_DATA_ROOT`, then `.`).
    #[arg(long, value_name = "DIR")]
    pub data_root: Option<PathBuf>,

    /// Print every expected record path.
    #[arg(long)]
    pub list: bool,
}
