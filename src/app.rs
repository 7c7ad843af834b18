//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and `.env` settings
//! - sets up logging
//! - runs the search pipeline and prints the summary
//! - answers `grid` inspection requests

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, GridArgs, SearchArgs};
use crate::domain::SearchConfig;
use crate::error::AppError;
use crate::grid::GridCatalog;
use crate::io::record::FsRecordStore;

pub mod pipeline;

/// Environment variable naming the simulation tree root.
pub const DATA_ROOT_ENV: &str = "PROGEN_DATA_ROOT";

/// Entry point for the `progen` binary.
pub fn run() -> Result<(), AppError> {
    // `progen query.txt` behaves like `progen search query.txt`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Search(args) => handle_search(args),
        Command::Grid(args) => handle_grid(args),
    }
}

fn handle_search(args: SearchArgs) -> Result<(), AppError> {
    let config = search_config_from_args(&args)?;
    let catalog = GridCatalog::standard();
    let output = pipeline::execute_search(&config, &catalog)?;

    if config.summary {
        println!(
            "{}",
            crate::report::format_search_summary(
                &output.query,
                &output.candidates,
                &output.scan.stats,
                &config,
                output.elapsed,
            )
        );
    }
    Ok(())
}

fn handle_grid(args: GridArgs) -> Result<(), AppError> {
    let query = pipeline::load_query(&args.query)?;
    let catalog = GridCatalog::standard();
    let set = catalog.resolve(&query);
    let store = FsRecordStore::new(resolve_data_root(args.data_root.clone()));

    println!("Accretor: {}", query.accretor_class().display_name());
    print!("{}", crate::report::format_query_window(&query));
    println!("Data root: {}", store.root().display());

    for (gi, group) in set.groups.iter().enumerate() {
        println!("{group}:");
        for (pi, partition) in catalog.partitions.iter().enumerate() {
            let count = set
                .candidates
                .iter()
                .filter(|c| c.key.group == gi && c.key.partition == pi)
                .count();
            println!("  {:<6} {count} coordinates", partition.name);
        }
    }
    println!("Total: {} coordinates", set.len());

    if args.list {
        for c in &set.candidates {
            println!("{}", store.record_path(c).display());
        }
    }
    Ok(())
}

pub fn search_config_from_args(args: &SearchArgs) -> Result<SearchConfig, AppError> {
    if args.jobs == Some(0) {
        return Err(AppError::new(2, "`--jobs` must be at least 1."));
    }
    Ok(SearchConfig {
        query_path: args.query.clone(),
        output_path: args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.query)),
        data_root: resolve_data_root(args.data_root.clone()),
        jobs: args.jobs,
        export_json: args.export_json.clone(),
        summary: !args.no_summary,
    })
}

/// `--data-root`, else `PROGEN_DATA_ROOT` (`.env` honoured), else `.`.
fn resolve_data_root(cli_value: Option<PathBuf>) -> PathBuf {
    if let Some(root) = cli_value {
        return root;
    }
    dotenvy::dotenv().ok();
    std::env::var_os(DATA_ROOT_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `dir/query.txt` -> `dir/progens_query.txt`.
pub fn default_output_path(query: &Path) -> PathBuf {
    let name = query
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "query".to_string());
    query.with_file_name(format!("progens_{name}"))
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_directive = if quiet {
        "progen_search=warn"
    } else if verbose > 0 {
        "progen_search=debug"
    } else {
        "progen_search=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // Logs go to stderr so stdout carries only the summary.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Rewrite argv so a bare query path runs `search`.
///
/// Rules:
/// - `progen`                       -> unchanged (clap prints usage)
/// - `progen --help/--version/-h`   -> unchanged
/// - `progen search|grid ...`       -> unchanged
/// - `progen q.txt ...`             -> `progen search q.txt ...`
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "search" | "grid");
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "search".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_query_path_becomes_search() {
        assert_eq!(rewrite_args(args(&["progen", "q.txt"])), args(&["progen", "search", "q.txt"]));
        assert_eq!(
            rewrite_args(args(&["progen", "-v", "q.txt"])),
            args(&["progen", "search", "-v", "q.txt"])
        );
        assert_eq!(rewrite_args(args(&["progen", "grid", "q.txt"])), args(&["progen", "grid", "q.txt"]));
        assert_eq!(rewrite_args(args(&["progen", "--help"])), args(&["progen", "--help"]));
    }

    #[test]
    fn default_output_sits_next_to_query() {
        assert_eq!(
            default_output_path(Path::new("runs/q1.txt")),
            PathBuf::from("runs/progens_q1.txt")
        );
        assert_eq!(default_output_path(Path::new("q1.txt")), PathBuf::from("progens_q1.txt"));
    }

    #[test]
    fn search_args_parse_and_validate() {
        let cli = Cli::parse_from(args(&["progen", "search", "q.txt", "-j", "3", "--data-root", "/data"]));
        let Command::Search(search) = cli.command else {
            panic!("expected search");
        };
        let config = search_config_from_args(&search).unwrap();
        assert_eq!(config.jobs, Some(3));
        assert_eq!(config.data_root, PathBuf::from("/data"));
        assert!(config.summary);

        let zero = SearchArgs { jobs: Some(0), ..search };
        assert_eq!(search_config_from_args(&zero).unwrap_err().exit_code(), 2);
    }
}
