//! Shared search workflow used by the CLI and by integration tests.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! query file -> validation -> candidate set -> parallel scan -> result file
//!
//! The CLI can then focus on presentation (summary printing, logging setup).

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::domain::{Diagnostics, QueryError, SearchConfig, ValidatedQuery};
use crate::error::AppError;
use crate::grid::{CandidateSet, GridCatalog};
use crate::io::export::{write_fatal_file, write_result_file, write_results_json};
use crate::io::query::read_query;
use crate::io::record::{FsRecordStore, RecordSource};
use crate::scan::{ScanOutput, scan_with_jobs};

/// All computed outputs of a single search.
#[derive(Debug, Clone)]
pub struct SearchOutput {
    pub query: ValidatedQuery,
    pub candidates: CandidateSet,
    pub scan: ScanOutput,
    pub elapsed: Duration,
}

/// Read and validate a query file.
pub fn load_query(path: &Path) -> Result<ValidatedQuery, QueryError> {
    read_query(path)?.validate()
}

/// Resolve candidates for `query` and scan them against `source`.
pub fn run_search<S: RecordSource + ?Sized>(
    query: ValidatedQuery,
    catalog: &GridCatalog,
    source: &S,
    jobs: Option<usize>,
) -> Result<SearchOutput, AppError> {
    let started = Instant::now();

    let candidates = catalog.resolve(&query);
    info!(
        groups = ?candidates.groups,
        candidates = candidates.len(),
        "resolved candidate set"
    );

    let scan = scan_with_jobs(source, &query, &candidates, jobs)?;
    let elapsed = started.elapsed();
    info!(
        progenitors = scan.results.len(),
        errors = scan.diagnostics.len(),
        "Search Complete, time taken: {:.3} seconds",
        elapsed.as_secs_f64()
    );

    Ok(SearchOutput {
        query,
        candidates,
        scan,
        elapsed,
    })
}

/// Run a complete search from files to files.
///
/// On a fatal error the diagnostics gathered so far are written to the output
/// path before the error is returned.
pub fn execute_search(config: &SearchConfig, catalog: &GridCatalog) -> Result<SearchOutput, AppError> {
    let mut diagnostics = Diagnostics::new();

    let query = match load_query(&config.query_path) {
        Ok(query) => query,
        Err(e) => {
            diagnostics.push(e.to_string());
            persist_fatal(&config.output_path, &diagnostics);
            return Err(AppError::new(
                2,
                format!(
                    "Error in query input: check '{}' for details",
                    config.output_path.display()
                ),
            ));
        }
    };
    info!(query = ?query.as_range_query(), "Query input taken");

    let store = FsRecordStore::new(&config.data_root);
    let mut output = run_search(query, catalog, &store, config.jobs)?;
    diagnostics.merge(std::mem::take(&mut output.scan.diagnostics));

    if let Err(e) = write_result_file(&config.output_path, &output.scan.results, &diagnostics) {
        diagnostics.push(format!("Error occurred in writing output:\n{e}"));
        persist_fatal(&config.output_path, &diagnostics);
        return Err(e);
    }
    info!("Progenitor properties stored in: {}", config.output_path.display());

    if let Some(path) = &config.export_json {
        write_results_json(path, &output.query, &output.scan.results, &diagnostics)?;
    }

    output.scan.diagnostics = diagnostics;
    Ok(output)
}

fn persist_fatal(path: &Path, diagnostics: &Diagnostics) {
    if let Err(e) = write_fatal_file(path, diagnostics) {
        error!("{e}");
    }
}
