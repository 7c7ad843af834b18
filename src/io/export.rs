//! Result file and JSON export.
//!
//! The text file keeps the layout downstream scripts already parse; the JSON
//! export carries the same data with the query attached.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{Diagnostics, ProgenitorResult, ValidatedQuery};
use crate::error::AppError;
use crate::report::{format_fatal_file, format_result_file};

/// Write the result file for a completed search.
pub fn write_result_file(
    path: &Path,
    results: &[ProgenitorResult],
    diagnostics: &Diagnostics,
) -> Result<(), AppError> {
    write_text(path, &format_result_file(results, diagnostics))
}

/// Write only the diagnostics, used when a run aborts.
pub fn write_fatal_file(path: &Path, diagnostics: &Diagnostics) -> Result<(), AppError> {
    write_text(path, &format_fatal_file(diagnostics))
}

#[derive(Serialize)]
struct JsonExport<'a> {
    tool: &'static str,
    query: &'a ValidatedQuery,
    progenitors: &'a [ProgenitorResult],
    errors: &'a Diagnostics,
}

/// Write query, results and diagnostics as pretty JSON.
pub fn write_results_json(
    path: &Path,
    query: &ValidatedQuery,
    results: &[ProgenitorResult],
    diagnostics: &Diagnostics,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create JSON export '{}': {e}", path.display())))?;
    let export = JsonExport {
        tool: "progen",
        query,
        progenitors: results,
        errors: diagnostics,
    };
    serde_json::to_writer_pretty(file, &export)
        .map_err(|e| AppError::new(4, format!("Failed to write JSON export: {e}")))?;
    Ok(())
}

fn write_text(path: &Path, text: &str) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create output '{}': {e}", path.display())))?;
    file.write_all(text.as_bytes())
        .map_err(|e| AppError::new(4, format!("Failed to write output '{}': {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccretorClass, Interval, Property, RangeQuery};

    #[test]
    fn json_export_contains_query_and_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let query = RangeQuery::unconstrained(AccretorClass::BlackHole)
            .with(Property::DonorMass, Interval::new(1.0, 2.0))
            .validate()
            .unwrap();
        let results = vec![ProgenitorResult {
            donor_mass: 1.5,
            orbital_period: 0.2,
            accretor_mass: 10.0,
            observed_time: 1.0,
            lifetime: 2.0,
            onset_donor_mass: 1.5,
            onset_log_period: -0.7,
        }];

        write_results_json(&path, &query, &results, &Diagnostics::new()).unwrap();
        let value: serde_json::Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(value["tool"], "progen");
        assert_eq!(value["query"]["accretor_class"], "black_hole");
        assert_eq!(value["query"]["donor_mass"]["high"], 2.0);
        assert_eq!(value["progenitors"][0]["accretor_mass"], 10.0);
        assert!(value["errors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn unwritable_output_is_an_app_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.txt");
        let err = write_fatal_file(&path, &Diagnostics::new()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
