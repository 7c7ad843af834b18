//! Result-file and terminal formatting.
//!
//! We keep formatting code in one place so:
//! - the scan code stays free of presentation details
//! - output changes are localized (the result file is consumed by scripts)

use std::time::Duration;

use crate::domain::{Diagnostics, ProgenitorResult, SearchConfig, ValidatedQuery, Property};
use crate::grid::CandidateSet;
use crate::scan::ScanStats;

/// One result line: three coordinates at 2 decimals, four derived fields at 4.
pub fn format_progenitor(r: &ProgenitorResult) -> String {
    format!(
        "{:.2} {:.2} {:.2} {:.4} {:.4} {:.4} {:.4}",
        r.donor_mass,
        r.orbital_period,
        r.accretor_mass,
        r.observed_time,
        r.lifetime,
        r.onset_donor_mass,
        r.onset_log_period,
    )
}

/// Full result file for a completed search.
pub fn format_result_file(results: &[ProgenitorResult], diagnostics: &Diagnostics) -> String {
    let mut out = String::new();
    out.push_str(&format!("Number of Progenitors Found: {}\n", results.len()));
    out.push_str("Progenitors:\n");
    for r in results {
        out.push_str(&format_progenitor(r));
        out.push('\n');
    }

    out.push_str("\nErrors:\n");
    if diagnostics.is_empty() {
        out.push_str("None");
    } else {
        for entry in diagnostics.iter() {
            out.push_str(entry);
            out.push('\n');
        }
    }
    out
}

/// Diagnostics-only file written when a run aborts.
pub fn format_fatal_file(diagnostics: &Diagnostics) -> String {
    let mut out = String::from("Errors:\n");
    for entry in diagnostics.iter() {
        out.push_str(entry);
        out.push('\n');
    }
    out
}

/// Terminal summary of a finished search.
pub fn format_search_summary(
    query: &ValidatedQuery,
    set: &CandidateSet,
    stats: &ScanStats,
    config: &SearchConfig,
    elapsed: Duration,
) -> String {
    let mut out = String::new();

    out.push_str("=== progen - progenitor grid search ===\n");
    out.push_str(&format!("Query: {}\n", config.query_path.display()));
    out.push_str(&format!("Accretor: {}\n", query.accretor_class().display_name()));
    out.push_str(&format_query_window(query));
    out.push_str(&format!(
        "Groups: {}\n",
        if set.groups.is_empty() { "(none)".to_string() } else { set.groups.join(", ") }
    ));
    out.push_str(&format!(
        "Candidates: {} | loaded={} missing={} failed={}\n",
        stats.candidates, stats.loaded, stats.missing, stats.failed
    ));
    out.push_str(&format!("Progenitors: {}\n", stats.matched));
    out.push_str(&format!("Output: {}\n", config.output_path.display()));
    out.push_str(&format!("Elapsed: {:.3}s\n", elapsed.as_secs_f64()));

    out
}

/// One line per property: `  m1   [low, high]` or `(any)`.
pub fn format_query_window(query: &ValidatedQuery) -> String {
    let mut out = String::new();
    for p in Property::ALL {
        let range = match query.interval(p) {
            Some(iv) => format!("[{:.4}, {:.4}]", iv.low, iv.high),
            None => "(any)".to_string(),
        };
        out.push_str(&format!("  {:<5} {range}\n", p.label()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccretorClass, Interval, RangeQuery};

    fn result() -> ProgenitorResult {
        ProgenitorResult {
            donor_mass: 1.15,
            orbital_period: -0.4,
            accretor_mass: 1.4,
            observed_time: 12345.678912,
            lifetime: 99999.5,
            onset_donor_mass: 1.149,
            onset_log_period: -0.39123,
        }
    }

    #[test]
    fn progenitor_line_precision() {
        assert_eq!(
            format_progenitor(&result()),
            "1.15 -0.40 1.40 12345.6789 99999.5000 1.1490 -0.3912"
        );
    }

    #[test]
    fn result_file_without_errors_ends_with_none() {
        let text = format_result_file(&[result()], &Diagnostics::new());
        assert!(text.starts_with("Number of Progenitors Found: 1\nProgenitors:\n1.15 "));
        assert!(text.ends_with("\nErrors:\nNone"));
    }

    #[test]
    fn result_file_lists_errors() {
        let mut diags = Diagnostics::new();
        diags.push("Error occurred in a.data\nbad");
        let text = format_result_file(&[], &diags);
        assert_eq!(
            text,
            "Number of Progenitors Found: 0\nProgenitors:\n\nErrors:\nError occurred in a.data\nbad\n"
        );
        assert_eq!(format_fatal_file(&diags), "Errors:\nError occurred in a.data\nbad\n");
    }

    #[test]
    fn query_window_marks_open_properties() {
        let q = RangeQuery::unconstrained(AccretorClass::BlackHole)
            .with(Property::DonorMass, Interval::new(1.0, 2.0))
            .validate()
            .unwrap();
        let text = format_query_window(&q);
        assert!(text.contains("m1    [1.0000, 2.0000]"));
        assert!(text.contains("teff  (any)"));
    }
}
