//! Candidate evaluation and result assembly.
//!
//! Every candidate is independent and read-only with respect to the others, so
//! the scan is a parallel map over the candidate set. Workers return an
//! outcome per candidate; the caller sorts outcomes by `CandidateKey` and folds
//! them into the result sequence and diagnostic log, which keeps the output
//! identical across runs and thread counts.

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{Diagnostics, ProgenitorResult, Property, ValidatedQuery};
use crate::error::AppError;
use crate::grid::{Candidate, CandidateKey, CandidateSet};
use crate::io::record::{RecordError, RecordSource, SimulationRecord};
use crate::scan::matcher::observe;
use crate::scan::onset::mass_transfer_onset;
use crate::scan::search::mass_window;

/// Per-candidate failures. They are logged and the candidate is skipped.
#[derive(Debug, Error)]
pub enum CandidateError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("non-positive orbital period {period} at mass-transfer onset step {step}")]
    NonPositiveOnsetPeriod { step: usize, period: f64 },
}

/// What happened to one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    /// No record on disk for this coordinate.
    Missing,
    /// Record loaded but the track never enters the window.
    NoMatch,
    Matched(ProgenitorResult),
    /// Diagnostic text for a load or matching failure.
    Failed(String),
}

/// Counters for the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub candidates: usize,
    pub loaded: usize,
    pub missing: usize,
    pub failed: usize,
    pub matched: usize,
}

/// Results of scanning one candidate set.
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    pub results: Vec<ProgenitorResult>,
    pub diagnostics: Diagnostics,
    pub stats: ScanStats,
}

/// Evaluate a loaded record against the query.
///
/// `Ok(None)` means the record is not a progenitor.
pub fn evaluate_record(
    record: &SimulationRecord,
    query: &ValidatedQuery,
    candidate: &Candidate,
) -> Result<Option<ProgenitorResult>, CandidateError> {
    let (Some(&final_donor_mass), Some(&initial_accretor_mass)) =
        (record.donor_mass.last(), record.accretor_mass.first())
    else {
        return Ok(None);
    };

    let donor_iv = query.interval(Property::DonorMass);
    if donor_iv.is_some_and(|iv| final_donor_mass > iv.high) {
        return Ok(None);
    }
    if query
        .interval(Property::AccretorMass)
        .is_some_and(|iv| initial_accretor_mass > iv.high)
    {
        return Ok(None);
    }

    let Some((start, end)) = mass_window(&record.donor_mass, donor_iv) else {
        return Ok(None);
    };

    let observation = observe(record, query, start, end);
    if !observation.is_match() {
        return Ok(None);
    }

    let onset = mass_transfer_onset(&record.log_mass_transfer_rate);
    let onset_period = record.orbital_period[onset];
    if onset_period <= 0.0 {
        return Err(CandidateError::NonPositiveOnsetPeriod { step: onset, period: onset_period });
    }

    Ok(Some(ProgenitorResult {
        donor_mass: candidate.donor_mass,
        orbital_period: candidate.orbital_period,
        accretor_mass: initial_accretor_mass,
        observed_time: observation.observed_time,
        lifetime: record.lifetime(),
        onset_donor_mass: record.donor_mass[onset],
        onset_log_period: onset_period.log10(),
    }))
}

/// Load and evaluate one candidate. Never fails: errors become `Failed`.
pub fn evaluate_candidate<S: RecordSource + ?Sized>(
    source: &S,
    query: &ValidatedQuery,
    candidate: &Candidate,
) -> CandidateOutcome {
    let location = source.locate(candidate);
    let record = match source.load(candidate) {
        Ok(Some(record)) => record,
        Ok(None) => {
            debug!("No path found: {location}");
            return CandidateOutcome::Missing;
        }
        Err(e) => return CandidateOutcome::Failed(format!("Error occurred in {location}\n{e}")),
    };

    match evaluate_record(&record, query, candidate) {
        Ok(Some(result)) => {
            info!("Found Progenitor -> {location}");
            CandidateOutcome::Matched(result)
        }
        Ok(None) => CandidateOutcome::NoMatch,
        Err(e) => CandidateOutcome::Failed(format!("Error occurred in {location}\n{e}")),
    }
}

/// Scan every candidate on the current rayon pool.
pub fn scan<S: RecordSource + ?Sized>(source: &S, query: &ValidatedQuery, set: &CandidateSet) -> ScanOutput {
    let mut outcomes: Vec<(CandidateKey, CandidateOutcome)> = set
        .candidates
        .par_iter()
        .map(|c| (c.key, evaluate_candidate(source, query, c)))
        .collect();
    outcomes.sort_by_key(|(key, _)| *key);

    let mut out = ScanOutput {
        stats: ScanStats { candidates: outcomes.len(), ..ScanStats::default() },
        ..ScanOutput::default()
    };
    for (_, outcome) in outcomes {
        match outcome {
            CandidateOutcome::Missing => out.stats.missing += 1,
            CandidateOutcome::NoMatch => out.stats.loaded += 1,
            CandidateOutcome::Matched(result) => {
                out.stats.loaded += 1;
                out.stats.matched += 1;
                out.results.push(result);
            }
            CandidateOutcome::Failed(message) => {
                out.stats.failed += 1;
                out.diagnostics.push(message);
            }
        }
    }
    out
}

/// Scan on a dedicated pool of `jobs` workers (`None` = rayon default).
pub fn scan_with_jobs<S: RecordSource + ?Sized>(
    source: &S,
    query: &ValidatedQuery,
    set: &CandidateSet,
    jobs: Option<usize>,
) -> Result<ScanOutput, AppError> {
    let mut builder = ThreadPoolBuilder::new();
    if let Some(n) = jobs {
        builder = builder.num_threads(n);
    }
    let pool = builder
        .build()
        .map_err(|e| AppError::new(2, format!("Failed to start scan workers: {e}")))?;
    Ok(pool.install(|| scan(source, query, set)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::{AccretorClass, Interval, RangeQuery};
    use crate::grid::{GridAxis, GridCatalog, Partition};

    /// In-memory source keyed by `record_file_name`-style coordinates.
    struct MemorySource {
        records: HashMap<String, Result<SimulationRecord, String>>,
    }

    impl MemorySource {
        fn key(c: &Candidate) -> String {
            format!("{}/{}/{:.2}/{:.2}", c.group_dir, c.partition, c.donor_mass, c.orbital_period)
        }
    }

    impl RecordSource for MemorySource {
        fn locate(&self, candidate: &Candidate) -> String {
            Self::key(candidate)
        }

        fn load(&self, candidate: &Candidate) -> Result<Option<SimulationRecord>, RecordError> {
            match self.records.get(&Self::key(candidate)) {
                None => Ok(None),
                Some(Ok(r)) => Ok(Some(r.clone())),
                Some(Err(token)) => Err(RecordError::Parse { line: 1, token: token.clone() }),
            }
        }
    }

    fn catalog() -> GridCatalog {
        GridCatalog {
            partitions: vec![Partition {
                name: "test",
                donor_masses: GridAxis::new(100, 300, 100),
                orbital_periods: GridAxis::new(50, 100, 50),
            }],
            neutron_star_dir: "ns_data".to_string(),
            black_hole_groups: vec![],
        }
    }

    /// Donor mass falls linearly from `m0`; period rises from 1.0; mdot on after step 2.
    fn track(m0: f64, steps: usize) -> SimulationRecord {
        let rows: Vec<[f64; 6]> = (0..steps)
            .map(|i| {
                let mdot = if i >= 2 { -9.0 } else { -20.0 };
                [m0 - 0.1 * i as f64, 1.4, mdot, 1.0 + 0.1 * i as f64, 3.7, 100.0 * i as f64]
            })
            .collect();
        SimulationRecord::from_rows(&rows).unwrap()
    }

    fn query() -> ValidatedQuery {
        RangeQuery::unconstrained(AccretorClass::NeutronStar)
            .with(Property::DonorMass, Interval::new(1.45, 1.75))
            .with(Property::AccretorMass, Interval::new(1.0, 2.0))
            .with(Property::LogMassTransferRate, Interval::new(-12.0, -8.0))
            .validate()
            .unwrap()
    }

    fn source() -> MemorySource {
        let mut records = HashMap::new();
        records.insert("ns_data/test/2.00/0.50".to_string(), Ok(track(2.0, 10)));
        records.insert("ns_data/test/2.00/1.00".to_string(), Err("garbage".to_string()));
        records.insert("ns_data/test/3.00/0.50".to_string(), Ok(track(3.0, 10)));
        MemorySource { records }
    }

    #[test]
    fn evaluate_record_reports_onset_and_times() {
        let record = track(2.0, 10);
        let set = catalog().resolve(&query());
        let c = &set.candidates[2];
        let result = evaluate_record(&record, &query(), c).unwrap().unwrap();

        // Donor masses 1.7, 1.6, 1.5 (steps 3..=5) are inside the window.
        assert!((result.observed_time - 200.0).abs() < 1e-9);
        assert!((result.lifetime - 900.0).abs() < 1e-9);
        assert!((result.onset_donor_mass - 1.8).abs() < 1e-9);
        assert!((result.onset_log_period - 1.2f64.log10()).abs() < 1e-12);
        assert_eq!(result.donor_mass, c.donor_mass);
        assert!(result.observed_time <= result.lifetime);
    }

    #[test]
    fn prefilter_rejects_heavy_accretor() {
        let rows: Vec<[f64; 6]> = (0..6).map(|i| [2.0 - 0.1 * i as f64, 5.0, -9.0, 1.0, 3.7, i as f64]).collect();
        let record = SimulationRecord::from_rows(&rows).unwrap();
        let set = catalog().resolve(&query());
        assert_eq!(evaluate_record(&record, &query(), &set.candidates[0]).unwrap(), None);
    }

    #[test]
    fn non_positive_onset_period_is_an_error() {
        let rows: Vec<[f64; 6]> = (0..6).map(|i| [1.6, 1.4, -9.0, 0.0, 3.7, i as f64]).collect();
        let record = SimulationRecord::from_rows(&rows).unwrap();
        let set = catalog().resolve(&query());
        let err = evaluate_record(&record, &query(), &set.candidates[0]).unwrap_err();
        assert!(matches!(err, CandidateError::NonPositiveOnsetPeriod { step: 0, .. }));
    }

    #[test]
    fn scan_collects_results_failures_and_missing() {
        let set = catalog().resolve(&query());
        assert_eq!(set.len(), 4);

        let out = scan(&source(), &query(), &set);
        assert_eq!(
            out.stats,
            ScanStats { candidates: 4, loaded: 2, missing: 1, failed: 1, matched: 1 }
        );
        assert_eq!(out.results.len(), 1);
        assert_eq!(out.results[0].donor_mass, 2.0);
        assert_eq!(out.diagnostics.len(), 1);
        assert!(out.diagnostics.iter().next().unwrap().starts_with("Error occurred in ns_data/test/2.00/1.00"));
    }

    #[test]
    fn scan_is_deterministic_across_pool_sizes() {
        let set = catalog().resolve(&query());
        let single = scan_with_jobs(&source(), &query(), &set, Some(1)).unwrap();
        let many = scan_with_jobs(&source(), &query(), &set, Some(4)).unwrap();
        let again = scan_with_jobs(&source(), &query(), &set, Some(4)).unwrap();
        assert_eq!(single.results, many.results);
        assert_eq!(many.results, again.results);
        assert_eq!(single.diagnostics, again.diagnostics);
    }
}
