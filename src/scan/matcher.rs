//! Per-step containment and run aggregation.
//!
//! A step is a hit when every constrained property lies in its interval.
//! Consecutive hits form a run; each run contributes
//! `time[run.end] - time[run.start]` to the observed time. A run of one step
//! therefore contributes nothing but still counts as a match.

use crate::domain::{Property, ValidatedQuery};
use crate::io::record::SimulationRecord;

/// Inclusive range of consecutive matching steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: usize,
    pub end: usize,
}

/// Runs found in one record window.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub runs: Vec<Run>,
    pub observed_time: f64,
}

impl Observation {
    pub fn is_match(&self) -> bool {
        !self.runs.is_empty()
    }
}

/// Whether step `k` of `record` lies inside the query window.
pub fn step_matches(record: &SimulationRecord, query: &ValidatedQuery, k: usize) -> bool {
    Property::ALL
        .into_iter()
        .all(|p| query.admits(p, record.column(p)[k]))
}

/// Collect runs of matching steps in `start..=end`.
///
/// `end` is clamped to the last step; an empty or inverted window has no runs.
pub fn matching_runs(record: &SimulationRecord, query: &ValidatedQuery, start: usize, end: usize) -> Vec<Run> {
    let mut runs = Vec::new();
    let Some(last) = record.len().checked_sub(1) else {
        return runs;
    };
    let end = end.min(last);
    if start > end {
        return runs;
    }

    let mut open: Option<usize> = None;
    for k in start..=end {
        let hit = step_matches(record, query, k);
        match (hit, open) {
            (true, None) => open = Some(k),
            (false, Some(run_start)) => {
                runs.push(Run { start: run_start, end: k - 1 });
                open = None;
            }
            _ => {}
        }
    }
    if let Some(run_start) = open {
        runs.push(Run { start: run_start, end });
    }

    runs
}

/// Sum of run durations over the time column.
pub fn observed_time(time: &[f64], runs: &[Run]) -> f64 {
    runs.iter().map(|r| time[r.end] - time[r.start]).sum()
}

/// Scan `start..=end` and aggregate observed time.
pub fn observe(record: &SimulationRecord, query: &ValidatedQuery, start: usize, end: usize) -> Observation {
    let runs = matching_runs(record, query, start, end);
    let observed_time = observed_time(&record.time, &runs);
    Observation { runs, observed_time }
}
