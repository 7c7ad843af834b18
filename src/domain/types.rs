//! Shared run-level types.
//!
//! These are kept lightweight and serializable so they can be:
//!
//! - produced in parallel by the scan workers
//! - written to the result text file
//! - exported to JSON for downstream scripts

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One simulation whose track passes through the query window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgenitorResult {
    /// Initial donor mass (grid coordinate).
    pub donor_mass: f64,
    /// Initial orbital period (grid coordinate).
    pub orbital_period: f64,
    /// Accretor mass at the first step of the record.
    pub accretor_mass: f64,
    /// Summed duration of every run of matching steps.
    pub observed_time: f64,
    /// Last time value minus first time value.
    pub lifetime: f64,
    /// Donor mass at the onset of mass transfer.
    pub onset_donor_mass: f64,
    /// log10 of the orbital period at the onset of mass transfer.
    pub onset_log_period: f64,
}

/// Resolved settings for one `progen search` run.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub query_path: PathBuf,
    pub output_path: PathBuf,
    pub data_root: PathBuf,
    /// Worker count for the scan pool (`None` = rayon default).
    pub jobs: Option<usize>,
    pub export_json: Option<PathBuf>,
    /// Print the run summary to stdout.
    pub summary: bool,
}
