//! Simulation record loading.
//!
//! Each grid coordinate maps to one text file holding the evolutionary track:
//! one row per time step, six whitespace-separated columns
//! (donor mass, accretor mass, log mdot, period, log teff, time).
//!
//! Design goals:
//! - **Validate once at load** (column count, finite values, time order)
//! - **Absence is normal**: a missing file means "not simulated", not an error
//! - **Pluggable source** via `RecordSource` so the scan can be tested in memory

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::Property;
use crate::grid::Candidate;

/// Number of columns in every record row.
pub const RECORD_COLUMNS: usize = 6;

/// One evolutionary track as six typed columns of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRecord {
    /// Non-increasing along the track.
    pub donor_mass: Vec<f64>,
    pub accretor_mass: Vec<f64>,
    pub log_mass_transfer_rate: Vec<f64>,
    pub orbital_period: Vec<f64>,
    pub log_effective_temperature: Vec<f64>,
    /// Non-decreasing along the track.
    pub time: Vec<f64>,
}

/// Why a record could not be used.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: invalid number '{token}'")]
    Parse { line: usize, token: String },
    #[error("line {line}: expected 6 columns, found {found}")]
    ColumnCount { line: usize, found: usize },
    #[error("line {line}: non-finite value")]
    NonFinite { line: usize },
    #[error("line {line}: time column decreases")]
    TimeDecreasing { line: usize },
    #[error("record has no rows")]
    Empty,
}

impl SimulationRecord {
    /// Build a record from rows, checking the invariants the scan relies on.
    ///
    /// Row numbers in errors are 1-based positions in `rows`.
    pub fn from_rows(rows: &[[f64; RECORD_COLUMNS]]) -> Result<Self, RecordError> {
        if rows.is_empty() {
            return Err(RecordError::Empty);
        }

        let mut record = Self {
            donor_mass: Vec::with_capacity(rows.len()),
            accretor_mass: Vec::with_capacity(rows.len()),
            log_mass_transfer_rate: Vec::with_capacity(rows.len()),
            orbital_period: Vec::with_capacity(rows.len()),
            log_effective_temperature: Vec::with_capacity(rows.len()),
            time: Vec::with_capacity(rows.len()),
        };

        for (idx, row) in rows.iter().enumerate() {
            let line = idx + 1;
            if row.iter().any(|v| !v.is_finite()) {
                return Err(RecordError::NonFinite { line });
            }
            if record.time.last().is_some_and(|&prev| row[5] < prev) {
                return Err(RecordError::TimeDecreasing { line });
            }
            record.donor_mass.push(row[0]);
            record.accretor_mass.push(row[1]);
            record.log_mass_transfer_rate.push(row[2]);
            record.orbital_period.push(row[3]);
            record.log_effective_temperature.push(row[4]);
            record.time.push(row[5]);
        }

        Ok(record)
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn column(&self, property: Property) -> &[f64] {
        match property {
            Property::DonorMass => &self.donor_mass,
            Property::AccretorMass => &self.accretor_mass,
            Property::LogMassTransferRate => &self.log_mass_transfer_rate,
            Property::OrbitalPeriod => &self.orbital_period,
            Property::LogEffectiveTemperature => &self.log_effective_temperature,
        }
    }

    /// Total track duration.
    pub fn lifetime(&self) -> f64 {
        match (self.time.first(), self.time.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

/// Parse the text form of a record.
///
/// Blank lines and lines starting with `#` are ignored; line numbers in errors
/// refer to the file.
pub fn parse_record(text: &str) -> Result<SimulationRecord, RecordError> {
    let mut rows = Vec::new();
    let mut lines = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut row = [0.0; RECORD_COLUMNS];
        let mut found = 0usize;
        for token in trimmed.split_whitespace() {
            if found < RECORD_COLUMNS {
                row[found] = token.parse::<f64>().map_err(|_| RecordError::Parse {
                    line,
                    token: token.to_string(),
                })?;
            }
            found += 1;
        }
        if found != RECORD_COLUMNS {
            return Err(RecordError::ColumnCount { line, found });
        }
        rows.push(row);
        lines.push(line);
    }

    // Map row positions back to file lines for validation errors.
    SimulationRecord::from_rows(&rows).map_err(|e| match e {
        RecordError::NonFinite { line } => RecordError::NonFinite { line: lines[line - 1] },
        RecordError::TimeDecreasing { line } => RecordError::TimeDecreasing { line: lines[line - 1] },
        other => other,
    })
}

/// Storage file name for a grid coordinate.
pub fn record_file_name(donor_mass: f64, orbital_period: f64) -> String {
    format!("m_{donor_mass:4.2}_p_{orbital_period:4.2}.data")
}

/// Where simulation records come from.
pub trait RecordSource: Sync {
    /// Human-readable location used to tag log lines and diagnostics.
    fn locate(&self, candidate: &Candidate) -> String;

    /// Load the record for `candidate`; `Ok(None)` when it was never simulated.
    fn load(&self, candidate: &Candidate) -> Result<Option<SimulationRecord>, RecordError>;
}

/// Records laid out as `<root>/<group>/<partition>/m_<m>_p_<p>.data`.
#[derive(Debug, Clone)]
pub struct FsRecordStore {
    root: PathBuf,
}

impl FsRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record_path(&self, candidate: &Candidate) -> PathBuf {
        self.root
            .join(&candidate.group_dir)
            .join(candidate.partition)
            .join(record_file_name(candidate.donor_mass, candidate.orbital_period))
    }
}

impl RecordSource for FsRecordStore {
    fn locate(&self, candidate: &Candidate) -> String {
        self.record_path(candidate).display().to_string()
    }

    fn load(&self, candidate: &Candidate) -> Result<Option<SimulationRecord>, RecordError> {
        let path = self.record_path(candidate);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(RecordError::Io { path, source }),
        };
        parse_record(&text).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CandidateKey;

    fn candidate(m: f64, p: f64) -> Candidate {
        Candidate {
            key: CandidateKey { group: 0, partition: 0, donor_mass: 0, orbital_period: 0 },
            group_dir: "ns_data".to_string(),
            partition: "smsp",
            donor_mass: m,
            orbital_period: p,
        }
    }

    #[test]
    fn file_names_use_two_decimals() {
        assert_eq!(record_file_name(1.0, -0.6), "m_1.00_p_-0.60.data");
        assert_eq!(record_file_name(4.05, 0.0), "m_4.05_p_0.00.data");
    }

    #[test]
    fn parse_skips_comments_and_checks_columns() {
        let text = "# m1 m2 mt p teff t\n\n2.0 1.4 -9.0 1.2 3.7 0.0\n1.9 1.5 -8.5 1.3 3.7 10.0\n";
        let record = parse_record(text).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.donor_mass, vec![2.0, 1.9]);
        assert!((record.lifetime() - 10.0).abs() < 1e-12);

        let err = parse_record("2.0 1.4 -9.0 1.2 3.7\n").unwrap_err();
        assert!(matches!(err, RecordError::ColumnCount { line: 1, found: 5 }));

        let err = parse_record("2.0 1.4 x 1.2 3.7 0.0\n").unwrap_err();
        assert!(matches!(err, RecordError::Parse { line: 1, .. }));
    }

    #[test]
    fn parse_rejects_decreasing_time_and_empty_records() {
        let text = "# header\n2.0 1.4 -9.0 1.2 3.7 5.0\n1.9 1.5 -8.5 1.3 3.7 4.0\n";
        assert!(matches!(
            parse_record(text).unwrap_err(),
            RecordError::TimeDecreasing { line: 3 }
        ));
        assert!(matches!(parse_record("# nothing\n").unwrap_err(), RecordError::Empty));
        assert!(matches!(
            parse_record("2.0 1.4 NaN 1.2 3.7 0.0\n").unwrap_err(),
            RecordError::NonFinite { line: 1 }
        ));
    }

    #[test]
    fn fs_store_treats_missing_files_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsRecordStore::new(dir.path());
        let c = candidate(1.0, 0.5);
        assert!(store.load(&c).unwrap().is_none());

        let path = store.record_path(&c);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "1.0 1.4 -9.0 3.2 3.7 0.0\n").unwrap();
        let record = store.load(&c).unwrap().unwrap();
        assert_eq!(record.len(), 1);
        assert!(store.locate(&c).ends_with("ns_data/smsp/m_1.00_p_0.50.data"));
    }
}
