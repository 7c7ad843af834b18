//! Query file parsing.
//!
//! Format:
//!
//! ```text
//! 1                 <- accretor flag (0 = neutron star, otherwise black hole)
//! 1.0,1.5           <- donor mass
//! 12.0,15.0         <- accretor mass
//! -10.0,-8.0        <- log10 mass-transfer rate
//! 0.2,0.6           <- orbital period
//! 3.5,3.8           <- log10 effective temperature
//! ```
//!
//! Any deviation (missing file, wrong row or field count, non-numeric field)
//! is reported as `QueryError::Malformed`. Range checks happen later in
//! `RangeQuery::validate`.

use std::fs;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{AccretorClass, Interval, Property, QueryError, RangeQuery};

/// Read and parse a query file.
pub fn read_query(path: &Path) -> Result<RangeQuery, QueryError> {
    let text = fs::read_to_string(path).map_err(|e| {
        QueryError::Malformed(format!("Failed to open query '{}': {e}", path.display()))
    })?;
    parse_query(&text)
}

/// Parse the text form of a query.
pub fn parse_query(text: &str) -> Result<RangeQuery, QueryError> {
    let (first, rest) = text.split_once('\n').unwrap_or((text, ""));

    let flag_token = first
        .split_whitespace()
        .next()
        .ok_or_else(|| QueryError::Malformed("Missing accretor flag on line 1".to_string()))?;
    let flag = flag_token.parse::<i64>().map_err(|_| {
        QueryError::Malformed(format!("Invalid accretor flag '{flag_token}' on line 1"))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rest.as_bytes());

    let mut intervals = Vec::with_capacity(Property::ALL.len());
    for (idx, result) in reader.records().enumerate() {
        // +2: csv rows start after the flag line, and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| QueryError::Malformed(format!("line {line}: {e}")))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        intervals.push(parse_interval(&record, line)?);
    }

    if intervals.len() != Property::ALL.len() {
        return Err(QueryError::Malformed(format!(
            "Expected {} range rows, found {}",
            Property::ALL.len(),
            intervals.len()
        )));
    }

    let query = Property::ALL
        .into_iter()
        .zip(intervals)
        .fold(RangeQuery::unconstrained(AccretorClass::from_flag(flag)), |q, (p, iv)| {
            q.with(p, iv)
        });
    Ok(query)
}

fn parse_interval(record: &StringRecord, line: usize) -> Result<Interval, QueryError> {
    if record.len() != 2 {
        return Err(QueryError::Malformed(format!(
            "line {line}: expected 2 values (low,high), found {}",
            record.len()
        )));
    }
    let low = parse_f64(&record[0], line)?;
    let high = parse_f64(&record[1], line)?;
    Ok(Interval::new(low, high))
}

fn parse_f64(s: &str, line: usize) -> Result<f64, QueryError> {
    s.parse::<f64>()
        .map_err(|_| QueryError::Malformed(format!("line {line}: invalid number '{s}'")))
}
