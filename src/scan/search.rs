//! Donor-mass window search.
//!
//! Donor mass only decreases along a track, so the steps whose donor mass lies
//! in the query interval form one contiguous block. Two binary searches over
//! the descending column find its ends without touching the other steps.

use crate::domain::Interval;

/// Binary search over a non-increasing `column`.
///
/// Returns `0` when `target >= column[0]`, the last index when
/// `target <= column[last]`, and otherwise an index `i` with
/// `column[i] >= target >= column[i + 1]`. An empty column yields `0`.
pub fn descending_search(column: &[f64], target: f64) -> usize {
    let Some(last) = column.len().checked_sub(1) else {
        return 0;
    };
    if target >= column[0] {
        return 0;
    }
    if target <= column[last] {
        return last;
    }

    let mut start = 0usize;
    let mut end = last;
    while start <= end {
        let mid = (start + end) / 2;
        if column[mid] == target {
            return mid;
        }
        if target > column[mid] {
            // mid > 0 here since column[0] > target.
            end = mid - 1;
        } else {
            start = mid + 1;
        }
    }

    // `start` is the first step below the target; the boundary is one before it.
    start.saturating_sub(1).min(last)
}

/// Inclusive step range whose donor mass can lie in `interval`.
///
/// `None` means the record's donor-mass range never meets the interval.
pub fn mass_window(column: &[f64], interval: Option<Interval>) -> Option<(usize, usize)> {
    let last = column.len().checked_sub(1)?;
    let Some(iv) = interval else {
        return Some((0, last));
    };
    if column[0] < iv.low {
        return None;
    }

    let start = if column[0] <= iv.high {
        0
    } else {
        let mut i = descending_search(column, iv.high);
        if column[i] > iv.high {
            i += 1;
        }
        while i > 0 && column[i - 1] <= iv.high {
            i -= 1;
        }
        i
    };

    let end = if column[last] >= iv.low {
        last
    } else {
        let mut i = descending_search(column, iv.low);
        while i < last && column[i + 1] >= iv.low {
            i += 1;
        }
        i
    };

    (start <= end).then_some((start, end))
}
