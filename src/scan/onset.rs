//! Onset of sustained mass transfer.

/// log10 mass-transfer rate at or above which a step counts as transferring.
pub const MASS_TRANSFER_THRESHOLD: f64 = -15.0;

/// Consecutive qualifying steps that make mass transfer "sustained".
pub const SUSTAINED_STEPS: usize = 4;

/// Records this short always report onset at step 0.
pub const MIN_ONSET_RECORD_LEN: usize = 5;

/// Index of the first step starting four consecutive steps with rate >= -15.
///
/// Falls back to `0` when the record has five or fewer steps or no such run
/// exists.
pub fn mass_transfer_onset(log_mdot: &[f64]) -> usize {
    if log_mdot.len() <= MIN_ONSET_RECORD_LEN {
        return 0;
    }
    log_mdot
        .windows(SUSTAINED_STEPS)
        .position(|w| w.iter().all(|&v| v >= MASS_TRANSFER_THRESHOLD))
        .unwrap_or(0)
}
