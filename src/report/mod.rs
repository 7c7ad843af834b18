//! Reporting utilities: result file text and terminal summary.

pub mod format;

pub use format::*;
