//! Input/output helpers.
//!
//! - query file parsing (`query`)
//! - simulation record loading (`record`)
//! - result file + JSON export (`export`)

pub mod export;
pub mod query;
pub mod record;

pub use export::*;
pub use query::*;
pub use record::*;
