//! Domain types used throughout the search.
//!
//! This module defines:
//!
//! - the query window and its validation (`RangeQuery`, `ValidatedQuery`)
//! - per-run outputs (`ProgenitorResult`) and resolved settings (`SearchConfig`)
//! - the cumulative diagnostic log (`Diagnostics`)

pub mod diagnostics;
pub mod query;
pub mod types;

pub use diagnostics::*;
pub use query::*;
pub use types::*;
