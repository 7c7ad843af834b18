//! Grid scan and match engine.
//!
//! Responsibilities:
//!
//! - narrow each record to its donor-mass window (`search`)
//! - find runs of steps inside the query window (`matcher`)
//! - locate the onset of sustained mass transfer (`onset`)
//! - evaluate candidates in parallel and assemble results (`aggregate`)

pub mod aggregate;
pub mod matcher;
pub mod onset;
pub mod search;

pub use aggregate::*;
pub use matcher::*;
pub use onset::*;
pub use search::*;
