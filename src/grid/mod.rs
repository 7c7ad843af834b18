//! The fixed lattice of simulated initial conditions.
//!
//! Responsibilities:
//!
//! - describe the statically configured partitions and their coordinate axes
//! - decide which partition groups a query can touch
//! - enumerate candidate grid coordinates in a deterministic order

pub mod catalog;

pub use catalog::*;
