//! `progen-search` library crate.
//!
//! The binary (`progen`) is a thin wrapper around this library so that:
//!
//! - the scan engine is testable without spawning processes
//! - record sources other than the filesystem can be plugged in
//! - file formats and presentation stay separate from the matching logic

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod grid;
pub mod io;
pub mod report;
pub mod scan;
