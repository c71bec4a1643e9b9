//! `mmm-insights` library crate.
//!
//! Read-only analysis over a fitted marketing-mix model: posterior summaries,
//! per-channel contributions, Hill response curves and contributions over time.
//!
//! The binary (`mmm`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the report engine can be embedded in a serving host
//! - code stays easy to navigate as the project grows

pub mod analysis;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod model;
pub mod posterior;
pub mod report;

#[cfg(test)]
pub(crate) mod testing;
