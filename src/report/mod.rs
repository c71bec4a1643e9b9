//! Terminal formatting for the reports.

pub mod format;

pub use format::*;
