//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - tensor axis names and fixed report shapes (`CURVE_POINTS`, `PERIOD_WIDTH`)
//! - posterior parameter naming (`ParameterNames`)
//! - report records (`ChannelMetric`, `PortfolioSummary`, `CurvePoint`, `PeriodContribution`)

pub mod types;

pub use types::*;
