//! Report computations over a loaded model.
//!
//! Responsibilities:
//!
//! - channel contributions and portfolio totals (`contributions`)
//! - Hill response curves with marginal response (`curves`)
//! - period-bucketed contribution series (`timeseries`)

pub mod contributions;
pub mod curves;
pub mod timeseries;

pub use contributions::*;
pub use curves::*;
pub use timeseries::*;
