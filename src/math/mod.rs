//! Numeric utilities: the zero-denominator policy, spend grids and the Hill
//! saturation function.

pub mod grid;
pub mod hill;
pub mod ratio;

pub use grid::*;
pub use hill::*;
pub use ratio::*;
