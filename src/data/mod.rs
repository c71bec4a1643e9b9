//! Data sources other than a real upstream fit.

pub mod synthetic;

pub use synthetic::{SynthConfig, generate_artifact};
