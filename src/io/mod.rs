//! Input/output helpers.
//!
//! - fitted-model artifact read/write (`artifact`)
//! - report exports (CSV/JSON) (`export`)

pub mod artifact;
pub mod export;

pub use artifact::{ArtifactFile, TensorRecord, load_fitted_model, read_artifact, write_artifact};
pub use export::{write_contributions_csv, write_json, write_report_bundle};
