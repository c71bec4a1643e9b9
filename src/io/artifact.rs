//! Read/write fitted-model artifact files.
//!
//! The artifact is the portable output of an upstream model fit:
//! - channel names, geo/time counts and time coordinates
//! - observed spend and KPI tensors
//! - posterior sample tensors keyed by parameter name
//!
//! Tensors are stored as `{dims, shape, values}` with row-major values. The
//! schema is checked once when converting into a `FittedModel`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use chrono::NaiveDate;
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::model::FittedModel;

/// Schema version written by this crate and accepted on load.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// On-disk fitted-model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactFile {
    pub format_version: u32,
    pub channels: Vec<String>,
    pub n_geos: usize,
    pub n_times: usize,
    pub time_coords: Vec<NaiveDate>,
    /// Observed spend, dims `(geo, time, channel)`.
    pub spend: TensorRecord,
    /// Observed KPI, dims `(geo, time)`.
    pub kpi: TensorRecord,
    pub posterior: BTreeMap<String, TensorRecord>,
}

/// A named-axis tensor in flat row-major form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorRecord {
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
}

impl TensorRecord {
    pub fn from_array(dims: &[&str], array: &ArrayD<f64>) -> Self {
        Self {
            dims: dims.iter().map(|d| d.to_string()).collect(),
            shape: array.shape().to_vec(),
            values: array.iter().copied().collect(),
        }
    }
}

/// Read an artifact file without validating it.
///
/// A missing file maps to `ModelNotFound`; every other failure is a load error.
pub fn read_artifact(path: &Path) -> Result<ArtifactFile, AppError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::ModelNotFound {
            path: path.to_path_buf(),
        },
        _ => AppError::load(format!("Failed to open artifact '{}': {e}", path.display())),
    })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::load(format!("Invalid artifact '{}': {e}", path.display())))
}

/// Read and validate an artifact into a `FittedModel`.
pub fn load_fitted_model(path: &Path) -> Result<FittedModel, AppError> {
    FittedModel::try_from(read_artifact(path)?)
}

/// Write an artifact file (compact JSON).
pub fn write_artifact(path: &Path, artifact: &ArtifactFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::Io(format!("Failed to create artifact '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer(&mut out, artifact)
        .map_err(|e| AppError::Io(format!("Failed to write artifact: {e}")))?;
    out.flush()
        .map_err(|e| AppError::Io(format!("Failed to write artifact: {e}")))?;
    Ok(())
}
