//! The validated, immutable fitted model.
//!
//! Converting an `ArtifactFile` into a `FittedModel` is the only place the
//! artifact schema is checked. Downstream code indexes tensors by axis name
//! and assumes the sizes agree with the declared geo/time/channel counts.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use ndarray::{Array2, Array3, ArrayD, Axis, Ix2, Ix3, IxDyn};

use crate::domain::{CHAIN_DIM, CHANNEL_DIM, DRAW_DIM, GEO_DIM, TIME_DIM};
use crate::error::AppError;
use crate::io::artifact::{ARTIFACT_FORMAT_VERSION, ArtifactFile, TensorRecord};

/// An n-dimensional array whose axes carry names.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTensor {
    dims: Vec<String>,
    data: ArrayD<f64>,
}

impl NamedTensor {
    pub fn new(dims: Vec<String>, data: ArrayD<f64>) -> Result<Self, AppError> {
        if dims.len() != data.ndim() {
            return Err(AppError::compute(format!(
                "tensor has {} axes but {} axis names",
                data.ndim(),
                dims.len()
            )));
        }
        Ok(Self { dims, data })
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn into_parts(self) -> (Vec<String>, ArrayD<f64>) {
        (self.dims, self.data)
    }

    /// Position of the axis called `name`.
    pub fn axis_of(&self, name: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == name)
    }

    pub fn len_of(&self, name: &str) -> Option<usize> {
        self.axis_of(name).map(|ax| self.data.len_of(Axis(ax)))
    }

    fn from_record(label: &str, record: TensorRecord) -> Result<Self, AppError> {
        if record.dims.len() != record.shape.len() {
            return Err(AppError::load(format!(
                "tensor '{label}': {} dims but shape has {} entries",
                record.dims.len(),
                record.shape.len()
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = record.dims.iter().find(|d| !seen.insert(d.as_str())) {
            return Err(AppError::load(format!("tensor '{label}': duplicate axis '{dup}'")));
        }
        if let Some(bad) = record.values.iter().find(|v| !v.is_finite()) {
            return Err(AppError::load(format!("tensor '{label}': non-finite value {bad}")));
        }
        let data = ArrayD::from_shape_vec(IxDyn(&record.shape), record.values)
            .map_err(|e| AppError::load(format!("tensor '{label}': values do not match shape: {e}")))?;
        Ok(Self {
            dims: record.dims,
            data,
        })
    }

    fn expect_dims(&self, label: &str, expected: &[&str]) -> Result<(), AppError> {
        if self.dims.iter().map(String::as_str).ne(expected.iter().copied()) {
            return Err(AppError::load(format!(
                "tensor '{label}': expected dims {expected:?}, found {:?}",
                self.dims
            )));
        }
        Ok(())
    }
}

/// A fitted marketing-mix model, validated and read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    channels: Vec<String>,
    n_geos: usize,
    n_times: usize,
    time_coords: Vec<NaiveDate>,
    spend: Array3<f64>,
    kpi: Array2<f64>,
    posterior: BTreeMap<String, NamedTensor>,
}

impl FittedModel {
    /// Channel names; every per-channel array in the engine follows this order.
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_geos(&self) -> usize {
        self.n_geos
    }

    pub fn num_times(&self) -> usize {
        self.n_times
    }

    pub fn time_coords(&self) -> &[NaiveDate] {
        &self.time_coords
    }

    /// Observed spend, axes `(geo, time, channel)`.
    pub fn spend(&self) -> &Array3<f64> {
        &self.spend
    }

    /// Observed KPI, axes `(geo, time)`.
    pub fn kpi(&self) -> &Array2<f64> {
        &self.kpi
    }

    pub fn parameter(&self, name: &str) -> Result<&NamedTensor, AppError> {
        self.posterior
            .get(name)
            .ok_or_else(|| AppError::ParameterNotFound(name.to_string()))
    }
}

impl TryFrom<ArtifactFile> for FittedModel {
    type Error = AppError;

    fn try_from(file: ArtifactFile) -> Result<Self, Self::Error> {
        if file.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(AppError::load(format!(
                "unsupported artifact format version {} (expected {ARTIFACT_FORMAT_VERSION})",
                file.format_version
            )));
        }
        if file.channels.is_empty() {
            return Err(AppError::load("artifact declares no channels"));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = file.channels.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(AppError::load(format!("duplicate channel name '{dup}'")));
        }
        if file.time_coords.len() != file.n_times {
            return Err(AppError::load(format!(
                "{} time coordinates for {} time periods",
                file.time_coords.len(),
                file.n_times
            )));
        }

        let n_channels = file.channels.len();
        let sizes = [
            (GEO_DIM, file.n_geos),
            (TIME_DIM, file.n_times),
            (CHANNEL_DIM, n_channels),
        ];

        let spend = NamedTensor::from_record("spend", file.spend)?;
        spend.expect_dims("spend", &[GEO_DIM, TIME_DIM, CHANNEL_DIM])?;
        check_axis_sizes("spend", &spend, &sizes)?;
        if let Some(bad) = spend.data.iter().find(|&&v| v < 0.0) {
            return Err(AppError::load(format!("tensor 'spend': negative spend {bad}")));
        }
        let spend = spend
            .data
            .into_dimensionality::<Ix3>()
            .map_err(|e| AppError::load(format!("tensor 'spend': {e}")))?;

        let kpi = NamedTensor::from_record("kpi", file.kpi)?;
        kpi.expect_dims("kpi", &[GEO_DIM, TIME_DIM])?;
        check_axis_sizes("kpi", &kpi, &sizes)?;
        let kpi = kpi
            .data
            .into_dimensionality::<Ix2>()
            .map_err(|e| AppError::load(format!("tensor 'kpi': {e}")))?;

        let mut posterior = BTreeMap::new();
        for (name, record) in file.posterior {
            let tensor = NamedTensor::from_record(&name, record)?;
            if tensor.dims.len() < 2 || tensor.dims[0] != CHAIN_DIM || tensor.dims[1] != DRAW_DIM {
                return Err(AppError::load(format!(
                    "posterior '{name}': must start with ({CHAIN_DIM}, {DRAW_DIM}) axes, found {:?}",
                    tensor.dims
                )));
            }
            if tensor.data.len_of(Axis(0)) == 0 || tensor.data.len_of(Axis(1)) == 0 {
                return Err(AppError::load(format!("posterior '{name}': no samples")));
            }
            check_axis_sizes(&name, &tensor, &sizes)?;
            posterior.insert(name, tensor);
        }

        Ok(Self {
            channels: file.channels,
            n_geos: file.n_geos,
            n_times: file.n_times,
            time_coords: file.time_coords,
            spend,
            kpi,
            posterior,
        })
    }
}

fn check_axis_sizes(label: &str, tensor: &NamedTensor, sizes: &[(&str, usize)]) -> Result<(), AppError> {
    for &(dim, expected) in sizes {
        if let Some(actual) = tensor.len_of(dim) {
            if actual != expected {
                return Err(AppError::load(format!(
                    "tensor '{label}': axis '{dim}' has length {actual}, expected {expected}"
                )));
            }
        }
    }
    Ok(())
}
