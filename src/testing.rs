//! Small artifact builders for unit tests.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::domain::{CHAIN_DIM, CHANNEL_DIM, DRAW_DIM, GEO_DIM, TIME_DIM};
use crate::io::artifact::{ARTIFACT_FORMAT_VERSION, ArtifactFile, TensorRecord};
use crate::model::FittedModel;

/// `n` weekly dates starting Monday 2024-01-01.
pub fn weekly_coords(n: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..n).map(|i| start + Duration::weeks(i as i64)).collect()
}

pub struct ArtifactBuilder {
    channels: Vec<String>,
    n_geos: usize,
    n_times: usize,
    spend: Vec<f64>,
    kpi: Vec<f64>,
    posterior: BTreeMap<String, TensorRecord>,
}

impl ArtifactBuilder {
    /// Zero spend and KPI, no posterior parameters.
    pub fn new(channels: &[&str], n_geos: usize, n_times: usize) -> Self {
        Self {
            channels: channels.iter().map(|c| c.to_string()).collect(),
            n_geos,
            n_times,
            spend: vec![0.0; n_geos * n_times * channels.len()],
            kpi: vec![0.0; n_geos * n_times],
            posterior: BTreeMap::new(),
        }
    }

    pub fn spend_fn(mut self, f: impl Fn(usize, usize, usize) -> f64) -> Self {
        let n_ch = self.channels.len();
        self.spend.clear();
        for g in 0..self.n_geos {
            for t in 0..self.n_times {
                for c in 0..n_ch {
                    self.spend.push(f(g, t, c));
                }
            }
        }
        self
    }

    pub fn kpi_fn(mut self, f: impl Fn(usize, usize) -> f64) -> Self {
        self.kpi.clear();
        for g in 0..self.n_geos {
            for t in 0..self.n_times {
                self.kpi.push(f(g, t));
            }
        }
        self
    }

    /// A `(chain=2, draw=3, channel)` parameter whose samples spread
    /// symmetrically around `means`.
    pub fn channel_param(self, name: &str, means: &[f64]) -> Self {
        let offsets = [-0.02, 0.0, 0.02, 0.01, 0.0, -0.01];
        let mut values = Vec::with_capacity(offsets.len() * means.len());
        for off in offsets {
            for &m in means {
                values.push(m + off);
            }
        }
        self.param(name, &[CHAIN_DIM, DRAW_DIM, CHANNEL_DIM], &[2, 3, means.len()], values)
    }

    pub fn param(mut self, name: &str, dims: &[&str], shape: &[usize], values: Vec<f64>) -> Self {
        self.posterior.insert(
            name.to_string(),
            TensorRecord {
                dims: dims.iter().map(|d| d.to_string()).collect(),
                shape: shape.to_vec(),
                values,
            },
        );
        self
    }

    pub fn build(self) -> ArtifactFile {
        let n_ch = self.channels.len();
        ArtifactFile {
            format_version: ARTIFACT_FORMAT_VERSION,
            time_coords: weekly_coords(self.n_times),
            spend: TensorRecord {
                dims: vec![GEO_DIM.to_string(), TIME_DIM.to_string(), CHANNEL_DIM.to_string()],
                shape: vec![self.n_geos, self.n_times, n_ch],
                values: self.spend,
            },
            kpi: TensorRecord {
                dims: vec![GEO_DIM.to_string(), TIME_DIM.to_string()],
                shape: vec![self.n_geos, self.n_times],
                values: self.kpi,
            },
            channels: self.channels,
            n_geos: self.n_geos,
            n_times: self.n_times,
            posterior: self.posterior,
        }
    }

    pub fn build_model(self) -> FittedModel {
        FittedModel::try_from(self.build()).unwrap()
    }
}
