//! Synthetic fitted-model artifacts.
//!
//! Produces a plausible artifact (spend, KPI and posterior samples) from a seed
//! so the reports can be exercised without an upstream model fit. Output is
//! deterministic for a given `SynthConfig`.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{LogNormal, Normal};

use crate::domain::{CHAIN_DIM, CHANNEL_DIM, DRAW_DIM, GEO_DIM, TIME_DIM};
use crate::error::AppError;
use crate::io::artifact::{ARTIFACT_FORMAT_VERSION, ArtifactFile, TensorRecord};

const CHANNEL_NAMES: [&str; 8] = ["tv", "search", "social", "display", "radio", "video", "print", "ooh"];

/// Probability that a channel is dark (zero spend) in a given geo/week.
const DARK_WEEK_PROB: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthConfig {
    pub seed: u64,
    pub channels: usize,
    pub geos: usize,
    pub times: usize,
    pub chains: usize,
    pub draws: usize,
    /// Date of the first weekly time step.
    pub start_date: NaiveDate,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            channels: 4,
            geos: 3,
            times: 52,
            chains: 2,
            draws: 100,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        }
    }
}

/// Ground-truth channel parameters the posterior is scattered around.
#[derive(Debug, Clone)]
struct ChannelTruth {
    roi: f64,
    level: f64,
    ec: f64,
    slope: f64,
}

pub fn channel_name(i: usize) -> String {
    CHANNEL_NAMES
        .get(i)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("channel_{i}"))
}

pub fn generate_artifact(config: &SynthConfig) -> Result<ArtifactFile, AppError> {
    for (label, value) in [
        ("channels", config.channels),
        ("geos", config.geos),
        ("times", config.times),
        ("chains", config.chains),
        ("draws", config.draws),
    ] {
        if value == 0 {
            return Err(AppError::Config(format!("synthetic {label} must be > 0")));
        }
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let dist = |e: rand_distr::NormalError| AppError::compute(format!("Noise distribution error: {e}"));
    let noise = Normal::new(0.0_f64, 1.0).map_err(dist)?;
    let roi_prior = LogNormal::new(0.0, 0.5).map_err(dist)?;
    let level_prior = LogNormal::new(1000f64.ln(), 0.6).map_err(dist)?;

    let truths: Vec<ChannelTruth> = (0..config.channels)
        .map(|_| {
            let level = level_prior.sample(&mut rng);
            ChannelTruth {
                roi: roi_prior.sample(&mut rng),
                level,
                ec: level * rng.gen_range(0.5..1.5),
                slope: rng.gen_range(0.8..3.0),
            }
        })
        .collect();
    let geo_scale: Vec<f64> = (0..config.geos).map(|_| rng.gen_range(0.5..2.0)).collect();

    // Spend (geo, time, channel): seasonal level with multiplicative noise and dark weeks.
    let mut spend = Vec::with_capacity(config.geos * config.times * config.channels);
    for &gs in &geo_scale {
        for t in 0..config.times {
            let season = 1.0 + 0.3 * (TAU * t as f64 / 52.0).sin();
            for truth in &truths {
                let value = if rng.gen_bool(DARK_WEEK_PROB) {
                    0.0
                } else {
                    truth.level * gs * season * (0.2 * noise.sample(&mut rng)).exp()
                };
                spend.push(value);
            }
        }
    }

    // KPI (geo, time): baseline plus true channel contributions.
    let mut kpi = Vec::with_capacity(config.geos * config.times);
    for (g, &gs) in geo_scale.iter().enumerate() {
        for t in 0..config.times {
            let base = 5000.0 * gs * (1.0 + 0.05 * noise.sample(&mut rng));
            let media: f64 = truths
                .iter()
                .enumerate()
                .map(|(c, truth)| truth.roi * spend[spend_index(config, g, t, c)])
                .sum();
            kpi.push(base + media);
        }
    }

    // Posterior samples.
    let n_samples = config.chains * config.draws;
    let mut roi_m = Vec::with_capacity(n_samples * config.channels);
    let mut ec_m = Vec::with_capacity(n_samples * config.channels);
    let mut slope_m = Vec::with_capacity(n_samples * config.channels);
    let mut contribution_m = Vec::with_capacity(n_samples * spend.len());
    for _ in 0..n_samples {
        let roi_draw: Vec<f64> = truths
            .iter()
            .map(|t| t.roi * (0.1 * noise.sample(&mut rng)).exp())
            .collect();
        roi_m.extend_from_slice(&roi_draw);
        for truth in &truths {
            ec_m.push(truth.ec * (0.1 * noise.sample(&mut rng)).exp());
            slope_m.push(truth.slope * (0.05 * noise.sample(&mut rng)).exp());
        }
        for g in 0..config.geos {
            for t in 0..config.times {
                for (c, roi) in roi_draw.iter().enumerate() {
                    contribution_m.push(roi * spend[spend_index(config, g, t, c)]);
                }
            }
        }
    }

    let sample_shape = [config.chains, config.draws];
    let per_channel = |values: Vec<f64>| TensorRecord {
        dims: dims(&[CHAIN_DIM, DRAW_DIM, CHANNEL_DIM]),
        shape: vec![sample_shape[0], sample_shape[1], config.channels],
        values,
    };

    let mut posterior = BTreeMap::new();
    posterior.insert("roi_m".to_string(), per_channel(roi_m));
    posterior.insert("ec_m".to_string(), per_channel(ec_m));
    posterior.insert("slope_m".to_string(), per_channel(slope_m));
    posterior.insert(
        "contribution_m".to_string(),
        TensorRecord {
            dims: dims(&[CHAIN_DIM, DRAW_DIM, GEO_DIM, TIME_DIM, CHANNEL_DIM]),
            shape: vec![
                sample_shape[0],
                sample_shape[1],
                config.geos,
                config.times,
                config.channels,
            ],
            values: contribution_m,
        },
    );

    let time_coords = (0..config.times)
        .map(|t| config.start_date + Duration::weeks(t as i64))
        .collect();

    tracing::debug!(
        seed = config.seed,
        channels = config.channels,
        geos = config.geos,
        times = config.times,
        samples = n_samples,
        "generated synthetic artifact"
    );

    Ok(ArtifactFile {
        format_version: ARTIFACT_FORMAT_VERSION,
        channels: (0..config.channels).map(channel_name).collect(),
        n_geos: config.geos,
        n_times: config.times,
        time_coords,
        spend: TensorRecord {
            dims: dims(&[GEO_DIM, TIME_DIM, CHANNEL_DIM]),
            shape: vec![config.geos, config.times, config.channels],
            values: spend,
        },
        kpi: TensorRecord {
            dims: dims(&[GEO_DIM, TIME_DIM]),
            shape: vec![config.geos, config.times],
            values: kpi,
        },
        posterior,
    })
}

fn spend_index(config: &SynthConfig, g: usize, t: usize, c: usize) -> usize {
    (g * config.times + t) * config.channels + c
}

fn dims(names: &[&str]) -> Vec<String> {
    names.iter().map(|d| d.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{aggregate_contributions, response_curves, time_series};
    use crate::domain::ParameterNames;
    use crate::model::FittedModel;

    fn small() -> SynthConfig {
        SynthConfig {
            seed: 7,
            channels: 3,
            geos: 2,
            times: 18,
            chains: 2,
            draws: 20,
            ..SynthConfig::default()
        }
    }

    #[test]
    fn same_seed_same_artifact() {
        let a = generate_artifact(&small()).unwrap();
        let b = generate_artifact(&small()).unwrap();
        assert_eq!(a, b);

        let c = generate_artifact(&SynthConfig { seed: 8, ..small() }).unwrap();
        assert_ne!(a.spend.values, c.spend.values);
    }

    #[test]
    fn artifact_passes_validation_and_feeds_reports() {
        let model = FittedModel::try_from(generate_artifact(&small()).unwrap()).unwrap();
        assert_eq!(model.channels(), ["tv".to_string(), "search".to_string(), "social".to_string()]);

        let names = ParameterNames::default();
        let contributions = aggregate_contributions(&model, &names).unwrap();
        for m in &contributions.channels {
            assert!(m.spend >= 0.0);
            assert!(m.roi > 0.0);
            assert!((m.revenue - m.roi * m.spend).abs() < 1e-6 * m.spend.max(1.0));
        }
        assert!(contributions.summary.total_kpi > 0.0);

        let curves = response_curves(&model, &names).unwrap();
        assert_eq!(curves.data.len(), 3);

        // 18 weekly steps -> 4 complete periods, 2 steps dropped.
        assert_eq!(time_series(&model, &names).unwrap().data.len(), 4);
    }

    #[test]
    fn extra_channels_get_generic_names() {
        assert_eq!(channel_name(0), "tv");
        assert_eq!(channel_name(8), "channel_8");
    }

    #[test]
    fn zero_sizes_rejected() {
        let err = generate_artifact(&SynthConfig { draws: 0, ..small() }).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
