//! Period-bucketed contribution series.
//!
//! The posterior-mean contribution tensor is summed over geos to give a
//! `(time, channel)` matrix, then folded into consecutive windows of
//! `PERIOD_WIDTH` steps. Trailing steps that do not fill a window are dropped.

use chrono::NaiveDate;
use ndarray::{Array2, ArrayView2, Axis, Ix2, s};

use crate::domain::{
    CHANNEL_DIM, ChannelValue, GEO_DIM, PERIOD_WIDTH, ParameterNames, PeriodContribution, SAMPLING_DIMS,
    TIME_DIM, TimeSeriesReport,
};
use crate::error::AppError;
use crate::model::FittedModel;
use crate::posterior::PosteriorSummarizer;

/// Posterior-mean contribution per `(time, channel)`, summed over geos.
///
/// A contribution parameter without a geo axis (national model) is used as-is.
pub fn contribution_by_time(model: &FittedModel, names: &ParameterNames) -> Result<Array2<f64>, AppError> {
    let parameter = names.contribution.as_str();
    let summary = PosteriorSummarizer::new(model).summarize(parameter, &SAMPLING_DIMS)?;
    let (mut dims, mut data) = summary.into_parts();

    if let Some(geo) = dims.iter().position(|d| d == GEO_DIM) {
        data = data.sum_axis(Axis(geo));
        dims.remove(geo);
    }

    let time = dims.iter().position(|d| d == TIME_DIM);
    let channel = dims.iter().position(|d| d == CHANNEL_DIM);
    let (Some(time), Some(channel), 2) = (time, channel, dims.len()) else {
        return Err(AppError::compute(format!(
            "parameter '{parameter}': expected ({TIME_DIM}, {CHANNEL_DIM}) axes after reducing samples and geos, found {dims:?}"
        )));
    };

    let matrix = data
        .into_dimensionality::<Ix2>()
        .map_err(|e| AppError::compute(format!("parameter '{parameter}': {e}")))?;
    if time < channel {
        Ok(matrix)
    } else {
        Ok(matrix.reversed_axes())
    }
}

/// Fold a `(time, channel)` matrix into complete windows of `width` steps.
pub fn bucket_periods(
    matrix: ArrayView2<'_, f64>,
    time_coords: &[NaiveDate],
    channels: &[String],
    width: usize,
) -> Result<Vec<PeriodContribution>, AppError> {
    if width == 0 {
        return Err(AppError::compute("period width must be > 0"));
    }
    let (n_steps, n_channels) = matrix.dim();
    if n_channels != channels.len() {
        return Err(AppError::compute(format!(
            "contribution matrix has {n_channels} channels, model has {}",
            channels.len()
        )));
    }
    if time_coords.len() < n_steps {
        return Err(AppError::compute(format!(
            "{n_steps} time steps but only {} time coordinates",
            time_coords.len()
        )));
    }

    let n_periods = n_steps / width;
    let mut periods = Vec::with_capacity(n_periods);
    for p in 0..n_periods {
        let start = p * width;
        let window = matrix.slice(s![start..start + width, ..]);
        let sums = window.sum_axis(Axis(0));
        let contributions = channels
            .iter()
            .zip(sums.iter())
            .map(|(channel, &value)| ChannelValue {
                channel: channel.clone(),
                value,
            })
            .collect();
        periods.push(PeriodContribution {
            period_label: time_coords[start].format("%Y-%m").to_string(),
            contributions,
        });
    }
    Ok(periods)
}

/// Compute the bucketed time series for every channel.
pub fn time_series(model: &FittedModel, names: &ParameterNames) -> Result<TimeSeriesReport, AppError> {
    let matrix = contribution_by_time(model, names)?;
    let data = bucket_periods(matrix.view(), model.time_coords(), model.channels(), PERIOD_WIDTH)?;
    Ok(TimeSeriesReport { data })
}
