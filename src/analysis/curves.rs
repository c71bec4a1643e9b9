//! Hill response curves per channel.
//!
//! For each channel we sweep spend over `[0, max observed spend]` in
//! `CURVE_POINTS` evenly spaced steps, evaluate the Hill response with the
//! posterior-mean `ec`/`slope`, and take a backward difference for the
//! marginal response.
//!
//! Channels are independent, so they are evaluated in parallel.

use ndarray::Axis;
use rayon::prelude::*;

use crate::domain::{CURVE_POINTS, ChannelCurve, CurvePoint, ParameterNames, ResponseCurvesReport};
use crate::error::AppError;
use crate::math::{grid_step, hill_response, lin_space, safe_divide};
use crate::model::FittedModel;
use crate::posterior::PosteriorSummarizer;

/// Largest single observed spend cell per channel (over geo and time).
///
/// Spend is non-negative once loaded, so a channel that never spends gets `0`.
pub fn max_spend_per_channel(model: &FittedModel) -> Vec<f64> {
    model
        .spend()
        .axis_iter(Axis(2))
        .map(|cells| cells.fold(0.0_f64, |acc, &v| acc.max(v)))
        .collect()
}

/// Sample a single Hill curve over `[0, max_spend]`.
pub fn response_curve(ec: f64, slope: f64, max_spend: f64) -> Result<Vec<CurvePoint>, AppError> {
    let spends = lin_space(0.0, max_spend, CURVE_POINTS)?;
    let step = grid_step(0.0, max_spend, CURVE_POINTS);

    let mut points = Vec::with_capacity(spends.len());
    let mut prev_response = 0.0;
    for (i, &spend) in spends.iter().enumerate() {
        let response = hill_response(spend, ec, slope);
        let marginal_response = if i == 0 {
            0.0
        } else {
            safe_divide(response - prev_response, step, 0.0)
        };
        points.push(CurvePoint {
            spend,
            response,
            marginal_response,
        });
        prev_response = response;
    }
    Ok(points)
}

/// Compute response curves for every channel, keyed by channel name.
pub fn response_curves(model: &FittedModel, names: &ParameterNames) -> Result<ResponseCurvesReport, AppError> {
    let summarizer = PosteriorSummarizer::new(model);
    let ec = summarizer.channel_estimates(&names.ec)?;
    let slope = summarizer.channel_estimates(&names.slope)?;
    let max_spend = max_spend_per_channel(model);

    let data = model
        .channels()
        .par_iter()
        .enumerate()
        .map(|(i, channel)| -> Result<ChannelCurve, AppError> {
            let points = response_curve(ec[i], slope[i], max_spend[i])
                .map_err(|e| AppError::compute(format!("channel '{channel}': {e}")))?;
            Ok(ChannelCurve {
                channel: channel.clone(),
                points,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(ResponseCurvesReport { data })
}
