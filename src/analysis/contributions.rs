//! Channel and portfolio contribution metrics.
//!
//! ROI, spend and effectiveness are combined index-by-index in model channel
//! order. Everything here is computed at full precision; rounding is applied
//! once by [`ContributionAnalysis::to_report`].

use ndarray::Axis;

use crate::domain::{ChannelMetric, ContributionsReport, ParameterNames, PortfolioSummary, Precision};
use crate::error::AppError;
use crate::math::safe_divide;
use crate::model::FittedModel;
use crate::posterior::PosteriorSummarizer;

/// Unrounded contribution metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionAnalysis {
    pub channels: Vec<ChannelMetric>,
    pub summary: PortfolioSummary,
}

impl ContributionAnalysis {
    pub fn to_report(&self, precision: Precision) -> ContributionsReport {
        ContributionsReport {
            data: self.channels.iter().map(|m| m.rounded(precision)).collect(),
            summary: self.summary.rounded(precision),
        }
    }
}

/// Total observed spend per channel (summed over geo and time).
pub fn spend_per_channel(model: &FittedModel) -> Vec<f64> {
    model
        .spend()
        .sum_axis(Axis(0))
        .sum_axis(Axis(0))
        .to_vec()
}

/// Compute channel and portfolio metrics from the model's posterior.
pub fn aggregate_contributions(
    model: &FittedModel,
    names: &ParameterNames,
) -> Result<ContributionAnalysis, AppError> {
    let summarizer = PosteriorSummarizer::new(model);
    let roi = summarizer.channel_estimates(&names.roi)?;
    let effectiveness = summarizer.channel_estimates(&names.effectiveness)?;
    let spend = spend_per_channel(model);

    let inputs = ChannelInputs {
        channels: model.channels(),
        spend: &spend,
        roi: &roi,
        effectiveness: &effectiveness,
    };
    combine_channel_metrics(
        &inputs,
        model.kpi().sum(),
        model.num_geos(),
        model.num_times(),
    )
}

/// Per-channel point estimates, all indexed by the same channel order.
#[derive(Debug, Clone, Copy)]
pub struct ChannelInputs<'a> {
    pub channels: &'a [String],
    pub spend: &'a [f64],
    pub roi: &'a [f64],
    pub effectiveness: &'a [f64],
}

/// Combine per-channel point estimates into metrics plus portfolio totals.
pub fn combine_channel_metrics(
    inputs: &ChannelInputs<'_>,
    total_kpi: f64,
    num_geos: usize,
    num_time_periods: usize,
) -> Result<ContributionAnalysis, AppError> {
    let n = inputs.channels.len();
    if inputs.spend.len() != n || inputs.roi.len() != n || inputs.effectiveness.len() != n {
        return Err(AppError::compute(format!(
            "channel arrays disagree: {n} channels, {} spend, {} roi, {} effectiveness",
            inputs.spend.len(),
            inputs.roi.len(),
            inputs.effectiveness.len()
        )));
    }

    let channels: Vec<ChannelMetric> = (0..n)
        .map(|i| ChannelMetric {
            name: inputs.channels[i].clone(),
            roi: inputs.roi[i],
            spend: inputs.spend[i],
            revenue: inputs.roi[i] * inputs.spend[i],
            effectiveness: inputs.effectiveness[i],
        })
        .collect();

    let total_spend: f64 = channels.iter().map(|m| m.spend).sum();
    let total_revenue: f64 = channels.iter().map(|m| m.revenue).sum();

    if !(total_spend.is_finite() && total_revenue.is_finite()) {
        return Err(AppError::compute("non-finite spend or revenue total"));
    }

    let summary = PortfolioSummary {
        total_spend,
        total_revenue,
        overall_roi: safe_divide(total_revenue, total_spend, 0.0),
        total_kpi,
        num_channels: n,
        num_geos,
        num_time_periods,
    };

    Ok(ContributionAnalysis { channels, summary })
}
