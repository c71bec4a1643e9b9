//! Shared domain types.
//!
//! Report records are plain serializable structs so they can be:
//!
//! - returned in-memory to a serving host
//! - printed as terminal tables by the `mmm` binary
//! - exported to JSON/CSV

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::math::round_to;

/// Axis names used by artifact tensors.
pub const CHAIN_DIM: &str = "chain";
pub const DRAW_DIM: &str = "draw";
pub const GEO_DIM: &str = "geo";
pub const TIME_DIM: &str = "time";
pub const CHANNEL_DIM: &str = "channel";

/// Axes averaged away to turn posterior samples into point estimates.
pub const SAMPLING_DIMS: [&str; 2] = [CHAIN_DIM, DRAW_DIM];

/// Number of points on every response curve (both endpoints included).
pub const CURVE_POINTS: usize = 50;

/// Number of consecutive time steps folded into one reporting period.
pub const PERIOD_WIDTH: usize = 4;

/// Names of the posterior parameters the reports read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterNames {
    pub roi: String,
    /// Parameter reported as channel "effectiveness".
    ///
    /// Defaults to the Hill half-saturation point (`ec_m`).
    pub effectiveness: String,
    pub ec: String,
    pub slope: String,
    pub contribution: String,
}

impl Default for ParameterNames {
    fn default() -> Self {
        Self {
            roi: "roi_m".to_string(),
            effectiveness: "ec_m".to_string(),
            ec: "ec_m".to_string(),
            slope: "slope_m".to_string(),
            contribution: "contribution_m".to_string(),
        }
    }
}

/// Decimal places applied when a report leaves the engine.
///
/// Only the reporting boundary rounds; all intermediate quantities stay at full
/// precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    /// Spend, revenue and KPI totals.
    pub money: u32,
    /// ROI, overall ROI and effectiveness.
    pub ratio: u32,
}

impl Default for Precision {
    fn default() -> Self {
        Self { money: 2, ratio: 4 }
    }
}

/// Per-channel business metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelMetric {
    pub name: String,
    pub roi: f64,
    pub spend: f64,
    /// `roi * spend`.
    pub revenue: f64,
    pub effectiveness: f64,
}

impl ChannelMetric {
    pub fn rounded(&self, precision: Precision) -> Self {
        Self {
            name: self.name.clone(),
            roi: round_to(self.roi, precision.ratio),
            spend: round_to(self.spend, precision.money),
            revenue: round_to(self.revenue, precision.money),
            effectiveness: round_to(self.effectiveness, precision.ratio),
        }
    }
}

/// Portfolio-level totals across all channels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_spend: f64,
    pub total_revenue: f64,
    /// `total_revenue / total_spend`, or `0` when nothing was spent.
    pub overall_roi: f64,
    pub total_kpi: f64,
    pub num_channels: usize,
    pub num_geos: usize,
    pub num_time_periods: usize,
}

impl PortfolioSummary {
    pub fn rounded(&self, precision: Precision) -> Self {
        Self {
            total_spend: round_to(self.total_spend, precision.money),
            total_revenue: round_to(self.total_revenue, precision.money),
            overall_roi: round_to(self.overall_roi, precision.ratio),
            total_kpi: round_to(self.total_kpi, precision.money),
            ..self.clone()
        }
    }
}

/// `getContributions` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionsReport {
    pub data: Vec<ChannelMetric>,
    pub summary: PortfolioSummary,
}

/// One sampled point of a channel's saturation curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub spend: f64,
    pub response: f64,
    pub marginal_response: f64,
}

/// A channel's full curve, in sweep order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelCurve {
    pub channel: String,
    pub points: Vec<CurvePoint>,
}

/// `getResponseCurves` payload.
///
/// Serializes `data` as a JSON object keyed by channel name, in model channel
/// order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseCurvesReport {
    #[serde(serialize_with = "serialize_curves")]
    pub data: Vec<ChannelCurve>,
}

impl ResponseCurvesReport {
    pub fn curve(&self, channel: &str) -> Option<&ChannelCurve> {
        self.data.iter().find(|c| c.channel == channel)
    }
}

/// A channel's value within a period.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelValue {
    pub channel: String,
    pub value: f64,
}

/// Contributions summed over one complete window of time steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodContribution {
    /// `YYYY-MM` of the window's first time step.
    pub period_label: String,
    #[serde(serialize_with = "serialize_channel_values")]
    pub contributions: Vec<ChannelValue>,
}

impl PeriodContribution {
    pub fn value(&self, channel: &str) -> Option<f64> {
        self.contributions
            .iter()
            .find(|c| c.channel == channel)
            .map(|c| c.value)
    }
}

/// `getTimeSeries` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesReport {
    pub data: Vec<PeriodContribution>,
}

fn serialize_curves<S: Serializer>(curves: &[ChannelCurve], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(curves.len()))?;
    for curve in curves {
        map.serialize_entry(&curve.channel, &curve.points)?;
    }
    map.end()
}

fn serialize_channel_values<S: Serializer>(
    values: &[ChannelValue],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(values.len()))?;
    for v in values {
        map.serialize_entry(&v.channel, &v.value)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_only_touches_numeric_fields() {
        let metric = ChannelMetric {
            name: "tv".to_string(),
            roi: 1.234_567,
            spend: 1000.005_1,
            revenue: 1234.567_891,
            effectiveness: 0.123_456,
        };
        let r = metric.rounded(Precision::default());
        assert_eq!(r.name, "tv");
        assert_eq!(r.roi, 1.2346);
        assert_eq!(r.spend, 1000.01);
        assert_eq!(r.revenue, 1234.57);
        assert_eq!(r.effectiveness, 0.1235);
    }

    #[test]
    fn curves_serialize_as_ordered_map() {
        let report = ResponseCurvesReport {
            data: vec![
                ChannelCurve {
                    channel: "tv".to_string(),
                    points: vec![CurvePoint {
                        spend: 0.0,
                        response: 0.0,
                        marginal_response: 0.0,
                    }],
                },
                ChannelCurve {
                    channel: "audio".to_string(),
                    points: vec![],
                },
            ],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"data":{"tv":[{"spend":0.0,"response":0.0,"marginal_response":0.0}],"audio":[]}}"#
        );
    }

    #[test]
    fn period_serializes_channel_map() {
        let period = PeriodContribution {
            period_label: "2024-01".to_string(),
            contributions: vec![ChannelValue {
                channel: "search".to_string(),
                value: 4.0,
            }],
        };
        let json = serde_json::to_value(&period).unwrap();
        assert_eq!(json["period_label"], "2024-01");
        assert_eq!(json["contributions"]["search"], 4.0);
        assert_eq!(period.value("search"), Some(4.0));
        assert_eq!(period.value("tv"), None);
    }
}
