//! Formatted terminal output for the three reports.
//!
//! Formatting lives here so the analysis code only produces data, and output
//! changes stay local to one file.

use crate::domain::{ChannelCurve, ContributionsReport, ResponseCurvesReport, TimeSeriesReport};
use crate::error::AppError;

const NAME_WIDTH: usize = 16;

/// Channel table followed by the portfolio summary.
pub fn format_contributions(report: &ContributionsReport) -> String {
    let mut out = String::new();

    out.push_str("=== Channel contributions ===\n");
    push_row(
        &mut out,
        format!(
            "{:<16} {:>14} {:>14} {:>10} {:>14}",
            "channel", "spend", "revenue", "roi", "effectiveness"
        ),
    );
    push_row(
        &mut out,
        format!("{:-<16} {:-<14} {:-<14} {:-<10} {:-<14}", "", "", "", "", ""),
    );
    for m in &report.data {
        push_row(
            &mut out,
            format!(
                "{:<16} {:>14.2} {:>14.2} {:>10.4} {:>14.4}",
                truncate(&m.name, NAME_WIDTH),
                m.spend,
                m.revenue,
                m.roi,
                m.effectiveness
            ),
        );
    }

    let s = &report.summary;
    out.push_str("\nPortfolio:\n");
    out.push_str(&format!("- total spend  : {:.2}\n", s.total_spend));
    out.push_str(&format!("- total revenue: {:.2}\n", s.total_revenue));
    out.push_str(&format!("- overall ROI  : {:.4}\n", s.overall_roi));
    out.push_str(&format!("- total KPI    : {:.2}\n", s.total_kpi));
    out.push_str(&format!(
        "- dimensions   : channels={} geos={} time_periods={}\n",
        s.num_channels, s.num_geos, s.num_time_periods
    ));

    out
}

/// Sampled curve points, optionally for one channel and every `every`-th point.
///
/// The last point of each curve is always shown so the saturation end is visible.
pub fn format_curves(report: &ResponseCurvesReport, channel: Option<&str>, every: usize) -> Result<String, AppError> {
    if every == 0 {
        return Err(AppError::Config("--every must be >= 1".to_string()));
    }

    let curves: Vec<&ChannelCurve> = match channel {
        Some(name) => vec![
            report
                .curve(name)
                .ok_or_else(|| AppError::Config(format!("Unknown channel '{name}'")))?,
        ],
        None => report.data.iter().collect(),
    };

    let mut out = String::new();
    for curve in curves {
        out.push_str(&format!("=== Response curve: {} ===\n", curve.channel));
        push_row(&mut out, format!("{:>14} {:>12} {:>14}", "spend", "response", "marginal"));
        push_row(&mut out, format!("{:-<14} {:-<12} {:-<14}", "", "", ""));

        let last = curve.points.len().saturating_sub(1);
        for (i, p) in curve.points.iter().enumerate() {
            if i % every != 0 && i != last {
                continue;
            }
            push_row(
                &mut out,
                format!("{:>14.2} {:>12.6} {:>14.6e}", p.spend, p.response, p.marginal_response),
            );
        }
        out.push('\n');
    }

    Ok(out)
}

/// One row per period, one column per channel.
pub fn format_time_series(report: &TimeSeriesReport) -> String {
    let mut out = String::new();
    out.push_str("=== Contributions by period ===\n");

    let Some(first) = report.data.first() else {
        out.push_str("(no complete periods)\n");
        return out;
    };
    let channels: Vec<&str> = first.contributions.iter().map(|c| c.channel.as_str()).collect();

    let mut header = format!("{:<10}", "period");
    let mut rule = format!("{:-<10}", "");
    for name in &channels {
        header.push_str(&format!(" {:>14}", truncate(name, 14)));
        rule.push_str(&format!(" {:-<14}", ""));
    }
    push_row(&mut out, header);
    push_row(&mut out, rule);

    for period in &report.data {
        let mut row = format!("{:<10}", period.period_label);
        for value in &period.contributions {
            row.push_str(&format!(" {:>14.2}", value.value));
        }
        push_row(&mut out, row);
    }

    out
}

fn push_row(out: &mut String, row: String) {
    out.push_str(row.trim_end());
    out.push('\n');
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
