//! Export reports to JSON and CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! dashboards.

use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::app::pipeline::ReportBundle;
use crate::domain::ContributionsReport;
use crate::error::AppError;

/// Write any report as pretty JSON.
pub fn write_json<T: Serialize>(path: &Path, report: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::Io(format!("Failed to create '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, report)
        .map_err(|e| AppError::Io(format!("Failed to write '{}': {e}", path.display())))?;
    out.flush()
        .map_err(|e| AppError::Io(format!("Failed to write '{}': {e}", path.display())))?;
    Ok(())
}

/// Write per-channel contribution metrics to a CSV file.
pub fn write_contributions_csv(path: &Path, report: &ContributionsReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::Io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    let row_err = |e: std::io::Error| AppError::Io(format!("Failed to write export CSV row: {e}"));

    writeln!(out, "channel,spend,roi,revenue,effectiveness").map_err(row_err)?;
    for m in &report.data {
        writeln!(
            out,
            "{},{},{},{},{}",
            csv_field(&m.name),
            m.spend,
            m.roi,
            m.revenue,
            m.effectiveness
        )
        .map_err(row_err)?;
    }
    out.flush().map_err(row_err)?;
    Ok(())
}

/// Write every report into `dir`, returning the files written.
pub fn write_report_bundle(dir: &Path, bundle: &ReportBundle) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::Io(format!("Failed to create export dir '{}': {e}", dir.display())))?;

    let files = [
        dir.join("contributions.json"),
        dir.join("response_curves.json"),
        dir.join("time_series.json"),
        dir.join("contributions.csv"),
    ];
    write_json(&files[0], &bundle.contributions)?;
    write_json(&files[1], &bundle.response_curves)?;
    write_json(&files[2], &bundle.time_series)?;
    write_contributions_csv(&files[3], &bundle.contributions)?;

    Ok(files.to_vec())
}

/// Quote a CSV field when it contains a delimiter, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
