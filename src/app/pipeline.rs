//! Shared report pipeline used by the CLI and by serving hosts.
//!
//! Keeping this in one place avoids duplicating the request workflow:
//! gate credential -> fetch cached model -> compute report
//!
//! Front-ends then only deal with presentation (tables, JSON, HTTP bodies).
//! The engine is synchronous and `Send + Sync`; hosts share it behind an `Arc`
//! and may run report calls on a blocking worker pool.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::analysis::{aggregate_contributions, response_curves, time_series};
use crate::auth::{AccessGate, Credential};
use crate::domain::{ContributionsReport, ParameterNames, Precision, ResponseCurvesReport, TimeSeriesReport};
use crate::error::AppError;
use crate::model::{FittedModel, ModelRepository};

/// All three reports computed against the same model snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportBundle {
    pub contributions: ContributionsReport,
    pub response_curves: ResponseCurvesReport,
    pub time_series: TimeSeriesReport,
}

pub struct AnalysisEngine {
    repository: Arc<ModelRepository>,
    gate: Box<dyn AccessGate>,
    names: ParameterNames,
    precision: Precision,
}

impl AnalysisEngine {
    pub fn new(repository: Arc<ModelRepository>, gate: impl AccessGate + 'static) -> Self {
        Self {
            repository,
            gate: Box::new(gate),
            names: ParameterNames::default(),
            precision: Precision::default(),
        }
    }

    pub fn with_parameter_names(mut self, names: ParameterNames) -> Self {
        self.names = names;
        self
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn repository(&self) -> &ModelRepository {
        &self.repository
    }

    /// `getContributions`: per-channel metrics plus portfolio summary.
    pub fn contributions(&self, credential: &Credential) -> Result<ContributionsReport, AppError> {
        self.serve("contributions", credential, |model| {
            let analysis = aggregate_contributions(model, &self.names)?;
            Ok(analysis.to_report(self.precision))
        })
    }

    /// `getResponseCurves`: one sampled Hill curve per channel.
    pub fn response_curves(&self, credential: &Credential) -> Result<ResponseCurvesReport, AppError> {
        self.serve("response_curves", credential, |model| response_curves(model, &self.names))
    }

    /// `getTimeSeries`: contributions bucketed into fixed-width periods.
    pub fn time_series(&self, credential: &Credential) -> Result<TimeSeriesReport, AppError> {
        self.serve("time_series", credential, |model| time_series(model, &self.names))
    }

    /// Every report at once; fails as a whole if any one fails.
    pub fn all_reports(&self, credential: &Credential) -> Result<ReportBundle, AppError> {
        self.serve("all_reports", credential, |model| {
            Ok(ReportBundle {
                contributions: aggregate_contributions(model, &self.names)?.to_report(self.precision),
                response_curves: response_curves(model, &self.names)?,
                time_series: time_series(model, &self.names)?,
            })
        })
    }

    fn serve<T>(
        &self,
        report: &'static str,
        credential: &Credential,
        compute: impl FnOnce(&FittedModel) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        self.gate.authorize(credential)?;
        let model = self.repository.get_model()?;

        let started = Instant::now();
        match compute(model.as_ref()) {
            Ok(out) => {
                tracing::debug!(report, elapsed_us = started.elapsed().as_micros() as u64, "report computed");
                Ok(out)
            }
            Err(err) => {
                tracing::error!(report, kind = err.kind(), error = %err, "report failed");
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for AnalysisEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisEngine")
            .field("repository", &self.repository)
            .field("names", &self.names)
            .field("precision", &self.precision)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenGate;
    use crate::domain::CURVE_POINTS;
    use crate::io::artifact::write_artifact;
    use crate::testing::ArtifactBuilder;

    fn full_artifact() -> crate::io::artifact::ArtifactFile {
        let (geos, times, n_ch) = (2, 10, 3);
        let contribution: Vec<f64> = (0..2 * geos * times * n_ch).map(|i| (i % 7) as f64).collect();
        ArtifactBuilder::new(&["tv", "search", "social"], geos, times)
            .spend_fn(|g, t, c| ((g + 1) * (t + 1)) as f64 * [10.0, 20.0, 30.0][c])
            .kpi_fn(|_, _| 100.0)
            .channel_param("roi_m", &[1.5, 0.5, 2.0])
            .channel_param("ec_m", &[50.0, 100.0, 150.0])
            .channel_param("slope_m", &[1.0, 2.0, 3.0])
            .param(
                "contribution_m",
                &["chain", "draw", "geo", "time", "channel"],
                &[1, 2, geos, times, n_ch],
                contribution,
            )
            .build()
    }

    fn engine_at(path: &std::path::Path) -> AnalysisEngine {
        AnalysisEngine::new(Arc::new(ModelRepository::from_path(path)), TokenGate::any_token())
    }

    #[test]
    fn reports_share_one_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved_mmm.json");
        write_artifact(&path, &full_artifact()).unwrap();

        let engine = engine_at(&path);
        let caller = Credential::bearer("token");

        let contributions = engine.contributions(&caller).unwrap();
        let curves = engine.response_curves(&caller).unwrap();
        let series = engine.time_series(&caller).unwrap();
        assert_eq!(engine.repository().load_count(), 1);

        assert_eq!(contributions.data.len(), 3);
        assert_eq!(contributions.summary.num_time_periods, 10);
        assert_eq!(contributions.summary.total_kpi, 2000.0);
        for metric in &contributions.data {
            // Rounded values still agree to reporting precision.
            assert!((metric.revenue - metric.roi * metric.spend).abs() < 0.01 * metric.spend.max(1.0));
        }

        assert_eq!(curves.data.len(), 3);
        assert!(curves.data.iter().all(|c| c.points.len() == CURVE_POINTS));
        let curve_names: Vec<&str> = curves.data.iter().map(|c| c.channel.as_str()).collect();
        let metric_names: Vec<&str> = contributions.data.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(curve_names, metric_names);

        // 10 time steps -> 2 complete periods.
        assert_eq!(series.data.len(), 2);

        let bundle = engine.all_reports(&caller).unwrap();
        assert_eq!(bundle.contributions, contributions);
        assert_eq!(engine.repository().load_count(), 1);
    }

    #[test]
    fn missing_artifact_is_model_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_at(&dir.path().join("absent.json"));
        let err = engine.contributions(&Credential::bearer("token")).unwrap_err();
        assert!(matches!(err, AppError::ModelNotFound { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn anonymous_caller_is_rejected_before_loading() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_at(&dir.path().join("absent.json"));
        let err = engine.time_series(&Credential::anonymous()).unwrap_err();
        assert_eq!(err.kind(), "Unauthorized");
        assert_eq!(engine.repository().load_count(), 0);
    }

    #[test]
    fn failing_report_returns_no_partial_bundle() {
        let mut artifact = full_artifact();
        artifact.posterior.remove("slope_m");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved_mmm.json");
        write_artifact(&path, &artifact).unwrap();

        let engine = engine_at(&path);
        let caller = Credential::bearer("token");
        assert!(engine.contributions(&caller).is_ok());
        let err = engine.all_reports(&caller).unwrap_err();
        assert_eq!(err, AppError::ParameterNotFound("slope_m".to_string()));
    }

    #[test]
    fn precision_controls_report_rounding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved_mmm.json");
        write_artifact(&path, &full_artifact()).unwrap();

        let caller = Credential::bearer("token");
        let coarse = Precision { money: 0, ratio: 1 };
        let report = engine_at(&path).with_precision(coarse).contributions(&caller).unwrap();
        for m in &report.data {
            assert_eq!(m.spend, m.spend.round());
            assert_eq!(m.roi, (m.roi * 10.0).round() / 10.0);
        }
        assert_eq!(report.summary.overall_roi, (report.summary.overall_roi * 10.0).round() / 10.0);
    }

    #[test]
    fn custom_parameter_names_are_honoured() {
        let mut artifact = full_artifact();
        let roi = artifact.posterior.remove("roi_m").unwrap();
        artifact.posterior.insert("roi".to_string(), roi);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved_mmm.json");
        write_artifact(&path, &artifact).unwrap();

        let caller = Credential::bearer("token");
        assert!(engine_at(&path).contributions(&caller).is_err());

        let names = ParameterNames {
            roi: "roi".to_string(),
            ..ParameterNames::default()
        };
        let report = engine_at(&path).with_parameter_names(names).contributions(&caller).unwrap();
        assert_eq!(report.data[0].name, "tv");
    }
}
