//! Posterior point estimates.
//!
//! A posterior parameter is a tensor of samples indexed by `(chain, draw, ...)`.
//! Summarizing takes the arithmetic mean over the requested sampling axes and
//! keeps every remaining axis in its stored order.

use ndarray::{ArrayD, Axis};

use crate::domain::{CHANNEL_DIM, SAMPLING_DIMS};
use crate::error::AppError;
use crate::model::{FittedModel, NamedTensor};

pub struct PosteriorSummarizer<'a> {
    model: &'a FittedModel,
}

impl<'a> PosteriorSummarizer<'a> {
    pub fn new(model: &'a FittedModel) -> Self {
        Self { model }
    }

    /// Mean of `parameter` over the axes named in `axes`.
    pub fn summarize(&self, parameter: &str, axes: &[&str]) -> Result<NamedTensor, AppError> {
        let tensor = self.model.parameter(parameter)?;

        let mut positions = Vec::with_capacity(axes.len());
        for &name in axes {
            let ax = tensor.axis_of(name).ok_or_else(|| {
                AppError::compute(format!(
                    "parameter '{parameter}' has no '{name}' axis (axes: {:?})",
                    tensor.dims()
                ))
            })?;
            positions.push(ax);
        }
        positions.sort_unstable();
        positions.dedup();

        // Reduce from the highest axis down so lower positions stay valid.
        let mut dims = tensor.dims().to_vec();
        let mut reduced: Option<ArrayD<f64>> = None;
        for &ax in positions.iter().rev() {
            let next = match &reduced {
                Some(array) => array.mean_axis(Axis(ax)),
                None => tensor.data().mean_axis(Axis(ax)),
            };
            let next = next.ok_or_else(|| {
                AppError::compute(format!(
                    "parameter '{parameter}': cannot average over empty '{}' axis",
                    dims[ax]
                ))
            })?;
            dims.remove(ax);
            reduced = Some(next);
        }

        let data = reduced.unwrap_or_else(|| tensor.data().clone());
        NamedTensor::new(dims, data)
    }

    /// Posterior mean per channel, in model channel order.
    ///
    /// The parameter must reduce to a single `channel` axis of length
    /// `num_channels`.
    pub fn channel_estimates(&self, parameter: &str) -> Result<Vec<f64>, AppError> {
        let summary = self.summarize(parameter, &SAMPLING_DIMS)?;
        let data = summary.data();
        let channel_axis = summary.dims().len() == 1 && summary.dims()[0] == CHANNEL_DIM;
        if !channel_axis || data.len() != self.model.num_channels() {
            return Err(AppError::compute(format!(
                "parameter '{parameter}': expected one value per channel ({}), got shape {:?} with axes {:?}",
                self.model.num_channels(),
                data.shape(),
                summary.dims()
            )));
        }
        Ok(data.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ArtifactBuilder;

    #[test]
    fn mean_over_chain_and_draw() {
        // chain 0: draws [1, 3] for tv, [10, 30] for search
        // chain 1: draws [5, 7] for tv, [50, 70] for search
        let model = ArtifactBuilder::new(&["tv", "search"], 1, 4)
            .param(
                "roi_m",
                &["chain", "draw", "channel"],
                &[2, 2, 2],
                vec![1.0, 10.0, 3.0, 30.0, 5.0, 50.0, 7.0, 70.0],
            )
            .build_model();
        let summarizer = PosteriorSummarizer::new(&model);

        let summary = summarizer.summarize("roi_m", &["chain", "draw"]).unwrap();
        assert_eq!(summary.dims(), ["channel".to_string()]);
        assert_eq!(summary.data().as_slice().unwrap(), &[4.0, 40.0]);

        assert_eq!(summarizer.channel_estimates("roi_m").unwrap(), vec![4.0, 40.0]);
    }

    #[test]
    fn remaining_axes_keep_stored_order() {
        // (chain=1, draw=2, geo=2, channel=3); values chosen so each cell's mean is distinct.
        let mut values = Vec::new();
        for draw in 0..2 {
            for geo in 0..2 {
                for ch in 0..3 {
                    values.push((geo * 10 + ch) as f64 + draw as f64);
                }
            }
        }
        let model = ArtifactBuilder::new(&["a", "b", "c"], 2, 4)
            .param("beta", &["chain", "draw", "geo", "channel"], &[1, 2, 2, 3], values)
            .build_model();

        let summary = PosteriorSummarizer::new(&model)
            .summarize("beta", &["draw", "chain"])
            .unwrap();
        assert_eq!(summary.dims(), ["geo".to_string(), "channel".to_string()]);
        assert_eq!(summary.data().shape(), &[2, 3]);
        assert_eq!(summary.data()[[1, 2]], 12.5);
        assert_eq!(summary.data()[[0, 1]], 1.5);
    }

    #[test]
    fn partial_reduction_keeps_draw_axis() {
        let model = ArtifactBuilder::new(&["tv"], 1, 4)
            .param("roi_m", &["chain", "draw", "channel"], &[2, 3, 1], vec![1.0, 2.0, 3.0, 3.0, 4.0, 5.0])
            .build_model();
        let summary = PosteriorSummarizer::new(&model)
            .summarize("roi_m", &["chain"])
            .unwrap();
        assert_eq!(summary.dims(), ["draw".to_string(), "channel".to_string()]);
        assert_eq!(summary.data().iter().copied().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn missing_parameter_is_parameter_not_found() {
        let model = ArtifactBuilder::new(&["tv"], 1, 4).build_model();
        let err = PosteriorSummarizer::new(&model)
            .summarize("roi_m", &SAMPLING_DIMS)
            .unwrap_err();
        assert_eq!(err, AppError::ParameterNotFound("roi_m".to_string()));
    }

    #[test]
    fn unknown_axis_is_compute_error() {
        let model = ArtifactBuilder::new(&["tv"], 1, 4)
            .channel_param("roi_m", &[1.0])
            .build_model();
        let err = PosteriorSummarizer::new(&model)
            .summarize("roi_m", &["sample"])
            .unwrap_err();
        assert_eq!(err.kind(), "ComputeError");
    }

    #[test]
    fn same_length_non_channel_axis_is_not_a_channel_vector() {
        // 2 geos and 2 channels: a per-time or per-geo vector has the right
        // length but the wrong axis.
        let model = ArtifactBuilder::new(&["tv", "search"], 2, 2)
            .param("per_time", &["chain", "draw", "time"], &[1, 2, 2], vec![1.0, 2.0, 3.0, 4.0])
            .param("per_geo", &["chain", "draw", "geo"], &[2, 1, 2], vec![1.0, 2.0, 3.0, 4.0])
            .build_model();
        let summarizer = PosteriorSummarizer::new(&model);
        for name in ["per_time", "per_geo"] {
            let err = summarizer.channel_estimates(name).unwrap_err();
            assert_eq!(err.kind(), "ComputeError", "{name}");
        }
    }

    #[test]
    fn channel_estimates_require_channel_vector() {
        let model = ArtifactBuilder::new(&["tv", "search"], 2, 4)
            .param("per_geo", &["chain", "draw", "geo"], &[1, 1, 2], vec![1.0, 2.0])
            .build_model();
        let err = PosteriorSummarizer::new(&model)
            .channel_estimates("per_geo")
            .unwrap_err();
        assert_eq!(err.kind(), "ComputeError");
    }
}
