//! Evenly spaced spend grids for response-curve sweeps.

use crate::error::AppError;

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
///
/// `min == max` is allowed and collapses the grid to a constant; this is how a
/// channel with zero observed spend produces an all-zero sweep.
pub fn lin_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && max >= min) {
        return Err(AppError::compute(format!(
            "Invalid grid range: min={min}, max={max} (must be finite and max>=min)."
        )));
    }
    if steps < 2 {
        return Err(AppError::compute("Grid steps must be >= 2."));
    }

    let step = grid_step(min, max, steps);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push(min + step * i as f64);
    }
    // Pin the upper endpoint exactly; accumulated rounding can leave it a few ulps short.
    out[steps - 1] = max;
    Ok(out)
}

/// Spacing between consecutive points of a `steps`-point grid over `[min, max]`.
pub fn grid_step(min: f64, max: f64, steps: usize) -> f64 {
    if steps < 2 {
        return 0.0;
    }
    (max - min) / (steps as f64 - 1.0)
}
