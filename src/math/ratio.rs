//! Ratio policy and reporting precision.
//!
//! Every ratio in the engine (portfolio ROI, Hill response, marginal response)
//! goes through [`safe_divide`], so a zero denominator always resolves to an
//! explicit default instead of NaN or ±Inf.

/// Divide `numerator` by `denominator`, returning `default_on_zero` when the
/// denominator is zero or the quotient is not finite.
pub fn safe_divide(numerator: f64, denominator: f64, default_on_zero: f64) -> f64 {
    if denominator == 0.0 {
        return default_on_zero;
    }
    let q = numerator / denominator;
    if q.is_finite() { q } else { default_on_zero }
}

/// Round to a fixed number of decimal places (half away from zero).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    // Avoid emitting "-0.0" in reports.
    if rounded == 0.0 { 0.0 } else { rounded }
}
