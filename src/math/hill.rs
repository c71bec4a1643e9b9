//! Hill saturation function.
//!
//! `response(s) = s^slope / (ec^slope + s^slope)`
//!
//! Numerical notes:
//! - `s = 0` is defined as a response of exactly 0. For `slope <= 0` the formula
//!   would evaluate `0^slope`, which is 1 or +Inf rather than the limit we want.
//! - For `s > 0` we evaluate the algebraically equal form
//!   `1 / (1 + (ec/s)^slope)`, which stays finite when `s^slope` alone would
//!   overflow. The ratio still goes through [`safe_divide`].

use crate::math::safe_divide;

/// Evaluate the Hill response at `spend` for half-saturation `ec` and `slope`.
pub fn hill_response(spend: f64, ec: f64, slope: f64) -> f64 {
    if spend == 0.0 {
        return 0.0;
    }
    safe_divide(1.0, 1.0 + (ec / spend).powf(slope), 0.0)
}
