//! Special functions backing the significance tests.

mod beta;
mod gamma;

pub use beta::*;
pub use gamma::*;

/// Cumulative distribution function of the F distribution with `(d1, d2)`
/// degrees of freedom.
pub fn f_cdf(x: f64, d1: f64, d2: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x.is_infinite() {
        return 1.0;
    }
    betainc(d1 / 2.0, d2 / 2.0, d1 * x / (d1 * x + d2))
}

/// Survival function `P(F > x)` of the F distribution with `(d1, d2)`
/// degrees of freedom.
///
/// Evaluated through the complementary incomplete beta rather than
/// `1 - f_cdf` so small p-values keep their precision.
pub fn f_sf(x: f64, d1: f64, d2: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 1.0;
    }
    if x.is_infinite() {
        return 0.0;
    }
    betainc(d2 / 2.0, d1 / 2.0, d2 / (d2 + d1 * x))
}
