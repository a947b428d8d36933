//! Transfer-function solver over taper coefficients.

use mtspec_core::num_rs::{unwrap, PhaseUnit};
use mtspec_core::{Error, Result};
use nalgebra::{DMatrix, DVector};
use rustfft::num_complex::Complex;

use super::types::EigenCoefs;
use crate::linalg::lstsq;

/// Least-squares transfer coefficients at one bin.
///
/// `inputs` is `[K × q]` (one column of taper coefficients per input series)
/// and `output` has one coefficient per taper; the result holds one complex
/// transfer coefficient per input.
pub fn solve_transfer(
    inputs: &DMatrix<Complex<f64>>,
    output: &DVector<Complex<f64>>,
) -> Result<DVector<Complex<f64>>> {
    lstsq(inputs, output)
}

/// Single-input transfer function from `input` to `output` at every bin.
///
/// Rows are weighted by `sqrt(d_k e_k)` from both sets' adaptive weights.
/// Returns the squared gain and the unwrapped phase in degrees. Bins with
/// non-finite coefficients give `NaN` gain and phase.
pub(crate) fn transfer_function(
    input: &EigenCoefs,
    output: &EigenCoefs,
) -> Result<(Vec<f64>, Vec<f64>)> {
    if input.bins() != output.bins() {
        return Err(Error::length_mismatch("coefs.bins", input.bins(), output.bins()));
    }
    if input.tapers() != output.tapers() {
        return Err(Error::length_mismatch("coefs.tapers", input.tapers(), output.tapers()));
    }
    let k = input.tapers();
    let mut gain_sq = Vec::with_capacity(input.bins());
    let mut phase = Vec::with_capacity(input.bins());
    for bin in 0..input.bins() {
        let (x, y) = (input.row(bin), output.row(bin));
        let w: Vec<f64> = (0..k)
            .map(|j| (input.weight(bin, j) * output.weight(bin, j)).sqrt())
            .collect();
        let a = DMatrix::from_iterator(k, 1, (0..k).map(|j| x[j] * w[j]));
        let b = DVector::from_iterator(k, (0..k).map(|j| y[j] * w[j]));
        if a.iter().chain(b.iter()).any(|c| !c.re.is_finite() || !c.im.is_finite()) {
            gain_sq.push(f64::NAN);
            phase.push(f64::NAN);
            continue;
        }
        let h = solve_transfer(&a, &b)?[0];
        gain_sq.push(h.norm_sqr());
        phase.push(h.arg().to_degrees());
    }
    Ok((gain_sq, unwrap(&phase, PhaseUnit::Degrees)))
}
