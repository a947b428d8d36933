//! Per-series eigencoefficients, adaptive weights and the harmonic F-test.

use mtspec_core::{Error, Result};
use ndarray::Array2;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use super::types::EigenCoefs;
use crate::signal::windows::Tapers;
use crate::special::f_sf;

/// Iteration cap of the adaptive weight solver.
pub const ADAPTIVE_MAX_ITER: usize = 100;
/// Relative change below which the adaptive spectrum is considered converged.
pub const ADAPTIVE_TOL: f64 = 1e-10;

/// Eigencoefficients together with the adaptive solver's convergence count.
#[derive(Debug, Clone)]
pub(crate) struct Estimated {
    pub coefs: EigenCoefs,
    pub unconverged: usize,
}

/// Tapered Fourier coefficients of one series.
///
/// The series is optionally mean-removed, multiplied by every taper,
/// zero-padded to `nfft` and transformed; the `nfft / 2 + 1` non-negative
/// frequency bins are kept. With `adaptive` set, Thomson's adaptive weights
/// are attached, using the series variance as the broadband leakage level.
pub fn eigen_coefficients(
    series: &[f64],
    tapers: &Tapers,
    nfft: usize,
    center: bool,
    adaptive: bool,
) -> Result<EigenCoefs> {
    estimate(series, tapers, nfft, center, adaptive).map(|e| e.coefs)
}

pub(crate) fn estimate(
    series: &[f64],
    tapers: &Tapers,
    nfft: usize,
    center: bool,
    adaptive: bool,
) -> Result<Estimated> {
    let n = series.len();
    if n != tapers.len() {
        return Err(Error::length_mismatch("series", tapers.len(), n));
    }
    if nfft < n {
        return Err(Error::invalid_arg(
            "nfft",
            format!("FFT length {nfft} is shorter than the series ({n})"),
        ));
    }

    let mean = if center {
        series.iter().sum::<f64>() / n as f64
    } else {
        0.0
    };
    let bins = nfft / 2 + 1;
    let k = tapers.k();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nfft);
    let mut coef = Array2::<Complex<f64>>::zeros((bins, k));
    let mut buf = vec![Complex::new(0.0, 0.0); nfft];
    for (j, taper) in tapers.vectors().columns().into_iter().enumerate() {
        buf.iter_mut().for_each(|c| *c = Complex::new(0.0, 0.0));
        for ((dst, &x), &v) in buf.iter_mut().zip(series.iter()).zip(taper.iter()) {
            *dst = Complex::new((x - mean) * v, 0.0);
        }
        fft.process(&mut buf);
        for (i, c) in buf.iter().take(bins).enumerate() {
            coef[(i, j)] = *c;
        }
    }

    if !adaptive {
        return Ok(Estimated {
            coefs: EigenCoefs::new(coef, None)?,
            unconverged: 0,
        });
    }

    let variance = series.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
    let (weights, unconverged) = adaptive_weights(&coef, tapers.concentrations(), variance);
    Ok(Estimated {
        coefs: EigenCoefs::new(coef, Some(weights))?,
        unconverged,
    })
}

/// Thomson's adaptive weights `d_k(f)` for every bin.
///
/// Returns the weights and the number of bins that hit the iteration cap.
fn adaptive_weights(
    coef: &Array2<Complex<f64>>,
    lambda: &[f64],
    variance: f64,
) -> (Array2<f64>, usize) {
    let (bins, k) = coef.dim();
    let mut weights = Array2::<f64>::ones((bins, k));
    let mut unconverged = 0;
    let mut eig = vec![0.0; k];
    let mut d = vec![0.0; k];

    for bin in 0..bins {
        for (j, e) in eig.iter_mut().enumerate() {
            *e = coef[(bin, j)].norm_sqr();
        }
        let mut s = if k > 1 { 0.5 * (eig[0] + eig[1]) } else { eig[0] };
        let mut converged = false;
        for _ in 0..ADAPTIVE_MAX_ITER {
            for j in 0..k {
                let denom = lambda[j] * s + (1.0 - lambda[j]) * variance;
                d[j] = if denom > 0.0 {
                    lambda[j].sqrt() * s / denom
                } else {
                    1.0
                };
            }
            let norm: f64 = d.iter().map(|w| w * w).sum();
            if norm <= 0.0 {
                // every eigenspectrum at this bin is zero
                d.iter_mut().for_each(|w| *w = 1.0);
                converged = true;
                break;
            }
            let next = d.iter().zip(eig.iter()).map(|(w, e)| w * w * e).sum::<f64>() / norm;
            let delta = (next - s).abs();
            s = next;
            if delta <= ADAPTIVE_TOL * s.abs() {
                converged = true;
                break;
            }
        }
        if !converged {
            unconverged += 1;
        }
        for j in 0..k {
            weights[(bin, j)] = d[j];
        }
    }
    (weights, unconverged)
}

/// Weighted eigenspectrum average `dt Σ d_k² |y_k|² / Σ d_k²` at every bin.
pub fn auto_spectrum(coefs: &EigenCoefs, dt: f64) -> Vec<f64> {
    (0..coefs.bins())
        .map(|bin| {
            let row = coefs.row(bin);
            let (num, den) = row.iter().enumerate().fold((0.0, 0.0), |(num, den), (k, y)| {
                let w = coefs.weight(bin, k).powi(2);
                (num + w * y.norm_sqr(), den + w)
            });
            dt * num / den
        })
        .collect()
}

/// Harmonic F-test p-values for a line component at every bin.
///
/// `taper_sums` are the tapers' zero-frequency transforms `V_k(0)`. The
/// statistic is tested against `F(2, 2K - 2)`; with a single taper there are
/// no residual degrees of freedom and every p-value is `NaN`.
pub fn harmonic_ftest(coefs: &EigenCoefs, taper_sums: &[f64]) -> Vec<f64> {
    let k = coefs.tapers();
    if k < 2 {
        return vec![f64::NAN; coefs.bins()];
    }
    let u2: f64 = taper_sums.iter().map(|u| u * u).sum();
    let dof = 2.0 * (k as f64 - 1.0);
    (0..coefs.bins())
        .map(|bin| {
            let row = coefs.row(bin);
            let mu = row
                .iter()
                .zip(taper_sums.iter())
                .fold(Complex::new(0.0, 0.0), |acc, (y, &u)| acc + y * u)
                / u2;
            let residual: f64 = row
                .iter()
                .zip(taper_sums.iter())
                .map(|(y, &u)| (y - mu * u).norm_sqr())
                .sum();
            let f = (k as f64 - 1.0) * mu.norm_sqr() * u2 / residual;
            f_sf(f, 2.0, dof)
        })
        .collect()
}
