//! Cross-covariance and cross-correlation from spectral results.

use std::sync::Arc;

use mtspec_core::num_rs::{fftshift, linspace};
use mtspec_core::{Error, Result};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use super::cross::{MultitaperConfig, MultitaperKernel};
use super::result::{SpectralResult, TimeDomainResult};
use super::types::{CovarianceKind, CrossOptions, MtParameters, OutputKind};
use crate::kernel::{read_series, KernelLifecycle, Read1D};

/// Inverse FFT of a one-sided complex sequence, real part, zero lag centered.
fn centered_inverse(magnitude: &[f64], phase_deg: Option<&[f64]>) -> Vec<f64> {
    let len = magnitude.len();
    let mut buf: Vec<Complex<f64>> = match phase_deg {
        Some(phase) => magnitude
            .iter()
            .zip(phase.iter())
            .map(|(&m, &p)| Complex::from_polar(m, p.to_radians()))
            .collect(),
        None => magnitude.iter().map(|&m| Complex::new(m, 0.0)).collect(),
    };
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_inverse(len).process(&mut buf);
    let scale = 1.0 / len as f64;
    let real: Vec<f64> = buf.iter().map(|c| c.re * scale).collect();
    fftshift(&real)
}

fn lag_axis(params: &MtParameters, len: usize) -> Vec<f64> {
    let span = params.dt * params.n as f64;
    linspace(-1.0, 1.0, len).into_iter().map(|l| l * span).collect()
}

fn normalized(values: Vec<f64>) -> Vec<f64> {
    let zero = values[values.len() / 2];
    values.into_iter().map(|v| v / zero).collect()
}

/// Time-domain view of a spectrum or coherence.
///
/// Coherence has no amplitude scale, so only its correlation is defined;
/// transfer functions have no time-domain counterpart here.
pub fn mt_ccvf(result: &SpectralResult, kind: CovarianceKind) -> Result<TimeDomainResult> {
    let (values, params) = match (result, kind) {
        (SpectralResult::Spectrum(spec), _) => (
            centered_inverse(&spec.values, spec.phase.as_deref()),
            &spec.params,
        ),
        (SpectralResult::Coherence(coh), CovarianceKind::Ccf) => {
            let magnitude: Vec<f64> = coh.coherence.iter().map(|c| c.sqrt()).collect();
            (centered_inverse(&magnitude, Some(coh.phase.as_slice())), &coh.params)
        }
        (SpectralResult::Coherence(_), CovarianceKind::Ccvf) => {
            return Err(Error::Unsupported {
                reason: "cross-covariance is undefined for coherence; request `ccf`".into(),
            })
        }
        (SpectralResult::TransferFunction(_), _) => {
            return Err(Error::Unsupported {
                reason: "transfer functions have no cross-covariance".into(),
            })
        }
    };
    if values.is_empty() {
        return Err(Error::invalid_arg("result", "spectrum is empty"));
    }
    let lags = lag_axis(params, values.len());
    let params = Arc::clone(params);
    Ok(match kind {
        CovarianceKind::Ccvf => TimeDomainResult::CrossCovariance { lags, values, params },
        CovarianceKind::Ccf => TimeDomainResult::CrossCorrelation {
            lags,
            values: normalized(values),
            params,
        },
    })
}

/// Cross-covariance or cross-correlation of two raw series.
///
/// Runs the cross-spectral engine without jackknife or raw coefficients and
/// transforms the resulting cross-spectrum.
pub fn mt_ccvf_bivariate<I1, I2>(
    x: &I1,
    y: &I2,
    config: MultitaperConfig,
    kind: CovarianceKind,
) -> Result<TimeDomainResult>
where
    I1: Read1D<f64> + ?Sized,
    I2: Read1D<f64> + ?Sized,
{
    let x = read_series(x, "x")?;
    let y = read_series(y, "y")?;
    if x.len() != y.len() {
        return Err(Error::length_mismatch("y", x.len(), y.len()));
    }
    let kernel = MultitaperKernel::try_new(MultitaperConfig {
        n: x.len(),
        jackknife: false,
        guts: false,
        ..config
    })?;
    let spec = kernel.cross_from_series(x, y, OutputKind::Spectrum, &CrossOptions::default())?;
    mt_ccvf(&spec, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::multitaper::result::Spectrum;
    use approx::assert_abs_diff_eq;

    fn flat_spectrum(len: usize, n: usize, dt: f64) -> SpectralResult {
        let params = Arc::new(MtParameters {
            nw: 4.0,
            k: 7,
            n,
            dt,
            nfft: 2 * (len - 1),
            nsegments: 1,
            overlap: None,
        });
        SpectralResult::Spectrum(Spectrum {
            freq: vec![0.0; len],
            values: vec![2.0; len],
            phase: None,
            params,
            coefs: None,
            ftest: None,
            jackknife: None,
            tsq: None,
        })
    }

    #[test]
    fn flat_spectrum_is_an_impulse_at_zero_lag() {
        let res = mt_ccvf(&flat_spectrum(9, 8, 0.5), CovarianceKind::Ccvf).expect("ccvf");
        let values = res.values();
        assert_eq!(res.zero_lag_index(), 4);
        assert_abs_diff_eq!(values[4], 2.0, epsilon = 1e-12);
        for (_, v) in values.iter().enumerate().filter(|(i, _)| *i != 4) {
            assert_abs_diff_eq!(*v, 0.0, epsilon = 1e-12);
        }
        let lags = res.lags();
        assert_eq!(lags.len(), 9);
        assert_eq!(lags[0], -4.0);
        assert_eq!(lags[8], 4.0);
    }

    #[test]
    fn correlation_is_normalized_at_zero_lag() {
        let res = mt_ccvf(&flat_spectrum(9, 8, 0.5), CovarianceKind::Ccf).expect("ccf");
        assert_eq!(res.values()[res.zero_lag_index()], 1.0);
        assert!(matches!(res, TimeDomainResult::CrossCorrelation { .. }));
    }

    #[test]
    fn bivariate_rejects_unequal_lengths() {
        let err = mt_ccvf_bivariate(
            &vec![1.0; 32],
            &vec![1.0; 30],
            MultitaperConfig::default(),
            CovarianceKind::Ccvf,
        )
        .expect_err("mismatch");
        assert_eq!(err, Error::length_mismatch("y", 32, 30));
    }
}
