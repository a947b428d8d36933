//! Multitaper kernel: univariate spectra and the cross-spectral engine.

use core::fmt;
use std::sync::Arc;

use mtspec_core::{Error, Result};

use super::estimate::{auto_spectrum, estimate, harmonic_ftest};
use super::freq::frequency_axis;
use super::jackknife::{combine, CombineKind};
use super::result::{Coherence, JackknifeEstimate, SpectralResult, Spectrum, TransferFunction};
use super::transfer::transfer_function;
use super::tsq::{run_groups, validate_groups};
use super::types::{CrossOptions, EigenCoefs, MtParameters, OutputKind};
use crate::kernel::{check_spectral_params, read_series, ConfigError, KernelLifecycle, Read1D};
use crate::report::{Diagnostic, Reporter, TracingReporter};
use crate::signal::traits::SpectrumEstimate1D;
use crate::signal::windows::{DpssConfig, DpssKernel, Tapers};

/// Constructor config for [`MultitaperKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultitaperConfig {
    /// Series length. The free functions fill this in from their input.
    pub n: usize,
    /// Time-bandwidth product.
    pub nw: f64,
    /// Number of tapers.
    pub k: usize,
    /// Sampling interval.
    pub dt: f64,
    /// Padding factor; the FFT length is `pad * n` rounded up to even.
    pub pad: f64,
    /// Remove the series mean before tapering.
    pub center: bool,
    /// Use Thomson's adaptive weights.
    pub adaptive: bool,
    /// Attach jackknife variance (and phase intervals for cross estimates).
    pub jackknife: bool,
    /// Attach harmonic F-test p-values to univariate spectra.
    pub ftest: bool,
    /// Attach the raw eigencoefficients to results.
    pub guts: bool,
}

impl Default for MultitaperConfig {
    fn default() -> Self {
        Self {
            n: 0,
            nw: 4.0,
            k: 7,
            dt: 1.0,
            pad: 2.0,
            center: true,
            adaptive: true,
            jackknife: false,
            ftest: false,
            guts: false,
        }
    }
}

impl MultitaperConfig {
    /// FFT length for this config: `round(pad * n)`, bumped to even and never
    /// shorter than `n`.
    pub fn nfft(&self) -> usize {
        let nfft = ((self.pad * self.n as f64).round() as usize).max(self.n);
        nfft + nfft % 2
    }
}

/// Multitaper estimator for series of one fixed length.
///
/// Owns its tapers, so any number of estimates share one taper computation.
pub struct MultitaperKernel {
    config: MultitaperConfig,
    tapers: Arc<Tapers>,
    params: Arc<MtParameters>,
    reporter: Arc<dyn Reporter + Send + Sync>,
}

impl fmt::Debug for MultitaperKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultitaperKernel")
            .field("config", &self.config)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

fn validate_config(config: &MultitaperConfig) -> core::result::Result<(), ConfigError> {
    check_spectral_params(config.nw, config.k, config.dt)?;
    if !config.pad.is_finite() || config.pad < 1.0 {
        return Err(ConfigError::InvalidArgument {
            arg: "pad",
            reason: "padding factor must be finite and >= 1",
        });
    }
    Ok(())
}

fn params_for(config: &MultitaperConfig, tapers: &Tapers) -> MtParameters {
    MtParameters {
        nw: tapers.nw(),
        k: config.k,
        n: config.n,
        dt: config.dt,
        nfft: config.nfft(),
        nsegments: 1,
        overlap: None,
    }
}

impl KernelLifecycle for MultitaperKernel {
    type Config = MultitaperConfig;

    fn try_new(config: Self::Config) -> core::result::Result<Self, ConfigError> {
        validate_config(&config)?;
        let tapers = DpssKernel::try_new(DpssConfig {
            n: config.n,
            nw: config.nw,
            k: config.k,
        })?
        .generate();
        Self::try_new_with_tapers(config, tapers)
    }
}

impl MultitaperKernel {
    /// Build a kernel around caller-supplied tapers.
    pub fn try_new_with_tapers(
        config: MultitaperConfig,
        tapers: Tapers,
    ) -> core::result::Result<Self, ConfigError> {
        validate_config(&config)?;
        if tapers.len() != config.n || tapers.k() != config.k {
            return Err(ConfigError::TaperShape {
                expected_len: config.n,
                expected_k: config.k,
                got_len: tapers.len(),
                got_k: tapers.k(),
            });
        }
        let params = Arc::new(params_for(&config, &tapers));
        Ok(Self {
            config,
            tapers: Arc::new(tapers),
            params,
            reporter: Arc::new(TracingReporter),
        })
    }

    /// Route diagnostics to `reporter` instead of `tracing`.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter + Send + Sync>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Configuration the kernel was built from.
    pub fn config(&self) -> &MultitaperConfig {
        &self.config
    }

    /// Shared estimation parameters.
    pub fn params(&self) -> &Arc<MtParameters> {
        &self.params
    }

    /// Tapers in use.
    pub fn tapers(&self) -> &Tapers {
        &self.tapers
    }

    pub(crate) fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    /// Eigencoefficients of one series, with adaptive weights if configured.
    pub fn coefficients<I>(&self, series: &I) -> Result<EigenCoefs>
    where
        I: Read1D<f64> + ?Sized,
    {
        let series = read_series(series, "series")?;
        self.coefficients_of(series)
    }

    pub(crate) fn coefficients_of(&self, series: &[f64]) -> Result<EigenCoefs> {
        let est = estimate(
            series,
            &self.tapers,
            self.params.nfft,
            self.config.center,
            self.config.adaptive,
        )?;
        if est.unconverged > 0 {
            self.reporter.report(Diagnostic::AdaptiveNotConverged {
                bins: est.unconverged,
                iterations: super::estimate::ADAPTIVE_MAX_ITER,
            });
        }
        Ok(est.coefs)
    }

    fn check_coefs(&self, coefs: &EigenCoefs, arg: &str) -> Result<()> {
        let bins = self.params.spectrum_len();
        if coefs.bins() != bins {
            return Err(Error::length_mismatch(format!("{arg}.bins"), bins, coefs.bins()));
        }
        if coefs.tapers() != self.config.k {
            return Err(Error::length_mismatch(
                format!("{arg}.tapers"),
                self.config.k,
                coefs.tapers(),
            ));
        }
        Ok(())
    }

    /// Univariate spectrum of a raw series.
    pub fn spectrum_from_series<I>(
        &self,
        series: &I,
        tsq: Option<&[Vec<usize>]>,
    ) -> Result<Spectrum>
    where
        I: Read1D<f64> + ?Sized,
    {
        if let Some(groups) = tsq {
            validate_groups(groups, self.config.k, self.params.spectrum_len())?;
        }
        let coefs = self.coefficients(series)?;
        self.spectrum_from_coefficients(coefs, tsq)
    }

    /// Univariate spectrum from precomputed eigencoefficients.
    pub fn spectrum_from_coefficients(
        &self,
        coefs: EigenCoefs,
        tsq: Option<&[Vec<usize>]>,
    ) -> Result<Spectrum> {
        self.check_coefs(&coefs, "coefs")?;
        if let Some(groups) = tsq {
            validate_groups(groups, self.config.k, self.params.spectrum_len())?;
        }
        let values = auto_spectrum(&coefs, self.config.dt);
        let ftest = self
            .config
            .ftest
            .then(|| harmonic_ftest(&coefs, &self.tapers.column_sums()));
        let jackknife = if self.config.jackknife {
            let combined = combine(&coefs, &coefs, CombineKind::CrossSpectrum, true)?;
            combined.jackknife.map(|jk| JackknifeEstimate {
                variance: jk.variance,
                phase_interval: None,
            })
        } else {
            None
        };
        let tsq = tsq.map(|groups| {
            run_groups(&[&coefs], groups, &self.tapers.mean_direction(), self.reporter())
        });
        Ok(Spectrum {
            freq: frequency_axis(&self.params, 0),
            values,
            phase: None,
            params: Arc::clone(&self.params),
            coefs: self.config.guts.then(|| vec![coefs]),
            ftest,
            jackknife,
            tsq,
        })
    }

    /// Cross-spectrum, coherence or transfer function of two raw series.
    ///
    /// Both series must have the same length; this is checked before any
    /// estimation work.
    pub fn cross_from_series<I1, I2>(
        &self,
        x: &I1,
        y: &I2,
        outp: OutputKind,
        opts: &CrossOptions,
    ) -> Result<SpectralResult>
    where
        I1: Read1D<f64> + ?Sized,
        I2: Read1D<f64> + ?Sized,
    {
        let x = read_series(x, "x")?;
        let y = read_series(y, "y")?;
        if x.len() != y.len() {
            return Err(Error::length_mismatch("y", x.len(), y.len()));
        }
        if let Some(groups) = &opts.tsq {
            validate_groups(groups, self.config.k, self.params.spectrum_len())?;
        }
        let a = self.coefficients_of(x)?;
        let b = self.coefficients_of(y)?;
        self.cross_from_coefficients(&a, &b, outp, opts)
    }

    /// Cross estimate from two precomputed coefficient sets.
    ///
    /// A nonzero frequency offset shifts the first set; the frequency axis
    /// then starts at the offset.
    pub fn cross_from_coefficients(
        &self,
        a: &EigenCoefs,
        b: &EigenCoefs,
        outp: OutputKind,
        opts: &CrossOptions,
    ) -> Result<SpectralResult> {
        self.check_coefs(a, "a")?;
        self.check_coefs(b, "b")?;
        if let Some(groups) = &opts.tsq {
            validate_groups(groups, self.config.k, self.params.spectrum_len())?;
        }
        self.cross_checked(a, b, outp, opts, self.config.guts)
    }

    /// Cross estimate of two validated sets; `attach` controls whether the
    /// raw coefficients are kept on the result.
    pub(crate) fn cross_checked(
        &self,
        a: &EigenCoefs,
        b: &EigenCoefs,
        outp: OutputKind,
        opts: &CrossOptions,
        attach: bool,
    ) -> Result<SpectralResult> {
        let offset = opts.offset.to_bins(self.params.spectrum_len(), self.config.dt);
        let shifted;
        let first = if offset != 0 {
            shifted = a.offset_by(offset, self.params.nfft);
            &shifted
        } else {
            a
        };
        let freq = frequency_axis(&self.params, offset);
        let params = Arc::clone(&self.params);
        let coefs = attach.then(|| vec![a.clone(), b.clone()]);
        let jk = self.config.jackknife;

        let tsq = match (&opts.tsq, outp) {
            (Some(groups), OutputKind::Spectrum | OutputKind::Coherence) => Some(run_groups(
                &[first, b],
                groups,
                &self.tapers.mean_direction(),
                self.reporter(),
            )),
            _ => None,
        };

        let result = match outp {
            OutputKind::Spectrum => {
                let combined = combine(first, b, CombineKind::CrossSpectrum, jk)?;
                let dt = self.config.dt;
                SpectralResult::Spectrum(Spectrum {
                    freq,
                    values: combined.values.iter().map(|c| dt * c.norm()).collect(),
                    phase: Some(combined.values.iter().map(|c| c.arg().to_degrees()).collect()),
                    params,
                    coefs,
                    ftest: None,
                    jackknife: combined.jackknife,
                    tsq,
                })
            }
            OutputKind::Coherence => {
                let combined = combine(first, b, CombineKind::Coherency, jk)?;
                SpectralResult::Coherence(Coherence {
                    freq,
                    coherence: combined.values.iter().map(|c| c.norm_sqr()).collect(),
                    phase: combined.values.iter().map(|c| c.arg().to_degrees()).collect(),
                    params,
                    coefs,
                    jackknife: combined.jackknife,
                    tsq,
                })
            }
            OutputKind::TransferFunction => {
                let (gain_sq, phase) = transfer_function(first, b)?;
                SpectralResult::TransferFunction(TransferFunction {
                    freq,
                    gain_sq,
                    phase,
                    params,
                    coefs,
                })
            }
        };
        Ok(result)
    }
}

impl SpectrumEstimate1D for MultitaperKernel {
    fn run_alloc<I>(&self, series: &I) -> Result<Spectrum>
    where
        I: Read1D<f64> + ?Sized,
    {
        self.spectrum_from_series(series, None)
    }
}

fn kernel_for(config: MultitaperConfig, n: usize) -> Result<MultitaperKernel> {
    Ok(MultitaperKernel::try_new(MultitaperConfig { n, ..config })?)
}

/// Univariate multitaper spectrum of `series`.
///
/// `config.n` is taken from the series.
pub fn multispec<I>(series: &I, config: MultitaperConfig) -> Result<Spectrum>
where
    I: Read1D<f64> + ?Sized,
{
    let series = read_series(series, "series")?;
    kernel_for(config, series.len())?.spectrum_from_series(series, None)
}

/// Cross-spectrum, coherence or transfer function of two series.
pub fn multispec_bivariate<I1, I2>(
    x: &I1,
    y: &I2,
    config: MultitaperConfig,
    outp: OutputKind,
    opts: &CrossOptions,
) -> Result<SpectralResult>
where
    I1: Read1D<f64> + ?Sized,
    I2: Read1D<f64> + ?Sized,
{
    let x = read_series(x, "x")?;
    let y = read_series(y, "y")?;
    if x.len() != y.len() {
        return Err(Error::length_mismatch("y", x.len(), y.len()));
    }
    kernel_for(config, x.len())?.cross_from_series(x, y, outp, opts)
}
