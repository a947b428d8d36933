//! Complex demodulation with a Slepian lowpass.

use mtspec_core::num_rs::{sliding_inner, unwrap, PhaseUnit};
use mtspec_core::{Error, Result};
use rustfft::num_complex::Complex;

use crate::kernel::{check_spectral_params, read_series, ConfigError, KernelLifecycle, Read1D};
use crate::signal::traits::Demodulate1D;
use crate::signal::windows::{DpssConfig, DpssKernel};

/// Envelope and phase of a series around a carrier.
#[derive(Debug, Clone, PartialEq)]
pub struct DemodulateResult {
    /// Time of each output sample (center of its filter window).
    pub time: Vec<f64>,
    /// Envelope amplitude.
    pub amplitude: Vec<f64>,
    /// Phase in degrees relative to the carrier.
    pub phase: Vec<f64>,
}

/// Constructor config for [`DemodulateKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemodulateConfig {
    /// Carrier frequency.
    pub f0: f64,
    /// Time-bandwidth product of the lowpass taper.
    pub nw: f64,
    /// Filter length in samples.
    pub block_len: usize,
    /// Unwrap the phase before removing the carrier ramp.
    pub unwrap: bool,
    /// Sampling interval.
    pub dt: f64,
    /// Time of the first input sample.
    pub basetime: f64,
}

impl Default for DemodulateConfig {
    fn default() -> Self {
        Self {
            f0: 0.0,
            nw: 3.0,
            block_len: 64,
            unwrap: true,
            dt: 1.0,
            basetime: 0.0,
        }
    }
}

/// Complex demodulator: a zeroth-order Slepian taper shifted to `f0`.
#[derive(Debug, Clone, PartialEq)]
pub struct DemodulateKernel {
    config: DemodulateConfig,
    filter: Vec<Complex<f64>>,
}

impl KernelLifecycle for DemodulateKernel {
    type Config = DemodulateConfig;

    fn try_new(config: Self::Config) -> core::result::Result<Self, ConfigError> {
        check_spectral_params(config.nw, 1, config.dt)?;
        if !config.f0.is_finite() {
            return Err(ConfigError::InvalidArgument {
                arg: "f0",
                reason: "carrier frequency must be finite",
            });
        }
        let taper = DpssKernel::try_new(DpssConfig {
            n: config.block_len,
            nw: config.nw,
            k: 1,
        })?
        .generate();
        let v = taper.taper(0);
        let gain = 2.0 / v.sum();
        let w = -2.0 * core::f64::consts::PI * config.f0 * config.dt;
        let filter = v
            .iter()
            .enumerate()
            .map(|(m, &vm)| Complex::from_polar(vm * gain, w * m as f64))
            .collect();
        Ok(Self { config, filter })
    }
}

impl DemodulateKernel {
    /// Complex filter taps `h[m] = v[m] exp(-i 2π f0 dt m) 2 / Σ v`.
    pub fn filter(&self) -> &[Complex<f64>] {
        &self.filter
    }
}

impl Demodulate1D for DemodulateKernel {
    fn run_alloc<I>(&self, series: &I) -> Result<DemodulateResult>
    where
        I: Read1D<f64> + ?Sized,
    {
        let x = read_series(series, "series")?;
        let block_len = self.config.block_len;
        if block_len > x.len() {
            return Err(Error::invalid_arg(
                "block_len",
                format!("filter length {block_len} exceeds the series length {}", x.len()),
            ));
        }
        let DemodulateConfig {
            f0, dt, basetime, ..
        } = self.config;

        let z = sliding_inner(x, &self.filter);
        let amplitude = z.iter().map(|c| c.norm()).collect();
        let raw: Vec<f64> = z.iter().map(|c| c.arg().to_degrees()).collect();
        let phase = if self.config.unwrap {
            unwrap(&raw, PhaseUnit::Degrees)
        } else {
            raw
        };
        let phase = phase
            .into_iter()
            .enumerate()
            .map(|(j, p)| p - 360.0 * dt * f0 * j as f64)
            .collect();
        let center = (block_len as f64 - 1.0) / 2.0;
        let time = (0..z.len())
            .map(|j| basetime + (j as f64 + center) * dt)
            .collect();

        tracing::debug!(f0, block_len, samples = z.len(), "demodulated");
        Ok(DemodulateResult {
            time,
            amplitude,
            phase,
        })
    }
}

/// Demodulate `series` around `config.f0`.
pub fn demodulate<I>(series: &I, config: DemodulateConfig) -> Result<DemodulateResult>
where
    I: Read1D<f64> + ?Sized,
{
    let kernel = DemodulateKernel::try_new(config)?;
    kernel.run_alloc(series)
}
