//! Trait interfaces for signal-processing capabilities.
//!
//! These traits define the trait-first API shape used by the kernels.

use mtspec_core::Result;

use crate::kernel::Read1D;
use crate::signal::demod::DemodulateResult;
use crate::signal::multitaper::Spectrum;
use crate::signal::windows::Tapers;

/// Taper-set generation capability.
pub trait TaperGenerate {
    /// Generate and allocate the tapers.
    fn run_alloc(&self) -> Result<Tapers>;
}

/// Univariate spectrum estimation capability.
pub trait SpectrumEstimate1D {
    /// Estimate the spectrum of one series.
    fn run_alloc<I>(&self, series: &I) -> Result<Spectrum>
    where
        I: Read1D<f64> + ?Sized;
}

/// Complex demodulation capability.
pub trait Demodulate1D {
    /// Demodulate one series and allocate the envelope and phase.
    fn run_alloc<I>(&self, series: &I) -> Result<DemodulateResult>
    where
        I: Read1D<f64> + ?Sized;
}
