//! Spectral estimation and demodulation.

/// Complex demodulation around a carrier frequency.
pub mod demod;

/// Multitaper spectra, cross-spectra, coherence and line tests.
pub mod multitaper;

/// Trait-first capability interfaces.
pub mod traits;

/// Slepian tapers.
pub mod windows;
