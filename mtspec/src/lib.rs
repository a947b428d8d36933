//! Multitaper spectral estimation.
//!
//! Spectra, cross-spectra, coherence and transfer functions from Slepian
//! tapered eigencoefficients, with adaptive weighting, jackknife variance,
//! harmonic F and T² line tests, time-domain covariance views and complex
//! demodulation.
//!
//! ```
//! use mtspec::signal::multitaper::{multispec, MultitaperConfig};
//!
//! let x: Vec<f64> = (0..256).map(|t| (0.3 * t as f64).sin()).collect();
//! let spec = multispec(&x, MultitaperConfig::default()).unwrap();
//! assert_eq!(spec.values.len(), spec.params.spectrum_len());
//! ```

#![warn(missing_docs)]

/// Trait-first kernel substrate: constructor validation and input adapters.
pub mod kernel;

/// Dense linear algebra helpers.
pub mod linalg;

/// Non-fatal diagnostics.
pub mod report;

/// Signal processing.
pub mod signal;

/// Special functions.
pub mod special;

pub use mtspec_core::{Error, Result};
