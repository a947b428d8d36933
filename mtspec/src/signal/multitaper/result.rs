use std::sync::Arc;

use super::types::{EigenCoefs, MtParameters};

/// Jackknife uncertainty attached to an estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct JackknifeEstimate {
    /// Delete-one-taper variance of the transformed estimate at every bin
    /// (`ln S` for spectra, `atanh |C|` for coherence).
    pub variance: Vec<f64>,
    /// Jackknife standard deviation of the phase in degrees; absent for
    /// auto-spectra, which have no phase.
    pub phase_interval: Option<Vec<f64>>,
}

/// Spectrum or cross-spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Frequency axis.
    pub freq: Vec<f64>,
    /// Spectral density (magnitude for cross-spectra).
    pub values: Vec<f64>,
    /// Cross-spectral phase in degrees; absent for auto-spectra.
    pub phase: Option<Vec<f64>>,
    /// Estimation parameters.
    pub params: Arc<MtParameters>,
    /// Raw eigencoefficients of each contributing series, when requested.
    pub coefs: Option<Vec<EigenCoefs>>,
    /// Harmonic F-test p-values (univariate spectra only).
    pub ftest: Option<Vec<f64>>,
    /// Jackknife variance and phase interval.
    pub jackknife: Option<JackknifeEstimate>,
    /// T² line-test p-values, one per requested bin group.
    pub tsq: Option<Vec<f64>>,
}

/// Magnitude-squared coherence between two series.
#[derive(Debug, Clone, PartialEq)]
pub struct Coherence {
    /// Frequency axis.
    pub freq: Vec<f64>,
    /// Magnitude-squared coherence in `[0, 1]`.
    pub coherence: Vec<f64>,
    /// Coherency phase in degrees.
    pub phase: Vec<f64>,
    /// Estimation parameters.
    pub params: Arc<MtParameters>,
    /// Raw eigencoefficients of both series, when requested.
    pub coefs: Option<Vec<EigenCoefs>>,
    /// Jackknife variance and phase interval.
    pub jackknife: Option<JackknifeEstimate>,
    /// T² line-test p-values, one per requested bin group.
    pub tsq: Option<Vec<f64>>,
}

/// Transfer function from the first series to the second.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    /// Frequency axis.
    pub freq: Vec<f64>,
    /// Squared gain `|H(f)|²`.
    pub gain_sq: Vec<f64>,
    /// Unwrapped phase of `H(f)` in degrees.
    pub phase: Vec<f64>,
    /// Estimation parameters.
    pub params: Arc<MtParameters>,
    /// Raw eigencoefficients of both series, when requested.
    pub coefs: Option<Vec<EigenCoefs>>,
}

/// Result of a cross-spectral estimate, tagged by the requested output kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SpectralResult {
    /// Cross-spectrum.
    Spectrum(Spectrum),
    /// Coherence.
    Coherence(Coherence),
    /// Transfer function.
    TransferFunction(TransferFunction),
}

impl SpectralResult {
    /// Frequency axis of the wrapped result.
    pub fn freq(&self) -> &[f64] {
        match self {
            SpectralResult::Spectrum(s) => &s.freq,
            SpectralResult::Coherence(c) => &c.freq,
            SpectralResult::TransferFunction(t) => &t.freq,
        }
    }

    /// Parameters of the wrapped result.
    pub fn params(&self) -> &Arc<MtParameters> {
        match self {
            SpectralResult::Spectrum(s) => &s.params,
            SpectralResult::Coherence(c) => &c.params,
            SpectralResult::TransferFunction(t) => &t.params,
        }
    }

    /// The spectrum, if this is one.
    pub fn as_spectrum(&self) -> Option<&Spectrum> {
        match self {
            SpectralResult::Spectrum(s) => Some(s),
            _ => None,
        }
    }

    /// The coherence, if this is one.
    pub fn as_coherence(&self) -> Option<&Coherence> {
        match self {
            SpectralResult::Coherence(c) => Some(c),
            _ => None,
        }
    }

    /// The transfer function, if this is one.
    pub fn as_transfer(&self) -> Option<&TransferFunction> {
        match self {
            SpectralResult::TransferFunction(t) => Some(t),
            _ => None,
        }
    }
}

/// Cross-covariance or cross-correlation sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeDomainResult {
    /// Cross-covariance; keeps the spectrum's amplitude scale.
    CrossCovariance {
        /// Lags, symmetric around zero.
        lags: Vec<f64>,
        /// Covariance at each lag.
        values: Vec<f64>,
        /// Parameters of the spectrum it came from.
        params: Arc<MtParameters>,
    },
    /// Cross-correlation; `1` at lag zero.
    CrossCorrelation {
        /// Lags, symmetric around zero.
        lags: Vec<f64>,
        /// Correlation at each lag.
        values: Vec<f64>,
        /// Parameters of the spectrum it came from.
        params: Arc<MtParameters>,
    },
}

impl TimeDomainResult {
    /// Lag axis.
    pub fn lags(&self) -> &[f64] {
        match self {
            TimeDomainResult::CrossCovariance { lags, .. }
            | TimeDomainResult::CrossCorrelation { lags, .. } => lags,
        }
    }

    /// Sequence values.
    pub fn values(&self) -> &[f64] {
        match self {
            TimeDomainResult::CrossCovariance { values, .. }
            | TimeDomainResult::CrossCorrelation { values, .. } => values,
        }
    }

    /// Index of lag zero.
    pub fn zero_lag_index(&self) -> usize {
        self.values().len() / 2
    }
}
