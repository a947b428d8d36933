use core::fmt;
use core::str::FromStr;

use mtspec_core::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};
use rustfft::num_complex::Complex;

/// Parameters of one estimation call.
///
/// Shared by every result record the call produces and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct MtParameters {
    /// Time-bandwidth product.
    pub nw: f64,
    /// Number of tapers.
    pub k: usize,
    /// Series length in samples.
    pub n: usize,
    /// Sampling interval.
    pub dt: f64,
    /// FFT length after padding.
    pub nfft: usize,
    /// Dimension count; `1` for univariate and bivariate estimates.
    pub nsegments: usize,
    /// Auxiliary field, unused by the estimators in this crate.
    pub overlap: Option<f64>,
}

impl MtParameters {
    /// Number of one-sided frequency bins, `nfft / 2 + 1`.
    pub fn spectrum_len(&self) -> usize {
        self.nfft / 2 + 1
    }

    /// Frequency spacing of the padded grid.
    pub fn bin_width(&self) -> f64 {
        1.0 / (self.nfft as f64 * self.dt)
    }
}

/// Tapered Fourier coefficients of one series.
///
/// `coef` is laid out `[bin, taper]`. `weights`, when present, holds the
/// adaptive amplitude weight `d_k(f)` for every coefficient; absent weights
/// mean every taper counts equally.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenCoefs {
    coef: Array2<Complex<f64>>,
    weights: Option<Array2<f64>>,
}

impl EigenCoefs {
    /// Build a container, checking that `weights` matches `coef` in shape.
    pub fn new(coef: Array2<Complex<f64>>, weights: Option<Array2<f64>>) -> Result<Self> {
        if let Some(w) = &weights {
            if w.nrows() != coef.nrows() {
                return Err(Error::length_mismatch("weights.bins", coef.nrows(), w.nrows()));
            }
            if w.ncols() != coef.ncols() {
                return Err(Error::length_mismatch("weights.tapers", coef.ncols(), w.ncols()));
            }
        }
        Ok(Self { coef, weights })
    }

    /// Number of one-sided frequency bins.
    pub fn bins(&self) -> usize {
        self.coef.nrows()
    }

    /// Number of tapers.
    pub fn tapers(&self) -> usize {
        self.coef.ncols()
    }

    /// Coefficients, `[bin, taper]`.
    pub fn coef(&self) -> ArrayView2<'_, Complex<f64>> {
        self.coef.view()
    }

    /// Coefficients of every taper at one bin.
    pub fn row(&self, bin: usize) -> ArrayView1<'_, Complex<f64>> {
        self.coef.row(bin)
    }

    /// Adaptive weights, if any.
    pub fn weights(&self) -> Option<ArrayView2<'_, f64>> {
        self.weights.as_ref().map(|w| w.view())
    }

    /// Weight of taper `k` at `bin`; `1` when unweighted.
    pub fn weight(&self, bin: usize, k: usize) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[(bin, k)])
    }

    /// Reindex the rows by a bin offset through the conjugate-mirrored full
    /// spectrum of a real series.
    ///
    /// Row `i` of the result is full-spectrum bin `(i + offset) mod nfft`,
    /// where bins past Nyquist are the conjugates of their mirror images.
    /// Negative offsets therefore wrap through zero frequency into the
    /// negative-frequency half.
    pub fn offset_by(&self, offset: isize, nfft: usize) -> Self {
        let bins = self.bins();
        let nfft_i = nfft as isize;
        let source = |i: usize| -> (usize, bool) {
            let j = (i as isize + offset).rem_euclid(nfft_i) as usize;
            if j < bins {
                (j, false)
            } else {
                (nfft - j, true)
            }
        };
        let coef = Array2::from_shape_fn(self.coef.raw_dim(), |(i, k)| {
            let (j, mirrored) = source(i);
            let c = self.coef[(j, k)];
            if mirrored {
                c.conj()
            } else {
                c
            }
        });
        let weights = self.weights.as_ref().map(|w| {
            Array2::from_shape_fn(w.raw_dim(), |(i, k)| {
                let (j, _) = source(i);
                w[(j, k)]
            })
        });
        Self { coef, weights }
    }
}

/// Quantity produced from a pair of series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Cross-spectrum (or auto-spectrum for identical inputs).
    Spectrum,
    /// Magnitude-squared coherence and phase.
    Coherence,
    /// Transfer function from the first series to the second.
    TransferFunction,
}

impl FromStr for OutputKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "spec" | "spectrum" => Ok(OutputKind::Spectrum),
            "coh" | "coherence" => Ok(OutputKind::Coherence),
            "transf" | "transfer" => Ok(OutputKind::TransferFunction),
            other => Err(Error::invalid_arg(
                "outp",
                format!("unknown output kind `{other}`; expected `spec`, `coh` or `transf`"),
            )),
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::Spectrum => write!(f, "spec"),
            OutputKind::Coherence => write!(f, "coh"),
            OutputKind::TransferFunction => write!(f, "transf"),
        }
    }
}

/// What the multichannel orchestrator computes beyond per-channel spectra.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    /// Pairwise cross-spectra.
    CrossSpectra,
    /// Pairwise coherences.
    Coherence,
    /// Per-channel spectra only; no pairwise matrix.
    SpectraOnly,
}

impl FromStr for MatrixKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "spec" => Ok(MatrixKind::CrossSpectra),
            "coh" => Ok(MatrixKind::Coherence),
            "justspecs" => Ok(MatrixKind::SpectraOnly),
            other => Err(Error::invalid_arg(
                "outp",
                format!("unknown matrix output `{other}`; expected `spec`, `coh` or `justspecs`"),
            )),
        }
    }
}

/// Time-domain quantity derived from a spectral result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CovarianceKind {
    /// Cross-covariance.
    Ccvf,
    /// Cross-correlation, normalized to `1` at lag zero.
    Ccf,
}

impl FromStr for CovarianceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ccvf" => Ok(CovarianceKind::Ccvf),
            "ccf" => Ok(CovarianceKind::Ccf),
            other => Err(Error::invalid_arg(
                "typ",
                format!("unknown time-domain kind `{other}`; expected `ccvf` or `ccf`"),
            )),
        }
    }
}

/// Frequency offset between the two series of a cross estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FrequencyOffset {
    /// No offset.
    #[default]
    None,
    /// Offset already expressed in bins.
    Bins(isize),
    /// Offset in physical frequency units, rounded to the nearest bin.
    Hertz(f64),
}

/// Per-call options of the cross-spectral engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CrossOptions {
    /// Offset applied to the first series.
    pub offset: FrequencyOffset,
    /// Bin groups to run the T² line test on.
    pub tsq: Option<Vec<Vec<usize>>>,
}
