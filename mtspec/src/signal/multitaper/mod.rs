//! Multitaper spectral estimation.
//!
//! Series are tapered with a shared set of Slepian tapers and transformed
//! once into [`EigenCoefs`]; univariate spectra, cross-spectra, coherence,
//! transfer functions, jackknife statistics and the T² line test are all
//! built from those coefficients. [`MultitaperKernel`] owns the tapers and
//! is the entry point; the free functions build a kernel per call.

mod ccvf;
mod cross;
mod estimate;
mod freq;
pub mod jackknife;
mod multivariate;
mod result;
mod transfer;
mod tsq;
mod types;

pub use ccvf::*;
pub use cross::*;
pub use estimate::{
    auto_spectrum, eigen_coefficients, harmonic_ftest, ADAPTIVE_MAX_ITER, ADAPTIVE_TOL,
};
pub use freq::{freq_to_index, index_to_freq};
pub use multivariate::*;
pub use result::*;
pub use transfer::solve_transfer;
pub use tsq::test_tsq;
pub use types::*;
