//! Shared trait-first kernel substrate.
//!
//! Constructor validation for the estimation kernels and the input adapters
//! that let them read series from slices, vectors, and `ndarray` containers.

mod errors;
mod io;
mod lifecycle;

pub use errors::*;
pub use io::*;
pub use lifecycle::*;
