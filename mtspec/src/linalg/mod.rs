//! Dense linear algebra helpers over complex eigencoefficient matrices.

mod pinv;

pub use pinv::*;
