//! Taper generation.

mod dpss;

pub use dpss::*;
