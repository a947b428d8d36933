//! Shared error type and numpy-like array helpers for `mtspec`.

#![warn(missing_docs)]

mod error;
pub mod num_rs;

pub use error::{Error, Result};
