use core::fmt;

use mtspec_core::Error;

/// Validation errors raised at kernel construction or adapter binding time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required input or configuration field is empty.
    EmptyInput {
        /// Name of the argument that is empty.
        arg: &'static str,
    },
    /// A configuration argument value is invalid.
    InvalidArgument {
        /// Name of the argument.
        arg: &'static str,
        /// Human readable reason.
        reason: &'static str,
    },
    /// A contiguous view could not be obtained.
    NonContiguous {
        /// Name of the argument that is non-contiguous.
        arg: &'static str,
    },
    /// Supplied tapers do not match the configured shape.
    TaperShape {
        /// Rows (series length) required.
        expected_len: usize,
        /// Columns (taper count) required.
        expected_k: usize,
        /// Rows received.
        got_len: usize,
        /// Columns received.
        got_k: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyInput { arg } => write!(f, "Input `{arg}` was empty."),
            ConfigError::InvalidArgument { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            ConfigError::NonContiguous { arg } => {
                write!(f, "Argument `{arg}` is not contiguous in memory.")
            }
            ConfigError::TaperShape {
                expected_len,
                expected_k,
                got_len,
                got_k,
            } => write!(
                f,
                "Taper matrix must be {expected_len}x{expected_k}, got {got_len}x{got_k}."
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(value: ConfigError) -> Self {
        match value {
            ConfigError::EmptyInput { arg } => Error::invalid_arg(arg, "input was empty"),
            ConfigError::InvalidArgument { arg, reason } => Error::invalid_arg(arg, reason),
            ConfigError::NonContiguous { arg } => {
                Error::invalid_arg(arg, "input is not contiguous in memory")
            }
            ConfigError::TaperShape {
                expected_len,
                got_len,
                ..
            } if expected_len != got_len => Error::length_mismatch("tapers", expected_len, got_len),
            ConfigError::TaperShape {
                expected_k, got_k, ..
            } => Error::length_mismatch("tapers.k", expected_k, got_k),
        }
    }
}

/// Shared `try_new` checks for the spectral parameters every kernel carries.
pub(crate) fn check_spectral_params(nw: f64, k: usize, dt: f64) -> Result<(), ConfigError> {
    if !nw.is_finite() || nw <= 0.0 {
        return Err(ConfigError::InvalidArgument {
            arg: "nw",
            reason: "time-bandwidth product must be finite and > 0",
        });
    }
    if k == 0 {
        return Err(ConfigError::InvalidArgument {
            arg: "k",
            reason: "at least one taper is required",
        });
    }
    if !dt.is_finite() || dt <= 0.0 {
        return Err(ConfigError::InvalidArgument {
            arg: "dt",
            reason: "sampling interval must be finite and > 0",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taper_shape_maps_to_length_mismatch() {
        let err: Error = ConfigError::TaperShape {
            expected_len: 64,
            expected_k: 4,
            got_len: 32,
            got_k: 4,
        }
        .into();
        assert_eq!(err, Error::length_mismatch("tapers", 64, 32));
    }

    #[test]
    fn spectral_params_reject_nonpositive_values() {
        assert!(check_spectral_params(0.0, 4, 1.0).is_err());
        assert!(check_spectral_params(4.0, 0, 1.0).is_err());
        assert!(check_spectral_params(4.0, 4, f64::NAN).is_err());
        assert!(check_spectral_params(4.0, 7, 0.5).is_ok());
    }
}
