use core::{error, fmt};

/// Errors raised whilst running mtspec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Argument passed into a function was invalid.
    InvalidArg {
        /// The invalid arg
        arg: String,
        /// Explaining why arg is invalid.
        reason: String,
    },
    /// Two inputs that must agree in length did not.
    LengthMismatch {
        /// Name of the offending argument.
        arg: String,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
    /// A T² bin group is larger than twice the number of tapers can support.
    InsufficientTapers {
        /// Number of bins in the offending group.
        group_len: usize,
        /// Number of tapers configured.
        tapers: usize,
    },
    /// The requested operation is not defined for the given input.
    Unsupported {
        /// Explaining why the operation is unsupported.
        reason: String,
    },
    /// A linear-algebra routine failed to produce a result.
    Numerical {
        /// Message from the failing routine.
        reason: String,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidArg`].
    pub fn invalid_arg(arg: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidArg {
            arg: arg.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::LengthMismatch`].
    pub fn length_mismatch(arg: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::LengthMismatch {
            arg: arg.into(),
            expected,
            got,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArg { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            Error::LengthMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Length mismatch on `{arg}`. Expected {expected}, got {got}."
                )
            }
            Error::InsufficientTapers { group_len, tapers } => write!(
                f,
                "Insufficient tapers: a group of {group_len} bins needs at least {needed} tapers, \
                 got {tapers}.",
                needed = group_len.div_ceil(2)
            ),
            Error::Unsupported { reason } => write!(f, "Unsupported operation: {reason}"),
            Error::Numerical { reason } => write!(f, "Numerical failure: {reason}"),
        }
    }
}

impl error::Error for Error {}

/// Result alias used throughout mtspec.
pub type Result<T> = core::result::Result<T, Error>;
