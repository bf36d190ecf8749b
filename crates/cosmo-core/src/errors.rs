//! Error types for cosmodist.
//!
//! Every fallible operation in the workspace returns [`Result`], whose error
//! side is the single [`Error`] enum below. The [`ensure!`](crate::ensure)
//! and [`fail!`](crate::fail) macros give early returns tagged with one of
//! the enum's message-carrying variants.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// The error type used throughout cosmodist.
///
/// Failures are deterministic functions of the model parameters and the
/// arguments: nothing is retried internally and no partial result is ever
/// returned alongside an error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A cosmological model could not be built from the given parameters
    /// (e.g. `Ω_matter = 0`).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An argument is outside the domain of the operation (negative
    /// redshift, non-bracketing interval, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested feature is not available for this model or parameter
    /// combination (e.g. `w_a ≠ 0`, unknown model tag).
    #[error("unsupported model: {0}")]
    UnsupportedModel(String),

    /// A numerical procedure did not converge or produced a non-finite
    /// value.
    #[error("numerical failure: {0}")]
    NumericalFailure(String),

    /// A table file could not be read or written.
    #[error("I/O failure on {}: {message}", path.display())]
    IoFailure {
        /// The file involved.
        path: PathBuf,
        /// The rendered underlying I/O error.
        message: String,
    },
}

impl Error {
    /// Wrap a [`std::io::Error`] raised while accessing `path`.
    pub fn io(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        Error::IoFailure {
            path: path.as_ref().to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Shorthand `Result` type used throughout cosmodist.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return early with `Err(Error::$kind(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use cosmo_core::{ensure, errors::Error};
/// fn non_negative(z: f64) -> cosmo_core::Result<f64> {
///     ensure!(z >= 0.0, InvalidArgument, "redshift must be >= 0, got {z}");
///     Ok(z)
/// }
/// assert!(non_negative(1.0).is_ok());
/// assert!(matches!(non_negative(-1.0), Err(Error::InvalidArgument(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $kind:ident, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::$kind(format!($($msg)*)));
        }
    };
}

/// Return `Err(Error::$kind(...))` immediately.
///
/// # Example
/// ```
/// use cosmo_core::{fail, errors::Error};
/// fn always_err() -> cosmo_core::Result<()> {
///     fail!(UnsupportedModel, "w_a != 0 is not handled");
/// }
/// assert!(matches!(always_err(), Err(Error::UnsupportedModel(_))));
/// ```
#[macro_export]
macro_rules! fail {
    ($kind:ident, $($msg:tt)*) => {
        return Err($crate::errors::Error::$kind(format!($($msg)*)))
    };
}
