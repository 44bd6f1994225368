//! Error types for Cesta operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Cesta operations.
///
/// Covers invalid training/lookup hyperparameters and every failure mode
/// of the persisted model artifact (I/O, format, version, checksum).
///
/// # Examples
///
/// ```
/// use cesta::error::CestaError;
///
/// let err = CestaError::InvalidHyperparameter {
///     param: "min_support".to_string(),
///     value: "0.0".to_string(),
///     constraint: "in (0, 1]".to_string(),
/// };
/// assert!(err.to_string().contains("min_support"));
/// ```
#[derive(Debug)]
pub enum CestaError {
    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),

    /// Invalid or corrupt artifact format.
    FormatError {
        /// Error description
        message: String,
    },

    /// Unsupported artifact format version.
    UnsupportedVersion {
        /// Version found
        found: (u8, u8),
        /// Maximum supported version
        supported: (u8, u8),
    },

    /// Checksum verification failed.
    ChecksumMismatch {
        /// Expected checksum
        expected: u32,
        /// Actual checksum
        actual: u32,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for CestaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CestaError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            CestaError::Io(e) => write!(f, "I/O error: {e}"),
            CestaError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            CestaError::FormatError { message } => {
                write!(f, "Invalid artifact format: {message}")
            }
            CestaError::UnsupportedVersion { found, supported } => {
                write!(
                    f,
                    "Unsupported artifact version: found {}.{}, max supported {}.{}",
                    found.0, found.1, supported.0, supported.1
                )
            }
            CestaError::ChecksumMismatch { expected, actual } => {
                write!(
                    f,
                    "Checksum mismatch: expected 0x{expected:08X}, got 0x{actual:08X}"
                )
            }
            CestaError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CestaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CestaError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CestaError {
    fn from(err: std::io::Error) -> Self {
        CestaError::Io(err)
    }
}

impl From<&str> for CestaError {
    fn from(msg: &str) -> Self {
        CestaError::Other(msg.to_string())
    }
}

impl From<String> for CestaError {
    fn from(msg: String) -> Self {
        CestaError::Other(msg)
    }
}

impl CestaError {
    /// Create an invalid hyperparameter error with descriptive context.
    #[must_use]
    pub fn invalid_hyperparameter(param: &str, value: impl fmt::Display, constraint: &str) -> Self {
        Self::InvalidHyperparameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, CestaError>;
