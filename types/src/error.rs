//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised while constructing or parsing core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("unknown privacy grade: {0}")]
    UnknownGrade(String),
}
