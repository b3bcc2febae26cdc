use safereg_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssessorError {
    /// Malformed input, rejected before any I/O.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The registry could not be reached; no assessment can be produced.
    #[error("registry unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("report {0} not found")]
    ReportNotFound(u64),

    #[error("invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("config error: {0}")]
    Config(String),
}

impl From<TypesError> for AssessorError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::InvalidAddress(msg) => AssessorError::InvalidAddress(msg),
            other => AssessorError::InvalidSubmission(other.to_string()),
        }
    }
}
