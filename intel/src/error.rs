use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntelError {
    #[error("HTTP request to intel source failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from intel source: {0}")]
    InvalidResponse(String),

    #[error("intel source unreachable: {0}")]
    Unreachable(String),

    #[error("intel source timed out after {0} ms")]
    Timeout(u64),

    #[error("invalid intel source configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}
