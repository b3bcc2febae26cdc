use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry transport error: {0}")]
    Transport(String),

    #[error("registry call timed out")]
    Timeout,

    #[error("registry call reverted: {0}")]
    Reverted(String),

    #[error("failed to decode registry response: {0}")]
    Decode(String),

    #[error("registry configuration error: {0}")]
    Config(String),
}
