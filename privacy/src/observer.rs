//! Read-only chain observations used by the privacy engine.

use async_trait::async_trait;
use safereg_types::Address;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObservationError {
    #[error("chain endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("chain observation timed out")]
    Timeout,

    #[error("invalid response from chain endpoint: {0}")]
    InvalidResponse(String),
}

/// Primitive account observations.
#[async_trait]
pub trait ChainObserver: Send + Sync {
    /// Number of transactions sent by the address.
    async fn transaction_count(&self, address: &Address) -> Result<u64, ObservationError>;

    /// Current balance in whole native-currency units.
    async fn balance(&self, address: &Address) -> Result<f64, ObservationError>;

    /// Whether the address holds executable code.
    async fn is_contract(&self, address: &Address) -> Result<bool, ObservationError>;
}
