//! Nullable chain observer: fixed observations or a dead endpoint.

use async_trait::async_trait;
use safereg_privacy::{ChainObserver, ObservationError};
use safereg_types::Address;

pub struct NullChainObserver {
    observation: Option<(u64, f64, bool)>,
}

impl NullChainObserver {
    /// Every address reports these observations.
    pub fn new(tx_count: u64, balance: f64, is_contract: bool) -> Self {
        Self {
            observation: Some((tx_count, balance, is_contract)),
        }
    }

    /// Every observation fails as unreachable.
    pub fn failing() -> Self {
        Self { observation: None }
    }

    fn get(&self) -> Result<(u64, f64, bool), ObservationError> {
        self.observation
            .ok_or_else(|| ObservationError::Unreachable("null chain is offline".into()))
    }
}

#[async_trait]
impl ChainObserver for NullChainObserver {
    async fn transaction_count(&self, _: &Address) -> Result<u64, ObservationError> {
        Ok(self.get()?.0)
    }

    async fn balance(&self, _: &Address) -> Result<f64, ObservationError> {
        Ok(self.get()?.1)
    }

    async fn is_contract(&self, _: &Address) -> Result<bool, ObservationError> {
        Ok(self.get()?.2)
    }
}
