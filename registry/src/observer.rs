//! Chain observations over Ethereum JSON-RPC.

use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider, ProviderError};
use safereg_privacy::{ChainObserver, ObservationError};
use safereg_types::Address;
use std::sync::Arc;

use crate::abi::{saturating_u64, to_h160};

pub struct EthChainObserver {
    provider: Arc<Provider<Http>>,
}

impl EthChainObserver {
    pub fn new(provider: Arc<Provider<Http>>) -> Self {
        Self { provider }
    }
}

fn unreachable(e: ProviderError) -> ObservationError {
    ObservationError::Unreachable(e.to_string())
}

#[async_trait]
impl ChainObserver for EthChainObserver {
    async fn transaction_count(&self, address: &Address) -> Result<u64, ObservationError> {
        let nonce = self
            .provider
            .get_transaction_count(to_h160(address), None)
            .await
            .map_err(unreachable)?;
        Ok(saturating_u64(nonce))
    }

    async fn balance(&self, address: &Address) -> Result<f64, ObservationError> {
        let wei = self
            .provider
            .get_balance(to_h160(address), None)
            .await
            .map_err(unreachable)?;
        ethers::utils::format_ether(wei)
            .parse::<f64>()
            .map_err(|e| ObservationError::InvalidResponse(format!("balance: {e}")))
    }

    async fn is_contract(&self, address: &Address) -> Result<bool, ObservationError> {
        let code = self
            .provider
            .get_code(to_h160(address), None)
            .await
            .map_err(unreachable)?;
        Ok(!code.is_empty())
    }
}
