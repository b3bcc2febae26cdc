//! Registry client over Ethereum JSON-RPC.

use async_trait::async_trait;
use ethers::abi::{Detokenize, Token, Tokenize};
use ethers::contract::{Contract, ContractError};
use ethers::providers::{Http, Provider};
use ethers::types::U256;
use safereg_types::{Address, Report};
use std::sync::Arc;
use tracing::debug;

use crate::abi::{decode_report, exact_u64, registry_abi, saturating_u64, to_h160};
use crate::{AddressStatus, PrivacyAnalysis, RegistryClient, RegistryError};

/// Build an HTTP JSON-RPC provider for `rpc_url`.
pub fn connect_provider(rpc_url: &str) -> Result<Arc<Provider<Http>>, RegistryError> {
    let provider = Provider::<Http>::try_from(rpc_url)
        .map_err(|e| RegistryError::Config(format!("invalid RPC URL {rpc_url}: {e}")))?;
    Ok(Arc::new(provider))
}

/// The deployed registry contract, queried with `eth_call` only.
pub struct EthRegistry {
    contract: Contract<Provider<Http>>,
}

impl EthRegistry {
    pub fn new(provider: Arc<Provider<Http>>, registry: &Address) -> Result<Self, RegistryError> {
        let contract = Contract::new(to_h160(registry), registry_abi()?, provider);
        Ok(Self { contract })
    }

    async fn call<T, D>(&self, function: &str, args: T) -> Result<D, RegistryError>
    where
        T: Tokenize + Send,
        D: Detokenize + Send + Sync,
    {
        debug!(function, "registry call");
        let call = self
            .contract
            .method::<T, D>(function, args)
            .map_err(|e| RegistryError::Config(format!("{function}: {e}")))?;
        call.call().await.map_err(|e| classify(function, e))
    }
}

fn classify(function: &str, e: ContractError<Provider<Http>>) -> RegistryError {
    if e.is_revert() {
        RegistryError::Reverted(format!("{function}: {e}"))
    } else if matches!(e, ContractError::DetokenizationError(_) | ContractError::DecodingError(_)) {
        RegistryError::Decode(format!("{function}: {e}"))
    } else {
        RegistryError::Transport(format!("{function}: {e}"))
    }
}

#[async_trait]
impl RegistryClient for EthRegistry {
    async fn check_address(&self, address: &Address) -> Result<AddressStatus, RegistryError> {
        let (is_flagged, ids): (bool, Vec<U256>) =
            self.call("checkAddress", to_h160(address)).await?;
        let report_ids = ids
            .into_iter()
            .map(exact_u64)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(AddressStatus {
            is_flagged,
            report_ids,
        })
    }

    async fn risk_score(&self, address: &Address) -> Result<u64, RegistryError> {
        let score: U256 = self.call("calculateRiskScore", to_h160(address)).await?;
        Ok(saturating_u64(score))
    }

    async fn privacy_analysis(&self, address: &Address) -> Result<PrivacyAnalysis, RegistryError> {
        let (score, grade_code, factors): (U256, u8, Vec<U256>) =
            self.call("getPrivacyAnalysis", to_h160(address)).await?;
        let factors: [U256; 5] = factors.try_into().map_err(|f: Vec<U256>| {
            RegistryError::Decode(format!("expected 5 privacy factors, got {}", f.len()))
        })?;
        Ok(PrivacyAnalysis::from_raw(
            saturating_u64(score),
            grade_code,
            factors.map(saturating_u64),
        ))
    }

    async fn grade_label(&self, grade_code: u8) -> Result<String, RegistryError> {
        self.call("getPrivacyGradeString", grade_code).await
    }

    async fn report(&self, id: u64) -> Result<Report, RegistryError> {
        let token: Token = self.call("getReport", U256::from(id)).await?;
        decode_report(id, token)
    }

    async fn report_count(&self) -> Result<u64, RegistryError> {
        let count: U256 = self.call("reportCount", ()).await?;
        Ok(saturating_u64(count))
    }
}
