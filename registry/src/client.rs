//! Registry query trait and its result types.

use async_trait::async_trait;
use safereg_types::{Address, PrivacyFactors, Report};

use crate::RegistryError;

/// Flag status and report ids for one address, in assignment order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddressStatus {
    pub is_flagged: bool,
    pub report_ids: Vec<u64>,
}

/// The registry's own privacy computation for an address.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrivacyAnalysis {
    /// Raw score as reported; callers clamp it.
    pub score: u64,
    /// Ordinal grade, translated with [`RegistryClient::grade_label`].
    pub grade_code: u8,
    pub factors: PrivacyFactors,
}

impl PrivacyAnalysis {
    /// Build from the registry's five-slot factor vector:
    /// `[activity, balance, scrutiny, reuse, is_contract]`.
    pub fn from_raw(score: u64, grade_code: u8, factors: [u64; 5]) -> Self {
        Self {
            score,
            grade_code,
            factors: PrivacyFactors {
                transaction_activity: factors[0],
                balance_exposure: factors[1] as f64,
                public_scrutiny: factors[2],
                address_reuse: factors[3],
                is_contract: factors[4] == 1,
            },
        }
    }
}

/// Read-only view of the report registry.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn check_address(&self, address: &Address) -> Result<AddressStatus, RegistryError>;

    /// Registry-computed risk score (unclamped).
    async fn risk_score(&self, address: &Address) -> Result<u64, RegistryError>;

    async fn privacy_analysis(&self, address: &Address) -> Result<PrivacyAnalysis, RegistryError>;

    /// Human-readable form of a grade ordinal.
    async fn grade_label(&self, grade_code: u8) -> Result<String, RegistryError>;

    async fn report(&self, id: u64) -> Result<Report, RegistryError>;

    /// Total number of reports ever filed; ids run from 0 to `count - 1`.
    async fn report_count(&self) -> Result<u64, RegistryError>;
}
