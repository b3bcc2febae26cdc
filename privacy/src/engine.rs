//! Privacy engine: observe the chain, then score.
//!
//! Observation failures never propagate. The engine substitutes
//! [`PrivacyReport::fallback`] and tags the result as degraded so the caller
//! can record it.

use crate::observer::{ChainObserver, ObservationError};
use crate::scoring::evaluate;
use safereg_types::{Address, PrivacyFactors, PrivacyReport, Sourced};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound for the whole set of observations for one address.
pub const DEFAULT_OBSERVATION_TIMEOUT: Duration = Duration::from_secs(10);

pub struct PrivacyEngine {
    observer: Arc<dyn ChainObserver>,
    timeout: Duration,
}

impl PrivacyEngine {
    pub fn new(observer: Arc<dyn ChainObserver>) -> Self {
        Self {
            observer,
            timeout: DEFAULT_OBSERVATION_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Score `address`, using `report_count` as its public-scrutiny factor.
    pub async fn analyze(&self, address: &Address, report_count: u64) -> Sourced<PrivacyReport> {
        match tokio::time::timeout(self.timeout, self.observe(address, report_count)).await {
            Ok(Ok(factors)) => {
                let report = evaluate(factors);
                debug!(
                    address = %address,
                    score = report.score,
                    grade = %report.grade,
                    "privacy score computed"
                );
                Sourced::Fresh(report)
            }
            Ok(Err(e)) => {
                warn!(address = %address, error = %e, "chain observation failed, using privacy defaults");
                Sourced::degraded(PrivacyReport::fallback(), e.to_string())
            }
            Err(_) => {
                warn!(address = %address, "chain observation timed out, using privacy defaults");
                Sourced::degraded(PrivacyReport::fallback(), ObservationError::Timeout.to_string())
            }
        }
    }

    async fn observe(
        &self,
        address: &Address,
        report_count: u64,
    ) -> Result<PrivacyFactors, ObservationError> {
        let (transaction_activity, balance_exposure, is_contract) = tokio::try_join!(
            self.observer.transaction_count(address),
            self.observer.balance(address),
            self.observer.is_contract(address),
        )?;

        Ok(PrivacyFactors {
            transaction_activity,
            balance_exposure: balance_exposure.max(0.0),
            public_scrutiny: report_count,
            address_reuse: 0,
            is_contract,
        })
    }
}
