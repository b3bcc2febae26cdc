//! Nullable registry: thread-safe in-memory report registry for testing.

use async_trait::async_trait;
use safereg_registry::{AddressStatus, PrivacyAnalysis, RegistryClient, RegistryError};
use safereg_types::{Address, PrivacyFactors, Report};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Everything the registry knows about one address.
#[derive(Clone, Debug, PartialEq)]
pub struct AccountFixture {
    pub is_flagged: bool,
    /// In assignment order (oldest first).
    pub report_ids: Vec<u64>,
    pub risk_score: u64,
    pub privacy: PrivacyAnalysis,
}

impl Default for AccountFixture {
    /// What the registry returns for an address nobody has reported.
    fn default() -> Self {
        Self {
            is_flagged: false,
            report_ids: Vec::new(),
            risk_score: 0,
            privacy: PrivacyAnalysis {
                score: 100,
                grade_code: 0,
                factors: PrivacyFactors::default(),
            },
        }
    }
}

/// An in-memory registry.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullRegistry {
    accounts: Mutex<HashMap<Address, AccountFixture>>,
    reports: Mutex<HashMap<u64, Report>>,
    failing_reports: Mutex<HashSet<u64>>,
    grade_labels: Mutex<HashMap<u8, String>>,
    report_total: AtomicU64,
    offline: AtomicBool,
    delay: Mutex<Option<Duration>>,
    check_calls: AtomicU64,
}

impl NullRegistry {
    pub fn new() -> Self {
        let grade_labels = ["A", "B", "C", "D", "F"]
            .iter()
            .enumerate()
            .map(|(code, label)| (code as u8, label.to_string()))
            .collect();
        Self {
            accounts: Mutex::new(HashMap::new()),
            reports: Mutex::new(HashMap::new()),
            failing_reports: Mutex::new(HashSet::new()),
            grade_labels: Mutex::new(grade_labels),
            report_total: AtomicU64::new(0),
            offline: AtomicBool::new(false),
            delay: Mutex::new(None),
            check_calls: AtomicU64::new(0),
        }
    }

    pub fn add_account(&self, address: Address, fixture: AccountFixture) {
        self.accounts.lock().unwrap().insert(address, fixture);
    }

    /// Store a report; the registry total grows to cover its id.
    pub fn add_report(&self, report: Report) {
        self.report_total.fetch_max(report.id + 1, Ordering::SeqCst);
        self.reports.lock().unwrap().insert(report.id, report);
    }

    /// Make `getReport(id)` revert. The id still counts toward the total.
    pub fn fail_report(&self, id: u64) {
        self.report_total.fetch_max(id + 1, Ordering::SeqCst);
        self.failing_reports.lock().unwrap().insert(id);
    }

    pub fn set_grade_label(&self, code: u8, label: &str) {
        self.grade_labels
            .lock()
            .unwrap()
            .insert(code, label.to_string());
    }

    /// While offline every call fails with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Delay every call by `delay` (tokio time).
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Number of `checkAddress` calls served so far.
    pub fn check_calls(&self) -> u64 {
        self.check_calls.load(Ordering::SeqCst)
    }

    async fn gate(&self) -> Result<(), RegistryError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(RegistryError::Transport("null registry is offline".into()));
        }
        Ok(())
    }

    fn account(&self, address: &Address) -> AccountFixture {
        self.accounts
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for NullRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryClient for NullRegistry {
    async fn check_address(&self, address: &Address) -> Result<AddressStatus, RegistryError> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        let account = self.account(address);
        Ok(AddressStatus {
            is_flagged: account.is_flagged,
            report_ids: account.report_ids,
        })
    }

    async fn risk_score(&self, address: &Address) -> Result<u64, RegistryError> {
        self.gate().await?;
        Ok(self.account(address).risk_score)
    }

    async fn privacy_analysis(&self, address: &Address) -> Result<PrivacyAnalysis, RegistryError> {
        self.gate().await?;
        Ok(self.account(address).privacy)
    }

    async fn grade_label(&self, grade_code: u8) -> Result<String, RegistryError> {
        self.gate().await?;
        Ok(self
            .grade_labels
            .lock()
            .unwrap()
            .get(&grade_code)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string()))
    }

    async fn report(&self, id: u64) -> Result<Report, RegistryError> {
        self.gate().await?;
        if self.failing_reports.lock().unwrap().contains(&id) {
            return Err(RegistryError::Reverted(format!("getReport({id})")));
        }
        self.reports
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| RegistryError::Reverted(format!("getReport({id}): no such report")))
    }

    async fn report_count(&self) -> Result<u64, RegistryError> {
        self.gate().await?;
        Ok(self.report_total.load(Ordering::SeqCst))
    }
}
