//! Nullable intel source: canned verdicts, failures, and call counting.

use async_trait::async_trait;
use safereg_intel::{IntelError, SourceVerdict, ThreatIntelSource};
use safereg_types::Address;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct NullIntelSource {
    name: String,
    verdict: Option<SourceVerdict>,
    calls: AtomicU64,
}

impl NullIntelSource {
    /// Flags every address.
    pub fn flagging(name: &str) -> Self {
        Self::with_verdict(
            name,
            SourceVerdict {
                flagged: true,
                details: Some(serde_json::json!({ "category": "phishing" })),
            },
        )
    }

    /// Never flags.
    pub fn clean(name: &str) -> Self {
        Self::with_verdict(name, SourceVerdict::default())
    }

    /// Always fails with an auth error.
    pub fn failing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            verdict: None,
            calls: AtomicU64::new(0),
        }
    }

    pub fn with_verdict(name: &str, verdict: SourceVerdict) -> Self {
        Self {
            name: name.to_string(),
            verdict: Some(verdict),
            calls: AtomicU64::new(0),
        }
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ThreatIntelSource for NullIntelSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check_address(&self, _: &Address) -> Result<SourceVerdict, IntelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.verdict
            .clone()
            .ok_or_else(|| IntelError::RequestFailed("HTTP status 401 Unauthorized".into()))
    }
}
