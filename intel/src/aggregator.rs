//! Fan-out over all configured sources.

use crate::client::HttpIntelSource;
use crate::error::IntelError;
use crate::source::ThreatIntelSource;
use crate::types::SourceConfig;

use safereg_types::{Address, Degradation, ExternalFlag, ExternalFlags, Sourced};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default upper bound for a single source lookup.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(5);

/// Queries an ordered list of sources, isolating failures per source.
pub struct FlagAggregator {
    sources: Vec<Arc<dyn ThreatIntelSource>>,
    timeout: Duration,
}

impl FlagAggregator {
    pub fn new(sources: Vec<Arc<dyn ThreatIntelSource>>, timeout: Duration) -> Self {
        Self { sources, timeout }
    }

    /// An aggregator with no sources.
    pub fn empty() -> Self {
        Self::new(Vec::new(), DEFAULT_SOURCE_TIMEOUT)
    }

    /// Build HTTP sources for every enabled entry, keeping config order.
    pub fn from_config(configs: &[SourceConfig], timeout: Duration) -> Result<Self, IntelError> {
        let mut sources: Vec<Arc<dyn ThreatIntelSource>> = Vec::with_capacity(configs.len());
        for config in configs.iter().filter(|c| c.enabled) {
            sources.push(Arc::new(HttpIntelSource::with_timeout(config, timeout)?));
        }
        Ok(Self::new(sources, timeout))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Query every source concurrently.
    ///
    /// Results come back in source order. A source that errors, times out,
    /// or panics yields a degraded "not flagged" entry.
    pub async fn check_all(&self, address: &Address) -> Vec<Sourced<ExternalFlag>> {
        let mut handles = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let source = Arc::clone(source);
            let address = *address;
            let timeout = self.timeout;
            handles.push(tokio::spawn(async move {
                match tokio::time::timeout(timeout, source.check_address(&address)).await {
                    Ok(result) => result,
                    Err(_) => Err(IntelError::Timeout(timeout.as_millis() as u64)),
                }
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (source, handle) in self.sources.iter().zip(handles) {
            let name = source.name();
            let outcome = match handle.await {
                Ok(result) => result,
                Err(e) => Err(IntelError::Other(format!("task join error: {e}"))),
            };
            match outcome {
                Ok(verdict) => {
                    debug!(source = name, flagged = verdict.flagged, "intel source answered");
                    results.push(Sourced::Fresh(verdict.into_flag(name)));
                }
                Err(e) => {
                    warn!(source = name, address = %address, error = %e, "intel source skipped");
                    results.push(Sourced::degraded(ExternalFlag::clear(name), e.to_string()));
                }
            }
        }
        results
    }

    /// Per-source flags and the flagged count.
    pub async fn aggregate(&self, address: &Address) -> ExternalFlags {
        summarize(self.check_all(address).await).0
    }
}

/// Collapse tagged per-source results into flags plus degradation records.
pub fn summarize(results: Vec<Sourced<ExternalFlag>>) -> (ExternalFlags, Vec<Degradation>) {
    let mut degradations = Vec::new();
    let flags = results
        .into_iter()
        .map(|result| match result {
            Sourced::Fresh(flag) => flag,
            Sourced::Degraded { value, reason } => {
                degradations.push(Degradation::SourceDegraded {
                    source: value.source.clone(),
                    reason,
                });
                value
            }
        })
        .collect();
    (ExternalFlags::from_sources(flags), degradations)
}
