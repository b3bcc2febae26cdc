//! The assessment orchestrator.
//!
//! Composes the registry, the privacy engine, and the threat-intel aggregator
//! into one [`Assessment`] per address. Only two failures escape [`Assessor::check`]:
//! a malformed address and an unreachable registry. Everything else is
//! recovered locally and recorded as a [`Degradation`].

use futures_util::future::join_all;
use safereg_intel::{summarize, FlagAggregator};
use safereg_privacy::{recommendations, PrivacyEngine};
use safereg_registry::{RegistryClient, RegistryError};
use safereg_types::{
    Address, Assessment, Clock, Degradation, PrivacyGrade, PrivacyReport, Report, Sourced,
    SystemClock,
};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::cache::{cache_key, AssessmentCache};
use crate::metrics::AssessorMetrics;
use crate::single_flight::{Flight, SingleFlight};
use crate::submission::{plan_submission, SubmissionPlan, SubmissionRequest};
use crate::AssessorError;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;
pub const DEFAULT_REGISTRY_TIMEOUT: Duration = Duration::from_secs(10);

/// An assessment and whether it was served from cache.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckResult {
    pub assessment: Assessment,
    pub cached: bool,
}

/// One page of the newest registry reports.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportPage {
    /// Newest first. May be shorter than `limit` if some lookups failed.
    pub reports: Vec<Report>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

pub struct Assessor {
    registry: Arc<dyn RegistryClient>,
    privacy: PrivacyEngine,
    intel: FlagAggregator,
    cache: Arc<dyn AssessmentCache>,
    clock: Arc<dyn Clock>,
    flights: Option<SingleFlight<Result<CheckResult, AssessorError>>>,
    registry_timeout: Duration,
    metrics: Arc<AssessorMetrics>,
    registry_address: Option<Address>,
}

impl Assessor {
    pub fn new(
        registry: Arc<dyn RegistryClient>,
        privacy: PrivacyEngine,
        intel: FlagAggregator,
        cache: Arc<dyn AssessmentCache>,
    ) -> Self {
        Self {
            registry,
            privacy,
            intel,
            cache,
            clock: Arc::new(SystemClock),
            flights: None,
            registry_timeout: DEFAULT_REGISTRY_TIMEOUT,
            metrics: Arc::new(AssessorMetrics::new()),
            registry_address: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Collapse concurrent cache misses for the same address into one build.
    ///
    /// Callers that join an in-flight build receive its result, failures
    /// included.
    #[must_use]
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.flights = enabled.then(SingleFlight::new);
        self
    }

    #[must_use]
    pub fn with_registry_timeout(mut self, timeout: Duration) -> Self {
        self.registry_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<AssessorMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Registry contract that submissions are addressed to.
    #[must_use]
    pub fn with_registry_address(mut self, address: Address) -> Self {
        self.registry_address = Some(address);
        self
    }

    pub fn metrics(&self) -> &Arc<AssessorMetrics> {
        &self.metrics
    }

    pub fn registry_address(&self) -> Option<Address> {
        self.registry_address
    }

    /// Assess `raw`, serving from cache when a live entry exists.
    #[instrument(skip(self, raw), fields(address = %raw.trim()))]
    pub async fn check(&self, raw: &str) -> Result<CheckResult, AssessorError> {
        let address = Address::parse(raw)?;
        let key = cache_key(&address);

        if let Some(result) = self.cached(&key) {
            return Ok(result);
        }

        match &self.flights {
            Some(flights) => {
                let (result, flight) = flights
                    .run(&key, || async {
                        // A flight that landed since our lookup may have filled the entry.
                        if let Some(result) = self.cached(&key) {
                            return Ok(result);
                        }
                        self.build_and_store(&address, &key).await
                    })
                    .await;
                match flight {
                    Flight::Led => result,
                    Flight::Joined => {
                        debug!(key = %key, "joined in-flight assessment");
                        result.map(|r| CheckResult {
                            cached: true,
                            ..r
                        })
                    }
                }
            }
            None => self.build_and_store(&address, &key).await,
        }
    }

    /// [`check`](Self::check) without the cache marker.
    pub async fn assess(&self, raw: &str) -> Result<Assessment, AssessorError> {
        self.check(raw).await.map(|r| r.assessment)
    }

    fn cached(&self, key: &str) -> Option<CheckResult> {
        let assessment = self.cache.get(key)?;
        self.metrics.cache_hits.inc();
        debug!(key, "assessment cache hit");
        Some(CheckResult {
            assessment,
            cached: true,
        })
    }

    async fn build_and_store(
        &self,
        address: &Address,
        key: &str,
    ) -> Result<CheckResult, AssessorError> {
        self.metrics.cache_misses.inc();
        let started = Instant::now();

        let assessment = self.build(address).await?;

        self.metrics
            .build_time_ms
            .observe(started.elapsed().as_secs_f64() * 1000.0);
        self.metrics.assessments_built.inc();
        info!(
            is_flagged = assessment.is_flagged,
            risk_score = assessment.risk_score,
            report_count = assessment.report_count,
            degraded = assessment.is_degraded(),
            degradations = assessment.degradations.len(),
            "assessment built"
        );

        self.cache.set(key, assessment.clone());
        Ok(CheckResult {
            assessment,
            cached: false,
        })
    }

    async fn build(&self, address: &Address) -> Result<Assessment, AssessorError> {
        let (status, risk_score, analysis) = tokio::try_join!(
            self.bounded(self.registry.check_address(address)),
            self.bounded(self.registry.risk_score(address)),
            self.bounded(self.registry.privacy_analysis(address)),
        )
        .map_err(|e| self.upstream(e))?;

        let registry_label = self
            .bounded(self.registry.grade_label(analysis.grade_code))
            .await
            .map_err(|e| self.upstream(e))?;

        let privacy_score = clamp_score(analysis.score);
        let privacy_grade = PrivacyGrade::from_score(privacy_score);
        let mut degradations = Vec::new();

        if registry_label.parse::<PrivacyGrade>().ok() != Some(privacy_grade) {
            warn!(
                registry_label = %registry_label,
                derived = %privacy_grade,
                "registry grade disagrees with score, using derived grade"
            );
            degradations.push(Degradation::GradeMismatch {
                registry_label,
                derived: privacy_grade,
            });
        }

        let ((reports, report_losses), flag_results) = tokio::join!(
            self.resolve_reports(&status.report_ids),
            self.intel.check_all(address),
        );
        let (external_flags, source_losses) = summarize(flag_results);
        self.metrics
            .sources_degraded
            .inc_by(source_losses.len() as u64);
        degradations.extend(report_losses);
        degradations.extend(source_losses);

        Ok(Assessment {
            address: *address,
            is_flagged: status.is_flagged,
            risk_score: clamp_score(risk_score),
            privacy_score,
            privacy_grade,
            privacy_recommendations: recommendations(privacy_score, &analysis.factors),
            privacy_factors: analysis.factors,
            report_count: reports.len(),
            reports,
            external_flags,
            timestamp: self.clock.now(),
            degradations,
        })
    }

    /// Resolve `ids` (assignment order) newest first, skipping failures.
    async fn resolve_reports(&self, ids: &[u64]) -> (Vec<Report>, Vec<Degradation>) {
        let lookups = ids.iter().rev().map(|&id| async move {
            (id, self.bounded(self.registry.report(id)).await)
        });

        let mut reports = Vec::with_capacity(ids.len());
        let mut losses = Vec::new();
        for (id, result) in join_all(lookups).await {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    warn!(report_id = id, error = %e, "report lookup failed, skipping");
                    losses.push(Degradation::PartialReportLoss {
                        report_id: id,
                        reason: e.to_string(),
                    });
                }
            }
        }
        self.metrics.reports_skipped.inc_by(losses.len() as u64);
        (reports, losses)
    }

    /// Off-chain privacy analysis from raw chain observations.
    ///
    /// Uses the registry's report count for the address as public scrutiny.
    /// Fails only on a malformed address.
    pub async fn privacy(&self, raw: &str) -> Result<Sourced<PrivacyReport>, AssessorError> {
        let address = Address::parse(raw)?;

        let report_count = match self.bounded(self.registry.check_address(&address)).await {
            Ok(status) => status.report_ids.len() as u64,
            Err(e) => {
                warn!(address = %address, error = %e, "registry unavailable, using privacy defaults");
                self.metrics.privacy_fallbacks.inc();
                return Ok(Sourced::degraded(PrivacyReport::fallback(), e.to_string()));
            }
        };

        let result = self.privacy.analyze(&address, report_count).await;
        if result.is_degraded() {
            self.metrics.privacy_fallbacks.inc();
        }
        Ok(result)
    }

    /// The newest reports across the whole registry.
    ///
    /// `limit` defaults to [`DEFAULT_PAGE_SIZE`] and is clamped to
    /// `1..=MAX_PAGE_SIZE`.
    pub async fn recent_reports(
        &self,
        limit: Option<u64>,
        offset: u64,
    ) -> Result<ReportPage, AssessorError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let total = self
            .bounded(self.registry.report_count())
            .await
            .map_err(|e| self.upstream(e))?;

        let reports = if offset >= total {
            Vec::new()
        } else {
            let newest = total - offset - 1;
            let oldest = total.saturating_sub(offset.saturating_add(limit));
            let ids: Vec<u64> = (oldest..=newest).collect();
            self.resolve_reports(&ids).await.0
        };

        Ok(ReportPage {
            reports,
            total,
            limit,
            offset,
        })
    }

    /// A single report by id.
    pub async fn report(&self, id: u64) -> Result<Report, AssessorError> {
        match self.bounded(self.registry.report(id)).await {
            // An unassigned id reads back as an all-zero record.
            Ok(report) if report.reporter.is_zero() => Err(AssessorError::ReportNotFound(id)),
            Ok(report) => Ok(report),
            Err(RegistryError::Reverted(_)) | Err(RegistryError::Decode(_)) => {
                Err(AssessorError::ReportNotFound(id))
            }
            Err(e) => Err(self.upstream(e)),
        }
    }

    /// Validate a report and shape the registry call a wallet should sign.
    pub fn prepare_submission(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionPlan, AssessorError> {
        let contract = self.registry_address.ok_or_else(|| {
            AssessorError::Config("registry address is not configured".to_string())
        })?;
        plan_submission(contract, request)
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, RegistryError>>,
    ) -> Result<T, RegistryError> {
        match tokio::time::timeout(self.registry_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(RegistryError::Timeout),
        }
    }

    fn upstream(&self, e: RegistryError) -> AssessorError {
        warn!(error = %e, "registry unavailable");
        self.metrics.upstream_failures.inc();
        AssessorError::UpstreamUnavailable(e.to_string())
    }
}

fn clamp_score(raw: u64) -> u8 {
    raw.min(100) as u8
}
