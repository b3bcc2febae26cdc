//! Prometheus metrics for the assessment service.
//!
//! Counts cache behaviour, assessment outcomes, and every locally recovered
//! failure.  The [`AssessorMetrics`] struct owns a dedicated [`Registry`] that
//! the RPC `/metrics` endpoint encodes into the Prometheus text format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry, Encoder, Histogram,
    HistogramOpts, IntCounter, Opts, Registry, TextEncoder,
};

/// Central collection of all assessor-level Prometheus metrics.
pub struct AssessorMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Assessments built from upstream data (cache misses that succeeded).
    pub assessments_built: IntCounter,
    pub cache_hits: IntCounter,
    pub cache_misses: IntCounter,
    /// Checks that failed because the registry was unreachable.
    pub upstream_failures: IntCounter,
    /// External sources read as "not flagged" after failing.
    pub sources_degraded: IntCounter,
    /// Reports omitted after their lookup failed.
    pub reports_skipped: IntCounter,
    /// Privacy analyses that fell back to the default report.
    pub privacy_fallbacks: IntCounter,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Time spent building an assessment on a cache miss, in milliseconds.
    pub build_time_ms: Histogram,
}

impl AssessorMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let assessments_built = register_int_counter_with_registry!(
            Opts::new(
                "safereg_assessments_built_total",
                "Total assessments built from upstream data"
            ),
            registry
        )
        .expect("failed to register assessments_built counter");

        let cache_hits = register_int_counter_with_registry!(
            Opts::new("safereg_cache_hits_total", "Total assessment cache hits"),
            registry
        )
        .expect("failed to register cache_hits counter");

        let cache_misses = register_int_counter_with_registry!(
            Opts::new("safereg_cache_misses_total", "Total assessment cache misses"),
            registry
        )
        .expect("failed to register cache_misses counter");

        let upstream_failures = register_int_counter_with_registry!(
            Opts::new(
                "safereg_upstream_failures_total",
                "Total checks failed because the registry was unavailable"
            ),
            registry
        )
        .expect("failed to register upstream_failures counter");

        let sources_degraded = register_int_counter_with_registry!(
            Opts::new(
                "safereg_sources_degraded_total",
                "Total external source lookups that failed open"
            ),
            registry
        )
        .expect("failed to register sources_degraded counter");

        let reports_skipped = register_int_counter_with_registry!(
            Opts::new(
                "safereg_reports_skipped_total",
                "Total report lookups that failed and were omitted"
            ),
            registry
        )
        .expect("failed to register reports_skipped counter");

        let privacy_fallbacks = register_int_counter_with_registry!(
            Opts::new(
                "safereg_privacy_fallbacks_total",
                "Total privacy analyses that used the default report"
            ),
            registry
        )
        .expect("failed to register privacy_fallbacks counter");

        // Exponential buckets covering 1 ms → ~16 s.
        let build_time_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "safereg_build_time_ms",
                "Assessment build time in milliseconds"
            )
            .buckets(
                prometheus::exponential_buckets(1.0, 2.0, 15)
                    .expect("static bucket parameters are valid")
            ),
            registry
        )
        .expect("failed to register build_time_ms histogram");

        Self {
            registry,
            assessments_built,
            cache_hits,
            cache_misses,
            upstream_failures,
            sources_degraded,
            reports_skipped,
            privacy_fallbacks,
            build_time_ms,
        }
    }

    /// Encode every metric in the Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            tracing::warn!(error = %e, "failed to encode metrics");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl Default for AssessorMetrics {
    fn default() -> Self {
        Self::new()
    }
}
