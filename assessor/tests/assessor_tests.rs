//! Integration tests exercising the full assessment pipeline:
//! address → cache → registry → report resolution → intel fan-out → cache.
//!
//! Every collaborator is a nullable, so these run without a chain or network.

use safereg_assessor::{
    Assessor, AssessorError, SubmissionRequest, TtlCache, DEFAULT_CACHE_TTL_SECS,
};
use safereg_intel::{FlagAggregator, ThreatIntelSource, DEFAULT_SOURCE_TIMEOUT};
use safereg_nullables::{AccountFixture, NullChainObserver, NullClock, NullIntelSource, NullRegistry};
use safereg_privacy::PrivacyEngine;
use safereg_registry::PrivacyAnalysis;
use safereg_types::{
    Address, Degradation, PrivacyFactors, PrivacyGrade, PrivacyReport, Report, ReportReason,
    Timestamp, Verdict,
};
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const TARGET: &str = "0xAbCdEf0123456789aBcDeF0123456789AbCdEf01";

fn target() -> Address {
    Address::parse(TARGET).expect("valid address")
}

fn make_report(id: u64, target: Address) -> Report {
    Report {
        id,
        reporter: Address::new([0x11; 20]),
        target,
        alias: None,
        reason: ReportReason::Phishing,
        evidence: format!("phishing kit #{id}"),
        created_at: Timestamp::new(1_000 + id),
        upvotes: id,
        downvotes: 0,
        resolved: false,
    }
}

struct Harness {
    registry: Arc<NullRegistry>,
    clock: Arc<NullClock>,
    cache: Arc<TtlCache>,
    assessor: Assessor,
}

fn harness_with(
    registry: NullRegistry,
    observer: NullChainObserver,
    sources: Vec<Arc<dyn ThreatIntelSource>>,
) -> Harness {
    let registry = Arc::new(registry);
    let clock = Arc::new(NullClock::new(1_700_000_000));
    let cache = Arc::new(TtlCache::new(
        Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        clock.clone(),
    ));
    let assessor = Assessor::new(
        registry.clone(),
        PrivacyEngine::new(Arc::new(observer)),
        FlagAggregator::new(sources, DEFAULT_SOURCE_TIMEOUT),
        cache.clone(),
    )
    .with_clock(clock.clone());
    Harness {
        registry,
        clock,
        cache,
        assessor,
    }
}

fn harness(registry: NullRegistry) -> Harness {
    harness_with(registry, NullChainObserver::new(0, 0.0, false), Vec::new())
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreported_address_is_clear() {
    let h = harness(NullRegistry::new());

    let result = h.assessor.check(TARGET).await.expect("assessment");
    let a = result.assessment;

    assert!(!result.cached);
    assert_eq!(a.address, target());
    assert!(!a.is_flagged);
    assert_eq!(a.risk_score, 0);
    assert_eq!(a.privacy_score, 100);
    assert_eq!(a.privacy_grade, PrivacyGrade::A);
    assert_eq!(a.report_count, 0);
    assert!(a.reports.is_empty());
    assert_eq!(a.external_flags.total_flags, 0);
    assert!(a.degradations.is_empty());
    assert_eq!(a.timestamp, Timestamp::new(1_700_000_000));
    assert_eq!(a.verdict(), Verdict::Clear);
}

#[tokio::test]
async fn flagged_address_carries_reports_newest_first() {
    let registry = NullRegistry::new();
    registry.add_account(
        target(),
        AccountFixture {
            is_flagged: true,
            report_ids: vec![3, 5, 7],
            risk_score: 80,
            ..AccountFixture::default()
        },
    );
    for id in [3, 5, 7] {
        registry.add_report(make_report(id, target()));
    }
    let h = harness(registry);

    let a = h.assessor.assess(TARGET).await.expect("assessment");

    assert!(a.is_flagged);
    assert_eq!(a.risk_score, 80);
    assert_eq!(a.report_count, 3);
    let ids: Vec<u64> = a.reports.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![7, 5, 3]);
    assert_eq!(a.verdict(), Verdict::Blocked);
}

#[tokio::test]
async fn failed_report_is_skipped_not_fatal() {
    let registry = NullRegistry::new();
    registry.add_account(
        target(),
        AccountFixture {
            report_ids: vec![3, 5, 7],
            ..AccountFixture::default()
        },
    );
    registry.add_report(make_report(3, target()));
    registry.add_report(make_report(5, target()));
    registry.fail_report(7);
    let h = harness(registry);

    let a = h.assessor.assess(TARGET).await.expect("assessment");

    assert_eq!(a.report_count, 2);
    let ids: Vec<u64> = a.reports.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![5, 3]);
    assert!(matches!(
        a.degradations.as_slice(),
        [Degradation::PartialReportLoss { report_id: 7, .. }]
    ));
    assert_eq!(h.assessor.metrics().reports_skipped.get(), 1);
}

#[tokio::test]
async fn scores_are_clamped() {
    let registry = NullRegistry::new();
    registry.add_account(
        target(),
        AccountFixture {
            risk_score: 250,
            privacy: PrivacyAnalysis::from_raw(400, 0, [0; 5]),
            ..AccountFixture::default()
        },
    );
    let h = harness(registry);

    let a = h.assessor.assess(TARGET).await.expect("assessment");

    assert_eq!(a.risk_score, 100);
    assert_eq!(a.privacy_score, 100);
    assert_eq!(a.privacy_grade, PrivacyGrade::A);
    assert!(a.degradations.is_empty());
}

#[tokio::test]
async fn moderate_risk_is_caution() {
    let registry = NullRegistry::new();
    registry.add_account(
        target(),
        AccountFixture {
            risk_score: 31,
            ..AccountFixture::default()
        },
    );
    let h = harness(registry);

    let a = h.assessor.assess(TARGET).await.expect("assessment");
    assert_eq!(a.verdict(), Verdict::Caution);
}

#[tokio::test]
async fn registry_privacy_analysis_drives_grade_and_recommendations() {
    let registry = NullRegistry::new();
    registry.add_account(
        target(),
        AccountFixture {
            privacy: PrivacyAnalysis {
                score: 50,
                grade_code: 4,
                factors: PrivacyFactors {
                    transaction_activity: 150,
                    balance_exposure: 2.5,
                    public_scrutiny: 3,
                    address_reuse: 0,
                    is_contract: false,
                },
            },
            ..AccountFixture::default()
        },
    );
    let h = harness(registry);

    let a = h.assessor.assess(TARGET).await.expect("assessment");

    assert_eq!(a.privacy_score, 50);
    assert_eq!(a.privacy_grade, PrivacyGrade::F);
    assert_eq!(a.privacy_factors.transaction_activity, 150);
    assert_eq!(a.privacy_recommendations.len(), 5);
    assert!(a.degradations.is_empty());
}

#[tokio::test]
async fn grade_mismatch_prefers_score_and_is_recorded() {
    let registry = NullRegistry::new();
    registry.add_account(
        target(),
        AccountFixture {
            privacy: PrivacyAnalysis::from_raw(85, 0, [0; 5]),
            ..AccountFixture::default()
        },
    );
    let h = harness(registry);

    let a = h.assessor.assess(TARGET).await.expect("assessment");

    assert_eq!(a.privacy_grade, PrivacyGrade::B);
    assert_eq!(
        a.degradations,
        vec![Degradation::GradeMismatch {
            registry_label: "A".to_string(),
            derived: PrivacyGrade::B,
        }]
    );
}

#[tokio::test]
async fn unknown_grade_label_is_a_mismatch() {
    let registry = NullRegistry::new();
    registry.add_account(
        target(),
        AccountFixture {
            privacy: PrivacyAnalysis::from_raw(95, 9, [0; 5]),
            ..AccountFixture::default()
        },
    );
    let h = harness(registry);

    let a = h.assessor.assess(TARGET).await.expect("assessment");

    assert_eq!(a.privacy_grade, PrivacyGrade::A);
    assert!(matches!(
        a.degradations.as_slice(),
        [Degradation::GradeMismatch { registry_label, .. }] if registry_label == "Unknown"
    ));
}

// ---------------------------------------------------------------------------
// External sources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failing_source_does_not_fail_assessment() {
    let sources: Vec<Arc<dyn ThreatIntelSource>> = vec![
        Arc::new(NullIntelSource::flagging("ChainAbuse")),
        Arc::new(NullIntelSource::failing("ScamSniffer")),
        Arc::new(NullIntelSource::clean("Forta")),
    ];
    let h = harness_with(
        NullRegistry::new(),
        NullChainObserver::new(0, 0.0, false),
        sources,
    );

    let a = h.assessor.assess(TARGET).await.expect("assessment");

    let names: Vec<&str> = a
        .external_flags
        .sources
        .iter()
        .map(|f| f.source.as_str())
        .collect();
    assert_eq!(names, vec!["ChainAbuse", "ScamSniffer", "Forta"]);
    assert_eq!(a.external_flags.total_flags, 1);
    assert!(!a.external_flags.sources[1].flagged);
    assert!(matches!(
        a.degradations.as_slice(),
        [Degradation::SourceDegraded { source, .. }] if source == "ScamSniffer"
    ));
    // External flags never override the registry.
    assert!(!a.is_flagged);
    assert_eq!(h.assessor.metrics().sources_degraded.get(), 1);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_address_is_rejected_before_io() {
    let h = harness(NullRegistry::new());

    for raw in ["", "0x1234", "not an address", "0xZZcdef0123456789abcdef0123456789abcdef01"] {
        let err = h.assessor.check(raw).await.unwrap_err();
        assert!(matches!(err, AssessorError::InvalidAddress(_)), "{raw}: {err:?}");
    }
    assert_eq!(h.registry.check_calls(), 0);
}

#[tokio::test]
async fn offline_registry_is_upstream_unavailable_and_not_cached() {
    let h = harness(NullRegistry::new());
    h.registry.set_offline(true);

    let err = h.assessor.check(TARGET).await.unwrap_err();
    assert!(matches!(err, AssessorError::UpstreamUnavailable(_)));
    assert_eq!(h.assessor.metrics().upstream_failures.get(), 1);

    h.registry.set_offline(false);
    let result = h.assessor.check(TARGET).await.expect("assessment");
    assert!(!result.cached);
}

#[tokio::test(start_paused = true)]
async fn stalled_registry_times_out_as_upstream_unavailable() {
    let h = harness(NullRegistry::new());
    h.registry.set_delay(Duration::from_secs(3600));
    let assessor = h.assessor.with_registry_timeout(Duration::from_secs(2));

    let err = assessor.check(TARGET).await.unwrap_err();
    assert!(matches!(err, AssessorError::UpstreamUnavailable(_)));
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_check_within_ttl_is_served_from_cache() {
    let h = harness(NullRegistry::new());

    let first = h.assessor.check(TARGET).await.expect("first");
    h.clock.advance(DEFAULT_CACHE_TTL_SECS - 1);
    let second = h.assessor.check(TARGET).await.expect("second");

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(first.assessment, second.assessment);
    assert_eq!(
        serde_json::to_vec(&first.assessment).unwrap(),
        serde_json::to_vec(&second.assessment).unwrap()
    );
    assert_eq!(h.registry.check_calls(), 1);
    assert_eq!(h.assessor.metrics().cache_hits.get(), 1);
    assert_eq!(h.assessor.metrics().cache_misses.get(), 1);
}

#[tokio::test]
async fn cache_key_ignores_address_case() {
    let h = harness(NullRegistry::new());

    h.assessor.check(TARGET).await.expect("mixed case");
    let lower = h.assessor.check(&TARGET.to_lowercase()).await.expect("lower");
    let upper = h
        .assessor
        .check(&format!("0x{}", TARGET[2..].to_uppercase()))
        .await
        .expect("upper");

    assert!(lower.cached);
    assert!(upper.cached);
    assert_eq!(h.registry.check_calls(), 1);
}

#[tokio::test]
async fn expired_entry_is_rebuilt() {
    let h = harness(NullRegistry::new());

    h.assessor.check(TARGET).await.expect("first");
    h.clock.advance(DEFAULT_CACHE_TTL_SECS);
    let again = h.assessor.check(TARGET).await.expect("second");

    assert!(!again.cached);
    assert_eq!(again.assessment.timestamp, Timestamp::new(1_700_000_300));
    assert_eq!(h.registry.check_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn single_flight_collapses_concurrent_misses() {
    let h = harness(NullRegistry::new());
    h.registry.set_delay(Duration::from_millis(100));
    let registry = h.registry.clone();
    let assessor = Arc::new(h.assessor.with_single_flight(true));

    let mut handles = Vec::new();
    for _ in 0..5 {
        let a = Arc::clone(&assessor);
        handles.push(tokio::spawn(async move { a.check(TARGET).await }));
    }

    let mut fresh = 0;
    for handle in handles {
        let result = handle.await.unwrap().expect("assessment");
        if !result.cached {
            fresh += 1;
        }
    }

    assert_eq!(fresh, 1);
    assert_eq!(registry.check_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn single_flight_shares_a_failed_build_with_waiters() {
    let h = harness(NullRegistry::new());
    h.registry.set_delay(Duration::from_secs(3600));
    let registry = h.registry.clone();
    let assessor = Arc::new(
        h.assessor
            .with_single_flight(true)
            .with_registry_timeout(Duration::from_secs(2)),
    );
    let start = tokio::time::Instant::now();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let a = Arc::clone(&assessor);
        handles.push(tokio::spawn(async move {
            let result = a.check(TARGET).await;
            (result, start.elapsed())
        }));
    }

    for handle in handles {
        let (result, elapsed) = handle.await.unwrap();
        assert!(matches!(result, Err(AssessorError::UpstreamUnavailable(_))));
        assert!(elapsed < Duration::from_secs(3), "waited {elapsed:?}");
    }
    assert_eq!(registry.check_calls(), 1);
    assert_eq!(assessor.metrics().upstream_failures.get(), 1);
}

#[tokio::test]
async fn cache_stays_bounded_across_many_addresses() {
    let h = harness(NullRegistry::new());

    for i in 0..1_000u32 {
        let mut bytes = [0x5a; 20];
        bytes[16..].copy_from_slice(&i.to_be_bytes());
        h.assessor
            .check(&Address::new(bytes).to_string())
            .await
            .expect("assessment");
        h.clock.advance(DEFAULT_CACHE_TTL_SECS + 1);
        assert!(h.cache.len() <= 2);
    }
    assert_eq!(h.registry.check_calls(), 1_000);
}

#[tokio::test(start_paused = true)]
async fn without_single_flight_concurrent_misses_all_build() {
    let h = harness(NullRegistry::new());
    h.registry.set_delay(Duration::from_millis(100));
    let registry = h.registry.clone();
    let assessor = Arc::new(h.assessor);

    let mut handles = Vec::new();
    for _ in 0..5 {
        let a = Arc::clone(&assessor);
        handles.push(tokio::spawn(async move { a.check(TARGET).await }));
    }
    for handle in handles {
        handle.await.unwrap().expect("assessment");
    }

    assert_eq!(registry.check_calls(), 5);
}

// ---------------------------------------------------------------------------
// Off-chain privacy analysis
// ---------------------------------------------------------------------------

#[tokio::test]
async fn privacy_uses_chain_observations_and_report_count() {
    let registry = NullRegistry::new();
    registry.add_account(
        target(),
        AccountFixture {
            report_ids: vec![0, 1, 2],
            ..AccountFixture::default()
        },
    );
    let h = harness_with(registry, NullChainObserver::new(150, 2.5, false), Vec::new());

    let result = h.assessor.privacy(TARGET).await.expect("privacy");

    assert!(!result.is_degraded());
    let report = result.into_value();
    assert_eq!(report.score, 50);
    assert_eq!(report.grade, PrivacyGrade::F);
    assert_eq!(report.factors.public_scrutiny, 3);
}

#[tokio::test]
async fn privacy_fails_open_when_chain_is_down() {
    let h = harness_with(NullRegistry::new(), NullChainObserver::failing(), Vec::new());

    let result = h.assessor.privacy(TARGET).await.expect("privacy");

    assert!(result.is_degraded());
    assert_eq!(result.into_value(), PrivacyReport::fallback());
    assert_eq!(h.assessor.metrics().privacy_fallbacks.get(), 1);
}

#[tokio::test]
async fn privacy_fails_open_when_registry_is_down() {
    let h = harness_with(
        NullRegistry::new(),
        NullChainObserver::new(5, 0.5, false),
        Vec::new(),
    );
    h.registry.set_offline(true);

    let result = h.assessor.privacy(TARGET).await.expect("privacy");
    assert!(result.is_degraded());
    assert_eq!(result.into_value(), PrivacyReport::fallback());
}

#[tokio::test]
async fn privacy_rejects_invalid_address() {
    let h = harness(NullRegistry::new());
    let err = h.assessor.privacy("0xnope").await.unwrap_err();
    assert!(matches!(err, AssessorError::InvalidAddress(_)));
}

// ---------------------------------------------------------------------------
// Report browsing
// ---------------------------------------------------------------------------

fn registry_with_reports(count: u64) -> NullRegistry {
    let registry = NullRegistry::new();
    for id in 0..count {
        registry.add_report(make_report(id, Address::new([id as u8; 20])));
    }
    registry
}

fn ids(reports: &[Report]) -> Vec<u64> {
    reports.iter().map(|r| r.id).collect()
}

#[tokio::test]
async fn recent_reports_default_page_is_newest_twenty() {
    let h = harness(registry_with_reports(25));

    let page = h.assessor.recent_reports(None, 0).await.expect("page");

    assert_eq!(page.total, 25);
    assert_eq!(page.limit, 20);
    assert_eq!(page.offset, 0);
    assert_eq!(ids(&page.reports), (5..25).rev().collect::<Vec<_>>());
}

#[tokio::test]
async fn recent_reports_second_page_reaches_id_zero() {
    let h = harness(registry_with_reports(25));

    let page = h.assessor.recent_reports(Some(20), 20).await.expect("page");

    assert_eq!(ids(&page.reports), vec![4, 3, 2, 1, 0]);
}

#[tokio::test]
async fn recent_reports_clamps_limit() {
    let h = harness(registry_with_reports(150));

    let tiny = h.assessor.recent_reports(Some(0), 0).await.expect("page");
    assert_eq!(tiny.limit, 1);
    assert_eq!(ids(&tiny.reports), vec![149]);

    let huge = h.assessor.recent_reports(Some(500), 0).await.expect("page");
    assert_eq!(huge.limit, 100);
    assert_eq!(huge.reports.len(), 100);
}

#[tokio::test]
async fn recent_reports_past_the_end_is_empty() {
    let h = harness(registry_with_reports(3));

    let page = h.assessor.recent_reports(None, 3).await.expect("page");
    assert!(page.reports.is_empty());
    assert_eq!(page.total, 3);

    let empty = harness(NullRegistry::new());
    let page = empty.assessor.recent_reports(None, 0).await.expect("page");
    assert!(page.reports.is_empty());
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn recent_reports_skips_failed_items() {
    let registry = registry_with_reports(5);
    registry.fail_report(2);
    let h = harness(registry);

    let page = h.assessor.recent_reports(None, 0).await.expect("page");
    assert_eq!(ids(&page.reports), vec![4, 3, 1, 0]);
}

#[tokio::test]
async fn recent_reports_needs_the_registry() {
    let h = harness(registry_with_reports(5));
    h.registry.set_offline(true);

    let err = h.assessor.recent_reports(None, 0).await.unwrap_err();
    assert!(matches!(err, AssessorError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn single_report_lookup() {
    let h = harness(registry_with_reports(3));

    let report = h.assessor.report(1).await.expect("report");
    assert_eq!(report.id, 1);

    let err = h.assessor.report(42).await.unwrap_err();
    assert_eq!(err, AssessorError::ReportNotFound(42));

    h.registry.set_offline(true);
    let err = h.assessor.report(1).await.unwrap_err();
    assert!(matches!(err, AssessorError::UpstreamUnavailable(_)));
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

fn submission(evidence: &str) -> SubmissionRequest {
    SubmissionRequest {
        target: TARGET.to_string(),
        alias: None,
        reason: "RugPull".to_string(),
        evidence: evidence.to_string(),
    }
}

#[tokio::test]
async fn submission_needs_a_registry_address() {
    let h = harness(NullRegistry::new());
    let err = h
        .assessor
        .prepare_submission(&submission("liquidity pulled at block 19000000"))
        .unwrap_err();
    assert!(matches!(err, AssessorError::Config(_)));
}

#[tokio::test]
async fn submission_is_planned_against_the_registry() {
    let contract = Address::new([0xcc; 20]);
    let h = harness(NullRegistry::new());
    let assessor = h.assessor.with_registry_address(contract);

    let plan = assessor
        .prepare_submission(&submission("liquidity pulled at block 19000000"))
        .expect("plan");
    assert_eq!(plan.contract, contract);
    assert_eq!(plan.method, "submitReport");
    assert_eq!(plan.params.target, target());
    assert_eq!(Some(plan.params.reason), ReportReason::RugPull.code());

    let err = assessor.prepare_submission(&submission("short")).unwrap_err();
    assert!(matches!(err, AssessorError::InvalidSubmission(_)));
}
