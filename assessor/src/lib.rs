//! Address trust and privacy assessment.
//!
//! The assessor is the central coordinator that:
//! - Validates and normalizes the requested address
//! - Serves repeat requests from a time-bounded cache
//! - Queries the report registry for flag status, risk, and privacy analysis
//! - Resolves each report, newest first, tolerating per-report failures
//! - Fans out to external threat-intel sources
//! - Assembles and caches one unified [`Assessment`](safereg_types::Assessment)

pub mod assessor;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod single_flight;
pub mod submission;

pub use assessor::{Assessor, CheckResult, ReportPage, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use cache::{cache_key, AssessmentCache, TtlCache, CACHE_KEY_PREFIX, DEFAULT_CACHE_TTL_SECS};
pub use config::AssessorConfig;
pub use error::AssessorError;
pub use logging::{init_logging, LogFormat};
pub use metrics::AssessorMetrics;
pub use single_flight::{Flight, SingleFlight};
pub use submission::{plan_submission, SubmissionParams, SubmissionPlan, SubmissionRequest};
