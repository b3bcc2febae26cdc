//! Fundamental types for the safety registry.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, timestamps, report reasons, reports, privacy factors and grades,
//! external threat-intel flags, and the unified per-address assessment.

pub mod address;
pub mod assessment;
pub mod error;
pub mod flag;
pub mod privacy;
pub mod reason;
pub mod report;
pub mod sourced;
pub mod time;

pub use address::Address;
pub use assessment::{Assessment, Verdict, RISK_CAUTION_THRESHOLD};
pub use error::TypesError;
pub use flag::{ExternalFlag, ExternalFlags};
pub use privacy::{PrivacyFactors, PrivacyGrade, PrivacyReport};
pub use reason::{code_of, label_of, ReportReason};
pub use report::{Report, MIN_EVIDENCE_LEN};
pub use sourced::{Degradation, Sourced};
pub use time::{Clock, SystemClock, Timestamp};
