//! The unified per-address assessment.

use crate::{Address, Degradation, ExternalFlags, PrivacyFactors, PrivacyGrade, Report, Timestamp};
use serde::{Deserialize, Serialize};

/// Risk score above which an unflagged address still warrants caution.
pub const RISK_CAUTION_THRESHOLD: u8 = 30;

/// Combined risk, privacy, report, and external-flag view of one address.
///
/// Built fresh on every cache miss and replaced wholesale, never patched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub address: Address,
    pub is_flagged: bool,
    /// Registry-computed, clamped to [0, 100].
    pub risk_score: u8,
    /// Clamped to [0, 100].
    pub privacy_score: u8,
    pub privacy_grade: PrivacyGrade,
    pub privacy_factors: PrivacyFactors,
    #[serde(default)]
    pub privacy_recommendations: Vec<String>,
    /// Always equal to `reports.len()`.
    pub report_count: usize,
    /// Most recent first.
    pub reports: Vec<Report>,
    pub external_flags: ExternalFlags,
    pub timestamp: Timestamp,
    /// Failures recovered while building this assessment.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degradations: Vec<Degradation>,
}

/// Coarse advice derived from an assessment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Flagged by the registry; do not interact.
    Blocked,
    /// Not flagged but carries a moderate risk score.
    Caution,
    Clear,
}

impl Assessment {
    pub fn verdict(&self) -> Verdict {
        if self.is_flagged {
            Verdict::Blocked
        } else if self.risk_score > RISK_CAUTION_THRESHOLD {
            Verdict::Caution
        } else {
            Verdict::Clear
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}
