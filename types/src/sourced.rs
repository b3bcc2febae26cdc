//! Tagged results for sub-computations that fail open.
//!
//! A non-authoritative subsystem (external source, chain observation, single
//! report lookup) never aborts an assessment. Instead it yields a
//! [`Sourced::Degraded`] value carrying the substituted default and the reason,
//! and the orchestrator records a [`Degradation`] for it.

use crate::PrivacyGrade;
use serde::{Deserialize, Serialize};

/// A value that was either obtained normally or substituted after a failure.
#[derive(Clone, Debug, PartialEq)]
pub enum Sourced<T> {
    Fresh(T),
    Degraded { value: T, reason: String },
}

impl<T> Sourced<T> {
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Self::Degraded {
            value,
            reason: reason.into(),
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Fresh(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Failure reason, if the value was substituted.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Fresh(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }
}

/// A locally recovered failure, kept on the assessment for auditing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// An external threat-intel source failed and was read as "not flagged".
    SourceDegraded { source: String, reason: String },
    /// A report id could not be resolved and was omitted.
    PartialReportLoss { report_id: u64, reason: String },
    /// Chain observations failed and the privacy defaults were used.
    /// Reported by the privacy endpoint rather than on an assessment.
    PrivacyFallback { reason: String },
    /// The registry's grade label did not match the score-derived grade.
    GradeMismatch {
        registry_label: String,
        derived: PrivacyGrade,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_has_no_reason() {
        let s = Sourced::Fresh(7);
        assert!(!s.is_degraded());
        assert_eq!(s.reason(), None);
        assert_eq!(s.into_value(), 7);
    }

    #[test]
    fn degraded_keeps_default_and_reason() {
        let s = Sourced::degraded(0, "timeout");
        assert!(s.is_degraded());
        assert_eq!(s.reason(), Some("timeout"));
        assert_eq!(s.into_value(), 0);
    }

    #[test]
    fn degradation_serializes_with_kind_tag() {
        let d = Degradation::PartialReportLoss {
            report_id: 7,
            reason: "reverted".into(),
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "partial_report_loss");
        assert_eq!(json["report_id"], 7);
    }
}
