//! Report submission preparation.
//!
//! Validates a would-be report and shapes it into the registry call a wallet
//! should sign. Nothing here signs or broadcasts.

use safereg_types::{code_of, Address, ReportReason, MIN_EVIDENCE_LEN};
use serde::{Deserialize, Serialize};

use crate::AssessorError;

pub const SUBMIT_METHOD: &str = "submitReport";

/// A report as entered by a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub target: String,
    #[serde(default)]
    pub alias: Option<String>,
    /// Reason label, e.g. `"Phishing"`. Unrecognized labels become `Other`.
    pub reason: String,
    pub evidence: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionParams {
    pub target: Address,
    /// Empty when no alias was given.
    pub alias: String,
    pub reason: u8,
    pub evidence: String,
}

/// The contract call a wallet should sign to file the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPlan {
    pub contract: Address,
    pub method: String,
    pub params: SubmissionParams,
}

/// Validate `request` and build the call against `contract`.
pub fn plan_submission(
    contract: Address,
    request: &SubmissionRequest,
) -> Result<SubmissionPlan, AssessorError> {
    let target = Address::parse(&request.target)?;

    let evidence = request.evidence.trim();
    if evidence.chars().count() < MIN_EVIDENCE_LEN {
        return Err(AssessorError::InvalidSubmission(format!(
            "evidence must be at least {MIN_EVIDENCE_LEN} characters"
        )));
    }

    let label = request.reason.trim();
    if ReportReason::from_label(label) == ReportReason::Other && label != "Other" {
        tracing::debug!(label, "unrecognized reason label, filing as Other");
    }
    let reason = code_of(label);

    let alias = request
        .alias
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    Ok(SubmissionPlan {
        contract,
        method: SUBMIT_METHOD.to_string(),
        params: SubmissionParams {
            target,
            alias,
            reason,
            evidence: evidence.to_string(),
        },
    })
}
