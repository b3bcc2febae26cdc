//! Community reports as read back from the registry.

use crate::{Address, ReportReason, Timestamp};
use serde::{Deserialize, Serialize};

/// Minimum evidence length accepted at submission time.
pub const MIN_EVIDENCE_LEN: usize = 10;

/// One community submission against an address.
///
/// Reports are read-only here; votes and the resolved flag change only
/// inside the registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Registry-assigned id. Higher ids were created later.
    pub id: u64,
    pub reporter: Address,
    pub target: Address,
    /// Optional human-readable name for the target (e.g. an ENS name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub reason: ReportReason,
    pub evidence: String,
    pub created_at: Timestamp,
    pub upvotes: u64,
    pub downvotes: u64,
    pub resolved: bool,
}
