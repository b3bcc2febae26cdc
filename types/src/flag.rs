//! External threat-intel flags.

use serde::{Deserialize, Serialize};

/// Verdict from a single external threat-intel source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExternalFlag {
    /// Configured source name.
    pub source: String,
    pub flagged: bool,
    /// Free-form detail returned by the source, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ExternalFlag {
    /// A "not flagged" answer, used when a source fails.
    pub fn clear(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flagged: false,
            details: None,
        }
    }
}

/// Per-source flags plus the number of sources that flagged the address.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalFlags {
    pub sources: Vec<ExternalFlag>,
    pub total_flags: usize,
}

impl ExternalFlags {
    pub fn from_sources(sources: Vec<ExternalFlag>) -> Self {
        let total_flags = sources.iter().filter(|s| s.flagged).count();
        Self {
            sources,
            total_flags,
        }
    }
}
