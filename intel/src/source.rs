//! The threat-intel source seam.

use async_trait::async_trait;
use safereg_types::{Address, ExternalFlag};
use serde::{Deserialize, Serialize};

use crate::IntelError;

/// What a source says about an address.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceVerdict {
    pub flagged: bool,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl SourceVerdict {
    pub fn into_flag(self, source: &str) -> ExternalFlag {
        ExternalFlag {
            source: source.to_string(),
            flagged: self.flagged,
            details: self.details,
        }
    }
}

/// A single external scam/phishing list.
#[async_trait]
pub trait ThreatIntelSource: Send + Sync {
    fn name(&self) -> &str;

    async fn check_address(&self, address: &Address) -> Result<SourceVerdict, IntelError>;
}
