//! Intel source configuration.

use serde::{Deserialize, Serialize};

/// One configured external threat-intel source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Name reported back in each `ExternalFlag`.
    pub name: String,
    /// Base URL; the address is appended as the last path segment.
    pub endpoint: String,
    /// Optional API key sent in `api_key_header`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_api_key_header() -> String {
    "x-api-key".to_string()
}

fn default_true() -> bool {
    true
}

impl SourceConfig {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            api_key: None,
            api_key_header: default_api_key_header(),
            enabled: true,
        }
    }
}
