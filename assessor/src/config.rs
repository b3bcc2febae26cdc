//! Assessor configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use safereg_intel::SourceConfig;
use safereg_types::Address;

use crate::AssessorError;

/// Configuration for the assessment service.
///
/// Can be loaded from a TOML file via [`AssessorConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssessorConfig {
    /// JSON-RPC endpoint of the chain hosting the registry contract.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Deployed registry contract address.
    #[serde(default)]
    pub registry_address: String,

    /// HTTP API port.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// How long an assessment stays cached, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Upper bound for each registry call, in milliseconds.
    #[serde(default = "default_registry_timeout_ms")]
    pub registry_timeout_ms: u64,

    /// Upper bound for each threat-intel lookup, in milliseconds.
    #[serde(default = "default_source_timeout_ms")]
    pub source_timeout_ms: u64,

    /// Collapse concurrent cache misses for the same address into one build.
    #[serde(default)]
    pub single_flight: bool,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// External threat-intel sources, queried in this order.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_listen_port() -> u16 {
    3001
}

fn default_cache_ttl_secs() -> u64 {
    crate::cache::DEFAULT_CACHE_TTL_SECS
}

fn default_registry_timeout_ms() -> u64 {
    10_000
}

fn default_source_timeout_ms() -> u64 {
    5_000
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl AssessorConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, AssessorError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AssessorError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, AssessorError> {
        toml::from_str(s).map_err(|e| AssessorError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, AssessorError> {
        toml::to_string_pretty(self).map_err(|e| AssessorError::Config(e.to_string()))
    }

    /// The registry contract address, validated.
    pub fn registry_address(&self) -> Result<Address, AssessorError> {
        if self.registry_address.trim().is_empty() {
            return Err(AssessorError::Config(
                "registry_address is not set".to_string(),
            ));
        }
        Address::parse(&self.registry_address)
            .map_err(|e| AssessorError::Config(format!("registry_address: {e}")))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn registry_timeout(&self) -> Duration {
        Duration::from_millis(self.registry_timeout_ms)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms)
    }
}

impl Default for AssessorConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            registry_address: String::new(),
            listen_port: default_listen_port(),
            cache_ttl_secs: default_cache_ttl_secs(),
            registry_timeout_ms: default_registry_timeout_ms(),
            source_timeout_ms: default_source_timeout_ms(),
            single_flight: false,
            log_format: default_log_format(),
            log_level: default_log_level(),
            sources: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = AssessorConfig::default();
        let toml_str = config.to_toml_string().expect("should serialize");
        let parsed = AssessorConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.listen_port, config.listen_port);
        assert_eq!(parsed.cache_ttl_secs, config.cache_ttl_secs);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = AssessorConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.listen_port, 3001);
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.registry_timeout(), Duration::from_secs(10));
        assert_eq!(config.source_timeout(), Duration::from_secs(5));
        assert!(!config.single_flight);
        assert_eq!(config.log_format, "human");
        assert!(config.sources.is_empty());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            listen_port = 9999
            cache_ttl_secs = 60
            single_flight = true
        "#;
        let config = AssessorConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.listen_port, 9999);
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert!(config.single_flight);
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn sources_table_parses_in_order() {
        let toml = r#"
            [[sources]]
            name = "ChainAbuse"
            endpoint = "https://intel-a.example/v1/check"
            api_key = "secret"

            [[sources]]
            name = "ScamSniffer"
            endpoint = "https://intel-b.example/lookup"
            enabled = false
        "#;
        let config = AssessorConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].name, "ChainAbuse");
        assert_eq!(config.sources[0].api_key.as_deref(), Some("secret"));
        assert!(!config.sources[1].enabled);
    }

    #[test]
    fn registry_address_is_validated() {
        let mut config = AssessorConfig::default();
        assert!(matches!(
            config.registry_address(),
            Err(AssessorError::Config(_))
        ));

        config.registry_address = "0xnot-an-address".to_string();
        assert!(matches!(
            config.registry_address(),
            Err(AssessorError::Config(_))
        ));

        config.registry_address = "0xABCDEF0123456789abcdef0123456789ABCDEF01".to_string();
        let addr = config.registry_address().expect("valid address");
        assert_eq!(
            addr.normalized(),
            "0xabcdef0123456789abcdef0123456789abcdef01"
        );
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("safereg.toml");
        std::fs::write(&path, "listen_port = 4000\n").expect("write");
        let config =
            AssessorConfig::from_toml_file(path.to_str().expect("utf8 path")).expect("load");
        assert_eq!(config.listen_port, 4000);
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = AssessorConfig::from_toml_file("/nonexistent/safereg.toml").unwrap_err();
        assert!(matches!(err, AssessorError::Config(_)));
    }
}
