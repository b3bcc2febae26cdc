//! HTTP client for querying threat-intel endpoints.

use crate::error::IntelError;
use crate::source::{SourceVerdict, ThreatIntelSource};
use crate::types::SourceConfig;

use async_trait::async_trait;
use safereg_types::Address;
use std::time::Duration;

/// Default timeout for intel requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// A threat-intel source reachable over HTTP.
///
/// Sends `GET {endpoint}/{address}` and expects
/// `{"flagged": bool, "details": any}` back.
pub struct HttpIntelSource {
    name: String,
    endpoint: String,
    api_key: Option<(String, String)>,
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
}

impl HttpIntelSource {
    /// Create a source with default timeout settings.
    pub fn new(config: &SourceConfig) -> Result<Self, IntelError> {
        Self::with_timeout(config, DEFAULT_TIMEOUT)
    }

    /// Create a source with a custom request timeout.
    pub fn with_timeout(config: &SourceConfig, timeout: Duration) -> Result<Self, IntelError> {
        if config.endpoint.trim().is_empty() {
            return Err(IntelError::Config(format!(
                "source {} has an empty endpoint",
                config.name
            )));
        }
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| IntelError::Config(e.to_string()))?;
        Ok(Self {
            name: config.name.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config
                .api_key
                .clone()
                .map(|key| (config.api_key_header.clone(), key)),
            http_client,
        })
    }

    fn url_for(&self, address: &Address) -> String {
        format!("{}/{}", self.endpoint, address.normalized())
    }
}

#[async_trait]
impl ThreatIntelSource for HttpIntelSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check_address(&self, address: &Address) -> Result<SourceVerdict, IntelError> {
        let mut request = self.http_client.get(self.url_for(address));
        if let Some((header, key)) = &self.api_key {
            request = request.header(header.as_str(), key.as_str());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                IntelError::Unreachable(format!("request timed out: {e}"))
            } else if e.is_connect() {
                IntelError::Unreachable(format!("connection failed: {e}"))
            } else {
                IntelError::RequestFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(IntelError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        response.json::<SourceVerdict>().await.map_err(|e| {
            IntelError::InvalidResponse(format!("failed to parse intel response: {e}"))
        })
    }
}
