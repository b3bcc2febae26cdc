//! External threat-intel lookups.
//!
//! Third-party scam and phishing lists are advisory signals only. Each source
//! is queried independently and a failing source is read as "not flagged":
//! - Every source exposes `check_address(addr) -> {flagged, details}`
//! - Sources are configuration (`SourceConfig`), not code
//! - Zero sources is a valid setup and yields an empty, zero-flag result
//! - Nothing here can fail an assessment

pub mod aggregator;
pub mod client;
pub mod error;
pub mod source;
pub mod types;

pub use aggregator::{summarize, FlagAggregator, DEFAULT_SOURCE_TIMEOUT};
pub use client::HttpIntelSource;
pub use error::IntelError;
pub use source::{SourceVerdict, ThreatIntelSource};
pub use types::SourceConfig;
