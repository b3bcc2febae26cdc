//! Report reason codes and their human-readable labels.
//!
//! The registry stores reasons as a small integer ordinal. Reading is lenient
//! about unknown codes (they surface as [`ReportReason::Unknown`]) and writing
//! is lenient about unknown labels (they fall back to [`ReportReason::Other`]).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Why a report was filed against an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReportReason {
    Phishing,
    Scam,
    RugPull,
    MaliciousContract,
    Spam,
    Other,
    /// A code outside the known range, read back from the registry.
    Unknown,
}

impl ReportReason {
    /// Every reason that can be submitted, in code order.
    pub const ALL: [ReportReason; 6] = [
        ReportReason::Phishing,
        ReportReason::Scam,
        ReportReason::RugPull,
        ReportReason::MaliciousContract,
        ReportReason::Spam,
        ReportReason::Other,
    ];

    /// Decode a registry ordinal.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Phishing,
            1 => Self::Scam,
            2 => Self::RugPull,
            3 => Self::MaliciousContract,
            4 => Self::Spam,
            5 => Self::Other,
            _ => Self::Unknown,
        }
    }

    /// Parse a submitted label; anything unrecognized becomes `Other`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Phishing" => Self::Phishing,
            "Scam" => Self::Scam,
            "RugPull" => Self::RugPull,
            "MaliciousContract" => Self::MaliciousContract,
            "Spam" => Self::Spam,
            _ => Self::Other,
        }
    }

    /// Registry ordinal, or `None` for `Unknown`.
    pub fn code(&self) -> Option<u8> {
        match self {
            Self::Phishing => Some(0),
            Self::Scam => Some(1),
            Self::RugPull => Some(2),
            Self::MaliciousContract => Some(3),
            Self::Spam => Some(4),
            Self::Other => Some(5),
            Self::Unknown => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Phishing => "Phishing",
            Self::Scam => "Scam",
            Self::RugPull => "RugPull",
            Self::MaliciousContract => "MaliciousContract",
            Self::Spam => "Spam",
            Self::Other => "Other",
            Self::Unknown => "Unknown",
        }
    }
}

/// Label for a registry ordinal; out-of-range codes read as `"Unknown"`.
pub fn label_of(code: i64) -> &'static str {
    ReportReason::from_code(code).label()
}

/// Ordinal for a submitted label; unrecognized labels map to `Other` (5).
pub fn code_of(label: &str) -> u8 {
    ReportReason::from_label(label).code().unwrap_or(5)
}

impl fmt::Display for ReportReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ReportReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ReportReason {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        if label == "Unknown" {
            return Ok(Self::Unknown);
        }
        Ok(Self::from_label(&label))
    }
}
