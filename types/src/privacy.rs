//! Privacy-exposure factors, grades, and reports.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Observable exposure vector for one address.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivacyFactors {
    /// Number of transactions sent from the address.
    pub transaction_activity: u64,
    /// Current balance in whole native-currency units.
    pub balance_exposure: f64,
    /// Number of community reports filed against the address.
    pub public_scrutiny: u64,
    /// Reserved; not computed yet and always zero.
    pub address_reuse: u64,
    pub is_contract: bool,
}

/// Letter grade derived from a 0-100 privacy score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrivacyGrade {
    A,
    B,
    C,
    D,
    F,
}

impl PrivacyGrade {
    /// Total over all scores; boundaries belong to the higher grade.
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Self::A,
            80..=89 => Self::B,
            70..=79 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for PrivacyGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrivacyGrade {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            "C" | "c" => Ok(Self::C),
            "D" | "d" => Ok(Self::D),
            "F" | "f" => Ok(Self::F),
            other => Err(TypesError::UnknownGrade(other.to_string())),
        }
    }
}

/// Result of the off-chain privacy scoring engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrivacyReport {
    pub score: u8,
    pub grade: PrivacyGrade,
    pub factors: PrivacyFactors,
    pub recommendations: Vec<String>,
}

impl PrivacyReport {
    /// The report substituted when chain observations are unavailable.
    pub fn fallback() -> Self {
        Self {
            score: 100,
            grade: PrivacyGrade::A,
            factors: PrivacyFactors::default(),
            recommendations: Vec::new(),
        }
    }
}
