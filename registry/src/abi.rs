//! Registry contract ABI and token decoding.

use ethers::abi::{Abi, Token};
use ethers::types::{H160, U256};
use safereg_types::{Address, Report, ReportReason, Timestamp};

use crate::RegistryError;

/// Human-readable ABI of the read-only registry functions.
pub const REGISTRY_ABI: &[&str] = &[
    "struct Report { address reporter; address targetAddress; string ensName; uint8 reason; string evidence; uint256 timestamp; uint256 upvotes; uint256 downvotes; bool resolved; }",
    "function checkAddress(address _address) external view returns (bool isFlagged, uint256[] reportIds)",
    "function getReport(uint256 _reportId) external view returns (Report)",
    "function calculateRiskScore(address _address) external view returns (uint256 score)",
    "function getPrivacyAnalysis(address _address) external view returns (uint256 score, uint8 grade, uint256[5] factors)",
    "function getPrivacyGradeString(uint8 _grade) external pure returns (string)",
    "function reportCount() external view returns (uint256)",
];

/// Parse [`REGISTRY_ABI`].
pub fn registry_abi() -> Result<Abi, RegistryError> {
    ethers::abi::parse_abi(REGISTRY_ABI).map_err(|e| RegistryError::Config(e.to_string()))
}

pub fn to_h160(address: &Address) -> H160 {
    H160::from(*address.as_bytes())
}

pub fn from_h160(address: H160) -> Address {
    Address::new(address.0)
}

/// Saturating narrowing for counters and scores.
pub fn saturating_u64(value: U256) -> u64 {
    if value.bits() > 64 {
        u64::MAX
    } else {
        value.as_u64()
    }
}

/// Strict narrowing for identifiers.
pub fn exact_u64(value: U256) -> Result<u64, RegistryError> {
    if value.bits() > 64 {
        return Err(RegistryError::Decode(format!("{value} does not fit in u64")));
    }
    Ok(value.as_u64())
}

/// Decode the `getReport` tuple.
pub fn decode_report(id: u64, token: Token) -> Result<Report, RegistryError> {
    let fields = match token {
        Token::Tuple(fields) => fields,
        other => {
            return Err(RegistryError::Decode(format!(
                "expected report tuple, got {other:?}"
            )))
        }
    };

    let [reporter, target, alias, reason, evidence, timestamp, upvotes, downvotes, resolved]: [Token; 9] =
        fields.try_into().map_err(|f: Vec<Token>| {
            RegistryError::Decode(format!("expected 9 report fields, got {}", f.len()))
        })?;

    let alias = string_field("ensName", alias)?;
    let reason = saturating_u64(uint_field("reason", reason)?);

    Ok(Report {
        id,
        reporter: from_h160(address_field("reporter", reporter)?),
        target: from_h160(address_field("targetAddress", target)?),
        alias: if alias.is_empty() { None } else { Some(alias) },
        reason: ReportReason::from_code(i64::try_from(reason).unwrap_or(i64::MAX)),
        evidence: string_field("evidence", evidence)?,
        created_at: Timestamp::new(saturating_u64(uint_field("timestamp", timestamp)?)),
        upvotes: saturating_u64(uint_field("upvotes", upvotes)?),
        downvotes: saturating_u64(uint_field("downvotes", downvotes)?),
        resolved: bool_field("resolved", resolved)?,
    })
}

fn address_field(name: &str, token: Token) -> Result<H160, RegistryError> {
    token
        .into_address()
        .ok_or_else(|| RegistryError::Decode(format!("{name}: expected address")))
}

fn string_field(name: &str, token: Token) -> Result<String, RegistryError> {
    token
        .into_string()
        .ok_or_else(|| RegistryError::Decode(format!("{name}: expected string")))
}

fn uint_field(name: &str, token: Token) -> Result<U256, RegistryError> {
    token
        .into_uint()
        .ok_or_else(|| RegistryError::Decode(format!("{name}: expected uint")))
}

fn bool_field(name: &str, token: Token) -> Result<bool, RegistryError> {
    token
        .into_bool()
        .ok_or_else(|| RegistryError::Decode(format!("{name}: expected bool")))
}
