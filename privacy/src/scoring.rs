//! Pure privacy scoring rules.
//!
//! Each factor contributes exactly one penalty bracket (the highest one it
//! exceeds); brackets are never summed within a factor.

use safereg_types::{PrivacyFactors, PrivacyGrade, PrivacyReport};

/// Flat penalty applied to addresses holding executable code.
pub const CONTRACT_PENALTY: u8 = 10;

const MAX_SCORE: u8 = 100;

/// (exclusive lower bound, penalty), highest bracket first.
const ACTIVITY_BRACKETS: [(u64, u8); 6] =
    [(1000, 30), (500, 25), (100, 20), (50, 15), (10, 10), (0, 5)];

const BALANCE_BRACKETS: [(f64, u8); 5] = [(100.0, 30), (10.0, 20), (1.0, 15), (0.1, 10), (0.01, 5)];

const SCRUTINY_BRACKETS: [(u64, u8); 4] = [(10, 25), (5, 20), (2, 15), (0, 10)];

/// Penalty for outgoing transaction count.
pub fn activity_penalty(tx_count: u64) -> u8 {
    ACTIVITY_BRACKETS
        .iter()
        .find(|(bound, _)| tx_count > *bound)
        .map_or(0, |(_, penalty)| *penalty)
}

/// Penalty for balance held, in native-currency units.
pub fn balance_penalty(balance: f64) -> u8 {
    BALANCE_BRACKETS
        .iter()
        .find(|(bound, _)| balance > *bound)
        .map_or(0, |(_, penalty)| *penalty)
}

/// Penalty for the number of community reports against the address.
pub fn scrutiny_penalty(report_count: u64) -> u8 {
    SCRUTINY_BRACKETS
        .iter()
        .find(|(bound, _)| report_count > *bound)
        .map_or(0, |(_, penalty)| *penalty)
}

/// Privacy score in [0, 100].
pub fn score(factors: &PrivacyFactors) -> u8 {
    let contract = if factors.is_contract {
        CONTRACT_PENALTY
    } else {
        0
    };
    let total = activity_penalty(factors.transaction_activity) as u16
        + balance_penalty(factors.balance_exposure) as u16
        + scrutiny_penalty(factors.public_scrutiny) as u16
        + contract as u16;
    (MAX_SCORE as u16).saturating_sub(total) as u8
}

/// Advisory strings; each rule is gated independently.
pub fn recommendations(score: u8, factors: &PrivacyFactors) -> Vec<String> {
    let mut recs = Vec::new();

    if factors.transaction_activity > 50 {
        recs.push("Consider using fresh addresses for sensitive transactions".to_string());
    }
    if factors.balance_exposure > 1.0 {
        recs.push("Consider splitting funds across multiple addresses".to_string());
    }
    if factors.public_scrutiny > 0 {
        recs.push("This address is publicly flagged - consider using a new address".to_string());
    }
    if factors.transaction_activity > 100 {
        recs.push(
            "Use privacy tools like Tornado Cash alternatives or mixing services".to_string(),
        );
    }
    if score < 70 {
        recs.push("This address has significant on-chain exposure".to_string());
    }

    recs
}

/// Score, grade, and advise on a full factor vector.
pub fn evaluate(factors: PrivacyFactors) -> PrivacyReport {
    let score = score(&factors);
    PrivacyReport {
        score,
        grade: PrivacyGrade::from_score(score),
        recommendations: recommendations(score, &factors),
        factors,
    }
}
