//! Privacy-exposure scoring.
//!
//! A heuristic over four observable factors (transaction activity, balance,
//! public scrutiny, contract code) that rates how trackable an address is.
//! Higher scores mean less exposure.
//!
//! - [`scoring`] holds the pure, deterministic rules.
//! - [`observer`] is the seam to chain state.
//! - [`engine`] combines the two and fails open when observations are unavailable.

pub mod engine;
pub mod observer;
pub mod scoring;

pub use engine::{PrivacyEngine, DEFAULT_OBSERVATION_TIMEOUT};
pub use observer::{ChainObserver, ObservationError};
pub use scoring::{
    activity_penalty, balance_penalty, evaluate, recommendations, score, scrutiny_penalty,
    CONTRACT_PENALTY,
};
