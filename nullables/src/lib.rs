//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies (clock, registry, chain observations, intel
//! sources) are abstracted behind traits. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (fail, go offline, stall)
//! - Never touch the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod chain;
pub mod clock;
pub mod intel;
pub mod registry;

pub use chain::NullChainObserver;
pub use clock::NullClock;
pub use intel::NullIntelSource;
pub use registry::{AccountFixture, NullRegistry};
