//! Read-only access to the community report registry.
//!
//! The rest of the workspace depends only on the [`RegistryClient`] trait.
//! [`EthRegistry`] implements it over Ethereum JSON-RPC `eth_call`s against
//! the deployed registry contract; [`EthChainObserver`] supplies the raw
//! account observations the privacy engine needs from the same endpoint.

pub mod abi;
pub mod client;
pub mod error;
pub mod eth;
pub mod observer;

pub use client::{AddressStatus, PrivacyAnalysis, RegistryClient};
pub use error::RegistryError;
pub use eth::{connect_provider, EthRegistry};
pub use observer::EthChainObserver;
