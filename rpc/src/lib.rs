//! HTTP API for the safety registry.
//!
//! Provides endpoints for:
//! - Address assessments (registry flags, risk, privacy, reports, external flags)
//! - Off-chain privacy analysis
//! - Browsing recent reports and single report lookup
//! - Report submission preparation (the wallet signs and sends)
//! - Service info, health, and Prometheus metrics

pub mod error;
pub mod handlers;
pub mod pagination;
pub mod server;

pub use error::RpcError;
pub use server::{router, RpcServer};
