//! Orchestration core for the permit relay system.
//!
//! This crate ties the account registry, the primary-ledger client, and
//! the fallback ledger together into the dual-path dispatcher, and houses
//! the structured authorization builder that produces signed permits.

pub mod dispatcher;
pub mod permit;

pub use dispatcher::{DispatchError, Dispatcher};
pub use permit::{build_and_sign, PermitDomain, PermitMessage};
