//! Common types module for the permit relay system.
//!
//! This module defines the core data types and structures used throughout
//! the relay. It provides a centralized location for shared types to ensure
//! consistency across all relay components.

/// Account identity and signature types.
pub mod account;
/// Transaction submission and finalization types.
pub mod delivery;
/// Zeroizing wrapper for sensitive strings.
pub mod secret_string;
/// Token contract and network identity configuration.
pub mod token;
/// Utility functions and shared constants.
pub mod utils;

// Re-export all types for convenient access
pub use account::*;
pub use delivery::*;
pub use secret_string::SecretString;
pub use token::TokenConfig;
pub use utils::{
	compute_domain_hash, compute_final_digest, compute_permit_struct_hash, parse_address,
	truncate_id, with_0x_prefix, without_0x_prefix, Eip712AbiEncoder, DEADLINE_NO_EXPIRY,
	DOMAIN_TYPE, ONE_TOKEN, PERMIT_TYPE,
};
