//! Utility functions for common type conversions and transformations.
//!
//! This module provides helper functions for hex formatting, shared unit
//! constants, and the EIP-712 hashing primitives used by the permit builder.

pub mod constants;
pub mod eip712;
pub mod formatting;

pub use constants::{DEADLINE_NO_EXPIRY, ONE_TOKEN};
pub use eip712::{
	compute_domain_hash, compute_final_digest, compute_permit_struct_hash, Eip712AbiEncoder,
	DOMAIN_TYPE, PERMIT_TYPE,
};
pub use formatting::{truncate_id, with_0x_prefix, without_0x_prefix};

pub use crate::account::parse_address;
