//! Shared constants for the relay system.

use alloy_primitives::U256;

/// One whole token in base units (10^18), the deterministic default the
/// fallback ledger assigns to balances and allowances on first reference.
pub const ONE_TOKEN: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Maximum-sentinel deadline meaning "no expiry" for a permit.
pub const DEADLINE_NO_EXPIRY: U256 = U256::MAX;
