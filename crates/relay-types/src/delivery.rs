//! Transaction submission and finalization types for the relay system.
//!
//! This module defines the payload submitted to the primary ledger, the
//! hash and receipt types returned by it, and the handle the dispatcher
//! hands back to callers for both real and simulated transfers.

use crate::account::Address;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Blockchain transaction hash representation.
///
/// Stores transaction hashes as raw bytes to support different hash widths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHash(pub Vec<u8>);

/// Transaction receipt containing execution details.
///
/// Provides information about a transaction after it has been included in a
/// block, including its success status and block number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	/// The hash of the transaction.
	pub hash: TransactionHash,
	/// The block number where the transaction was included.
	pub block_number: u64,
	/// Whether the transaction executed successfully.
	pub success: bool,
}

/// Where a transaction handle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleOrigin {
	/// Executed and confirmed on the primary ledger.
	Primary,
	/// Synthesized locally after the primary path failed.
	Simulated,
}

/// Handle returned to callers of a delegated transfer.
///
/// Primary handles carry the real receipt. Simulated handles carry a
/// deterministic placeholder hash with the spender as sender, the token
/// contract as recipient, and zero value, and report finalization success
/// immediately so callers awaiting them never block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHandle {
	/// Transaction hash, real or synthesized.
	pub hash: TransactionHash,
	/// Sending account.
	pub sender: Address,
	/// Receiving account.
	pub recipient: Address,
	/// Native value carried by the transaction.
	pub value: U256,
	/// Whether this handle reflects a primary or simulated execution.
	pub origin: HandleOrigin,
	/// Receipt, present once the primary path confirmed the transaction.
	pub receipt: Option<TransactionReceipt>,
}

impl TransactionHandle {
	/// Builds a handle for a confirmed primary-ledger transaction.
	pub fn primary(
		sender: Address,
		recipient: Address,
		value: U256,
		receipt: TransactionReceipt,
	) -> Self {
		Self {
			hash: receipt.hash.clone(),
			sender,
			recipient,
			value,
			origin: HandleOrigin::Primary,
			receipt: Some(receipt),
		}
	}

	/// Builds a placeholder handle for a transfer absorbed by the fallback
	/// path. Carries zero value and no receipt.
	pub fn simulated(hash: TransactionHash, sender: Address, recipient: Address) -> Self {
		Self {
			hash,
			sender,
			recipient,
			value: U256::ZERO,
			origin: HandleOrigin::Simulated,
			receipt: None,
		}
	}

	/// Reports whether the transaction this handle refers to is final.
	///
	/// Simulated handles are final by construction; primary handles are
	/// final once their receipt reports success.
	pub fn is_finalized(&self) -> bool {
		match self.origin {
			HandleOrigin::Simulated => true,
			HandleOrigin::Primary => self.receipt.as_ref().map(|r| r.success).unwrap_or(false),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn addr(n: u8) -> Address {
		Address(vec![n; 20])
	}

	#[test]
	fn test_simulated_handle_is_finalized_immediately() {
		let handle = TransactionHandle::simulated(TransactionHash(vec![1; 32]), addr(1), addr(2));
		assert!(handle.is_finalized());
		assert_eq!(handle.value, U256::ZERO);
		assert!(handle.receipt.is_none());
	}

	#[test]
	fn test_primary_handle_finalization_follows_receipt() {
		let receipt = TransactionReceipt {
			hash: TransactionHash(vec![2; 32]),
			block_number: 7,
			success: true,
		};
		let handle = TransactionHandle::primary(addr(1), addr(2), U256::from(10), receipt);
		assert!(handle.is_finalized());

		let reverted = TransactionReceipt {
			hash: TransactionHash(vec![3; 32]),
			block_number: 8,
			success: false,
		};
		let handle = TransactionHandle::primary(addr(1), addr(2), U256::from(10), reverted);
		assert!(!handle.is_finalized());
	}

	#[test]
	fn test_handle_serde_round_trip() {
		let handle = TransactionHandle::simulated(TransactionHash(vec![9; 32]), addr(1), addr(2));
		let json = serde_json::to_string(&handle).unwrap();
		let back: TransactionHandle = serde_json::from_str(&json).unwrap();
		assert_eq!(back, handle);
	}
}
