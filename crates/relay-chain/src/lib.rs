//! Primary-ledger client for the permit relay system.
//!
//! This module handles all interaction with the deployed token contract:
//! read calls (balance, allowance, nonce, name), permit redemption, and
//! delegated transfers, together with confirmation tracking. The rest of
//! the relay treats this as an opaque remote service that can fail; every
//! error here is a candidate for degraded-mode substitution upstream.

use alloy_primitives::U256;
use async_trait::async_trait;
use relay_types::{Address, Signature, TransactionHash, TransactionReceipt};
use thiserror::Error;

/// ABI call data encoding for the token contract surface.
pub mod abi;

/// Re-export implementations
pub mod implementations {
	pub mod alloy;
}

/// Errors that can occur during primary-ledger operations.
#[derive(Debug, Error)]
pub enum ChainError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when a transaction execution fails or reverts.
	#[error("Transaction failed: {0}")]
	TransactionFailed(String),
}

/// Trait defining the interface to the deployed token contract.
///
/// Implementations submit state-changing calls from the spender's wallet,
/// since the whole point of the permit flow is that the owner never pays
/// gas.
#[async_trait]
pub trait ChainInterface: Send + Sync {
	/// Resolves the live chain id of the connected network.
	async fn chain_id(&self) -> Result<u64, ChainError>;

	/// Reads the token's `name()`, used for the EIP-712 signing domain.
	async fn token_name(&self) -> Result<String, ChainError>;

	/// Reads `balanceOf(address)`.
	async fn balance_of(&self, address: &Address) -> Result<U256, ChainError>;

	/// Reads `allowance(owner, spender)`.
	async fn allowance(&self, owner: &Address, spender: &Address) -> Result<U256, ChainError>;

	/// Reads `nonces(owner)`, the permit nonce counter.
	async fn nonces(&self, owner: &Address) -> Result<U256, ChainError>;

	/// Submits `permit(owner, spender, value, deadline, v, r, s)` from the
	/// spender's wallet.
	async fn submit_permit(
		&self,
		owner: &Address,
		spender: &Address,
		value: U256,
		deadline: U256,
		signature: &Signature,
	) -> Result<TransactionHash, ChainError>;

	/// Submits `transferFrom(from, to, value)` from the spender's wallet.
	async fn submit_transfer_from(
		&self,
		from: &Address,
		to: &Address,
		value: U256,
	) -> Result<TransactionHash, ChainError>;

	/// Waits for a transaction to reach the required confirmation depth.
	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, ChainError>;
}

/// Service that manages primary-ledger access.
///
/// Thin wrapper around a boxed implementation so the dispatcher and the
/// CLI share one connection.
pub struct ChainService {
	implementation: Box<dyn ChainInterface>,
}

impl ChainService {
	/// Creates a new ChainService with the specified implementation.
	pub fn new(implementation: Box<dyn ChainInterface>) -> Self {
		Self { implementation }
	}

	pub async fn chain_id(&self) -> Result<u64, ChainError> {
		self.implementation.chain_id().await
	}

	pub async fn token_name(&self) -> Result<String, ChainError> {
		self.implementation.token_name().await
	}

	pub async fn balance_of(&self, address: &Address) -> Result<U256, ChainError> {
		self.implementation.balance_of(address).await
	}

	pub async fn allowance(
		&self,
		owner: &Address,
		spender: &Address,
	) -> Result<U256, ChainError> {
		self.implementation.allowance(owner, spender).await
	}

	pub async fn nonces(&self, owner: &Address) -> Result<U256, ChainError> {
		self.implementation.nonces(owner).await
	}

	pub async fn submit_permit(
		&self,
		owner: &Address,
		spender: &Address,
		value: U256,
		deadline: U256,
		signature: &Signature,
	) -> Result<TransactionHash, ChainError> {
		self.implementation
			.submit_permit(owner, spender, value, deadline, signature)
			.await
	}

	pub async fn submit_transfer_from(
		&self,
		from: &Address,
		to: &Address,
		value: U256,
	) -> Result<TransactionHash, ChainError> {
		self.implementation.submit_transfer_from(from, to, value).await
	}

	pub async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, ChainError> {
		self.implementation
			.wait_for_confirmation(hash, confirmations)
			.await
	}
}
