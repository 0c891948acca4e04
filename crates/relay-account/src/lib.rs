//! Account registry for the permit relay system.
//!
//! This module provides abstractions for the three fixed identities the
//! relay operates with: the token owner (who signs permits), the spender
//! (who pays gas and redeems them), and the recipient (who only receives).
//! It defines the signing-capability interface and the registry that binds
//! the identities together for the lifetime of a session.

use alloy_primitives::B256;
use async_trait::async_trait;
use relay_types::{Address, SecretString, Signature};
use std::sync::Arc;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// The account has no usable signing capability.
	#[error("No signing capability available for this account")]
	SigningUnavailable,
	/// Error that occurs when a signing operation fails.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Trait defining the interface for signing capabilities.
///
/// A signing capability binds an address to the ability to sign 32-byte
/// digests. Implementations must be shareable across the dispatcher and
/// the permit builder.
#[async_trait]
pub trait SigningCapability: Send + Sync {
	/// Returns the address bound to this capability.
	fn address(&self) -> Address;

	/// Signs a precomputed 32-byte digest.
	///
	/// Returns the signature decomposed into its v, r, s components.
	async fn sign_digest(&self, digest: &B256) -> Result<Signature, AccountError>;
}

/// A relay participant: an address with an optional signing capability.
///
/// Immutable once created for the lifetime of a session. The recipient is
/// typically created signer-less; asking it to sign fails with
/// [`AccountError::SigningUnavailable`].
pub struct Account {
	address: Address,
	signer: Option<Arc<dyn SigningCapability>>,
}

impl Account {
	/// Creates an account around a signing capability.
	pub fn with_signer(signer: Arc<dyn SigningCapability>) -> Self {
		Self {
			address: signer.address(),
			signer: Some(signer),
		}
	}

	/// Creates a signer-less account that can only receive.
	pub fn watch_only(address: Address) -> Self {
		Self {
			address,
			signer: None,
		}
	}

	/// The account's address.
	pub fn address(&self) -> &Address {
		&self.address
	}

	/// Whether this account can produce signatures.
	pub fn can_sign(&self) -> bool {
		self.signer.is_some()
	}

	/// Signs a digest with this account's capability.
	pub async fn sign_digest(&self, digest: &B256) -> Result<Signature, AccountError> {
		match &self.signer {
			Some(signer) => signer.sign_digest(digest).await,
			None => Err(AccountError::SigningUnavailable),
		}
	}
}

/// Registry of the three relay participants.
///
/// Created once at startup from configuration and never mutated. Owner and
/// spender carry signing capabilities; the recipient is watch-only.
pub struct AccountRegistry {
	owner: Account,
	spender: Account,
	recipient: Account,
}

impl AccountRegistry {
	/// Creates a registry from already-built accounts.
	pub fn new(owner: Account, spender: Account, recipient: Account) -> Self {
		Self {
			owner,
			spender,
			recipient,
		}
	}

	/// Builds the registry from the participant key material.
	///
	/// Owner and spender get local in-process signers; the recipient is
	/// registered by address only.
	pub fn from_keys(
		owner_key: &SecretString,
		spender_key: &SecretString,
		recipient: Address,
	) -> Result<Self, AccountError> {
		use implementations::local::LocalSigner;

		let owner = Account::with_signer(Arc::new(LocalSigner::from_private_key(owner_key)?));
		let spender = Account::with_signer(Arc::new(LocalSigner::from_private_key(spender_key)?));
		Ok(Self::new(owner, spender, Account::watch_only(recipient)))
	}

	pub fn owner(&self) -> &Account {
		&self.owner
	}

	pub fn spender(&self) -> &Account {
		&self.spender
	}

	pub fn recipient(&self) -> &Account {
		&self.recipient
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use relay_types::parse_address;

	#[tokio::test]
	async fn test_watch_only_account_cannot_sign() {
		let addr = parse_address("0x70997970c51812dc3a010c7d01b50e0d17dc79c8").unwrap();
		let account = Account::watch_only(addr.clone());
		assert!(!account.can_sign());
		assert_eq!(account.address(), &addr);

		let result = account.sign_digest(&B256::ZERO).await;
		assert!(matches!(result, Err(AccountError::SigningUnavailable)));
	}
}
