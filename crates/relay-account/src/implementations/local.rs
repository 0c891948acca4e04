//! Local private-key signing capability.
//!
//! Wraps an in-process secp256k1 signer for test and simulation use. A
//! production deployment would put a hardware or remote signer behind the
//! same interface.

use crate::{AccountError, SigningCapability};
use alloy_primitives::B256;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use relay_types::{Address, SecretString, Signature};

/// Signing capability backed by a locally held private key.
pub struct LocalSigner {
	inner: PrivateKeySigner,
}

impl LocalSigner {
	/// Parses a hex private key (with or without 0x prefix) into a signer.
	pub fn from_private_key(key: &SecretString) -> Result<Self, AccountError> {
		let inner: PrivateKeySigner = key.with_exposed(|raw| {
			raw.parse()
				.map_err(|_| AccountError::InvalidKey("Invalid private key format".to_string()))
		})?;
		Ok(Self { inner })
	}
}

#[async_trait]
impl SigningCapability for LocalSigner {
	fn address(&self) -> Address {
		Address(self.inner.address().as_slice().to_vec())
	}

	async fn sign_digest(&self, digest: &B256) -> Result<Signature, AccountError> {
		let signature = self
			.inner
			.sign_hash(digest)
			.await
			.map_err(|e| AccountError::SigningFailed(e.to_string()))?;

		Signature::from_rsv_bytes(&signature.as_bytes()).map_err(AccountError::SigningFailed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::keccak256;

	// First two well-known anvil/hardhat dev keys.
	const OWNER_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
	const OWNER_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

	#[test]
	fn test_address_derivation() {
		let signer = LocalSigner::from_private_key(&SecretString::from(OWNER_KEY)).unwrap();
		assert_eq!(signer.address().to_string(), OWNER_ADDRESS);
	}

	#[test]
	fn test_rejects_malformed_key() {
		let result = LocalSigner::from_private_key(&SecretString::from("0xdeadbeef"));
		assert!(matches!(result, Err(AccountError::InvalidKey(_))));
	}

	#[tokio::test]
	async fn test_sign_digest_components_are_well_formed() {
		let signer = LocalSigner::from_private_key(&SecretString::from(OWNER_KEY)).unwrap();
		let digest = keccak256(b"permit digest");

		let sig = signer.sign_digest(&digest).await.unwrap();
		assert!(sig.v == 27 || sig.v == 28);
		assert_ne!(sig.r, [0u8; 32]);
		assert_ne!(sig.s, [0u8; 32]);
	}

	#[tokio::test]
	async fn test_signing_is_deterministic_per_digest() {
		let signer = LocalSigner::from_private_key(&SecretString::from(OWNER_KEY)).unwrap();
		let digest = keccak256(b"same message");

		let first = signer.sign_digest(&digest).await.unwrap();
		let second = signer.sign_digest(&digest).await.unwrap();
		// RFC 6979 deterministic nonces: identical digest, identical signature.
		assert_eq!(first, second);

		let other = signer.sign_digest(&keccak256(b"other message")).await.unwrap();
		assert_ne!(first, other);
	}
}
