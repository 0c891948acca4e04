//! Structured authorization builder.
//!
//! Assembles the EIP-712 domain and `Permit` message for a gasless
//! authorization and obtains the owner's signature over the resulting
//! digest. Pure apart from the one signing call; chain-id and nonce
//! resolution are the dispatcher's concern.

use alloy_primitives::{B256, U256};
use relay_account::{Account, AccountError};
use relay_types::{
	compute_domain_hash, compute_final_digest, compute_permit_struct_hash, Address, Signature,
};

/// EIP-712 signing domain of the target token contract.
#[derive(Debug, Clone)]
pub struct PermitDomain {
	/// Token name as reported by the contract.
	pub name: String,
	/// Domain version string.
	pub version: String,
	/// Chain id the contract is deployed on.
	pub chain_id: u64,
	/// Address of the verifying contract.
	pub verifying_contract: Address,
}

impl PermitDomain {
	/// Computes the domain separator hash.
	pub fn separator(&self) -> B256 {
		compute_domain_hash(
			&self.name,
			&self.version,
			self.chain_id,
			&self.verifying_contract,
		)
	}
}

/// The five-field `Permit` message to be signed by the owner.
#[derive(Debug, Clone)]
pub struct PermitMessage {
	/// Token owner granting the authorization.
	pub owner: Address,
	/// Spender being authorized.
	pub spender: Address,
	/// Authorized value in base units.
	pub value: U256,
	/// Owner-scoped permit nonce.
	pub nonce: U256,
	/// Expiry instant, or the no-expiry sentinel.
	pub deadline: U256,
}

impl PermitMessage {
	/// Computes the final EIP-712 digest for this message under a domain.
	pub fn digest(&self, domain: &PermitDomain) -> B256 {
		let struct_hash = compute_permit_struct_hash(
			&self.owner,
			&self.spender,
			self.value,
			self.nonce,
			self.deadline,
		);
		compute_final_digest(&domain.separator(), &struct_hash)
	}
}

/// Builds the permit digest and obtains the owner's signature over it.
///
/// Fails with [`AccountError::SigningUnavailable`] if the owner account
/// has no signing capability; there is no fallback for that.
pub async fn build_and_sign(
	owner: &Account,
	domain: &PermitDomain,
	message: &PermitMessage,
) -> Result<Signature, AccountError> {
	let digest = message.digest(domain);
	owner.sign_digest(&digest).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use relay_types::{parse_address, DEADLINE_NO_EXPIRY, ONE_TOKEN, SecretString};

	const OWNER_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	fn domain() -> PermitDomain {
		PermitDomain {
			name: "MyGasslessToken".to_string(),
			version: "1".to_string(),
			chain_id: 1337,
			verifying_contract: parse_address("0x5fbdb2315678afecb367f032d93f642f64180aa3")
				.unwrap(),
		}
	}

	fn message() -> PermitMessage {
		PermitMessage {
			owner: parse_address("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap(),
			spender: parse_address("0x70997970c51812dc3a010c7d01b50e0d17dc79c8").unwrap(),
			value: ONE_TOKEN,
			nonce: U256::ZERO,
			deadline: DEADLINE_NO_EXPIRY,
		}
	}

	#[test]
	fn test_digest_is_stable_and_binds_nonce() {
		let base = message().digest(&domain());
		assert_eq!(base, message().digest(&domain()));

		let mut bumped = message();
		bumped.nonce = U256::from(1);
		assert_ne!(base, bumped.digest(&domain()));
	}

	#[test]
	fn test_digest_binds_domain_chain_id() {
		let mut other_chain = domain();
		other_chain.chain_id = 1;
		assert_ne!(message().digest(&domain()), message().digest(&other_chain));
	}

	#[tokio::test]
	async fn test_build_and_sign_with_local_owner() {
		let owner = Account::with_signer(std::sync::Arc::new(
			relay_account::implementations::local::LocalSigner::from_private_key(
				&SecretString::from(OWNER_KEY),
			)
			.unwrap(),
		));

		let sig = build_and_sign(&owner, &domain(), &message()).await.unwrap();
		assert!(sig.v == 27 || sig.v == 28);

		// Deterministic signing: same digest, same signature.
		let again = build_and_sign(&owner, &domain(), &message()).await.unwrap();
		assert_eq!(sig, again);
	}

	#[tokio::test]
	async fn test_build_and_sign_requires_signing_capability() {
		let owner = Account::watch_only(
			parse_address("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap(),
		);
		let result = build_and_sign(&owner, &domain(), &message()).await;
		assert!(matches!(result, Err(AccountError::SigningUnavailable)));
	}
}
