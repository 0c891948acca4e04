//! EIP-712 hashing primitives for permit authorization.
//!
//! These helpers provide:
//! - Domain hash computation for the token's signing domain
//! - Struct hash computation for the five-field `Permit` message
//! - Final digest computation (0x1901 || domainHash || structHash)
//! - A minimal ABI encoder for the static field types involved

use crate::account::Address;
use alloy_primitives::{keccak256, B256, U256};

/// EIP-712 domain type string for an ERC-2612 token domain.
pub const DOMAIN_TYPE: &str =
	"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Type string of the `Permit` message: owner, spender, value, nonce, deadline.
pub const PERMIT_TYPE: &str =
	"Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)";

/// Compute the EIP-712 domain hash
/// (keccak256(abi.encode(typeHash, nameHash, versionHash, chainId, verifyingContract))).
pub fn compute_domain_hash(
	name: &str,
	version: &str,
	chain_id: u64,
	verifying_contract: &Address,
) -> B256 {
	let mut enc = Eip712AbiEncoder::new();
	enc.push_b256(&keccak256(DOMAIN_TYPE.as_bytes()));
	enc.push_b256(&keccak256(name.as_bytes()));
	enc.push_b256(&keccak256(version.as_bytes()));
	enc.push_u256(U256::from(chain_id));
	enc.push_address(verifying_contract);
	keccak256(enc.finish())
}

/// Compute the struct hash of a `Permit` message.
pub fn compute_permit_struct_hash(
	owner: &Address,
	spender: &Address,
	value: U256,
	nonce: U256,
	deadline: U256,
) -> B256 {
	let mut enc = Eip712AbiEncoder::new();
	enc.push_b256(&keccak256(PERMIT_TYPE.as_bytes()));
	enc.push_address(owner);
	enc.push_address(spender);
	enc.push_u256(value);
	enc.push_u256(nonce);
	enc.push_u256(deadline);
	keccak256(enc.finish())
}

/// Compute the final EIP-712 digest: keccak256(0x1901 || domainHash || structHash).
pub fn compute_final_digest(domain_hash: &B256, struct_hash: &B256) -> B256 {
	let mut out = Vec::with_capacity(2 + 32 + 32);
	out.push(0x19);
	out.push(0x01);
	out.extend_from_slice(domain_hash.as_slice());
	out.extend_from_slice(struct_hash.as_slice());
	keccak256(out)
}

/// Minimal ABI encoder for the static types used in EIP-712 struct hashing.
///
/// Every pushed value occupies exactly one 32-byte word; addresses are
/// left-padded with zeros.
#[derive(Default)]
pub struct Eip712AbiEncoder {
	buf: Vec<u8>,
}

impl Eip712AbiEncoder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push_b256(&mut self, v: &B256) {
		self.buf.extend_from_slice(v.as_slice());
	}

	pub fn push_address(&mut self, addr: &Address) {
		let mut word = [0u8; 32];
		word[12..].copy_from_slice(&addr.to_fixed());
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u256(&mut self, v: U256) {
		self.buf.extend_from_slice(&v.to_be_bytes::<32>());
	}

	pub fn finish(self) -> Vec<u8> {
		self.buf
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::account::parse_address;

	fn contract() -> Address {
		parse_address("0x5fbdb2315678afecb367f032d93f642f64180aa3").unwrap()
	}

	#[test]
	fn test_domain_hash_is_deterministic() {
		let a = compute_domain_hash("MyGasslessToken", "1", 1337, &contract());
		let b = compute_domain_hash("MyGasslessToken", "1", 1337, &contract());
		assert_eq!(a, b);
	}

	#[test]
	fn test_domain_hash_binds_every_field() {
		let base = compute_domain_hash("MyGasslessToken", "1", 1337, &contract());
		assert_ne!(
			base,
			compute_domain_hash("OtherToken", "1", 1337, &contract())
		);
		assert_ne!(
			base,
			compute_domain_hash("MyGasslessToken", "2", 1337, &contract())
		);
		assert_ne!(
			base,
			compute_domain_hash("MyGasslessToken", "1", 1, &contract())
		);
		let other = parse_address("0x0000000000000000000000000000000000000001").unwrap();
		assert_ne!(base, compute_domain_hash("MyGasslessToken", "1", 1337, &other));
	}

	#[test]
	fn test_permit_struct_hash_binds_nonce_and_deadline() {
		let owner = parse_address("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap();
		let spender = parse_address("0x70997970c51812dc3a010c7d01b50e0d17dc79c8").unwrap();
		let value = U256::from(1_000u64);

		let base =
			compute_permit_struct_hash(&owner, &spender, value, U256::ZERO, U256::MAX);
		let bumped_nonce =
			compute_permit_struct_hash(&owner, &spender, value, U256::from(1), U256::MAX);
		let near_deadline =
			compute_permit_struct_hash(&owner, &spender, value, U256::ZERO, U256::from(99));
		assert_ne!(base, bumped_nonce);
		assert_ne!(base, near_deadline);
	}

	#[test]
	fn test_final_digest_has_eip191_prefix_semantics() {
		let domain = compute_domain_hash("MyGasslessToken", "1", 1337, &contract());
		let owner = parse_address("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap();
		let spender = parse_address("0x70997970c51812dc3a010c7d01b50e0d17dc79c8").unwrap();
		let structure =
			compute_permit_struct_hash(&owner, &spender, U256::from(1), U256::ZERO, U256::MAX);

		// Digest must differ from both inputs and be stable.
		let digest = compute_final_digest(&domain, &structure);
		assert_ne!(digest, domain);
		assert_ne!(digest, structure);
		assert_eq!(digest, compute_final_digest(&domain, &structure));
	}

	#[test]
	fn test_encoder_word_alignment() {
		let mut enc = Eip712AbiEncoder::new();
		enc.push_address(&contract());
		enc.push_u256(U256::from(42));
		let words = enc.finish();
		assert_eq!(words.len(), 64);
		// Address occupies the low 20 bytes of its word.
		assert_eq!(&words[0..12], &[0u8; 12]);
		assert_eq!(&words[12..32], contract().to_fixed());
		assert_eq!(words[63], 42);
	}
}
