//! Call data encoding for the token contract surface.
//!
//! The relay only touches six entry points, so call data is assembled by
//! hand from the canonical function selectors rather than pulling in a
//! full ABI code generator. Every argument is a single 32-byte word.

use alloy_primitives::U256;
use relay_types::{Address, Signature};

// Canonical ERC-20 / ERC-2612 function selectors.
const SELECTOR_NAME: [u8; 4] = [0x06, 0xfd, 0xde, 0x03];
const SELECTOR_BALANCE_OF: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
const SELECTOR_ALLOWANCE: [u8; 4] = [0xdd, 0x62, 0xed, 0x3e];
const SELECTOR_NONCES: [u8; 4] = [0x7e, 0xce, 0xbe, 0x00];
const SELECTOR_PERMIT: [u8; 4] = [0xd5, 0x05, 0xac, 0xcf];
const SELECTOR_TRANSFER_FROM: [u8; 4] = [0x23, 0xb8, 0x72, 0xdd];

fn push_address_word(buf: &mut Vec<u8>, addr: &Address) {
	buf.extend_from_slice(&[0; 12]); // Pad to 32 bytes
	buf.extend_from_slice(&addr.to_fixed());
}

fn push_u256_word(buf: &mut Vec<u8>, value: U256) {
	buf.extend_from_slice(&value.to_be_bytes::<32>());
}

/// Encodes `name()`.
pub fn encode_name() -> Vec<u8> {
	SELECTOR_NAME.to_vec()
}

/// Encodes `balanceOf(address)`.
pub fn encode_balance_of(address: &Address) -> Vec<u8> {
	let mut data = SELECTOR_BALANCE_OF.to_vec();
	push_address_word(&mut data, address);
	data
}

/// Encodes `allowance(address,address)`.
pub fn encode_allowance(owner: &Address, spender: &Address) -> Vec<u8> {
	let mut data = SELECTOR_ALLOWANCE.to_vec();
	push_address_word(&mut data, owner);
	push_address_word(&mut data, spender);
	data
}

/// Encodes `nonces(address)`.
pub fn encode_nonces(owner: &Address) -> Vec<u8> {
	let mut data = SELECTOR_NONCES.to_vec();
	push_address_word(&mut data, owner);
	data
}

/// Encodes `permit(address,address,uint256,uint256,uint8,bytes32,bytes32)`.
pub fn encode_permit(
	owner: &Address,
	spender: &Address,
	value: U256,
	deadline: U256,
	signature: &Signature,
) -> Vec<u8> {
	let mut data = SELECTOR_PERMIT.to_vec();
	push_address_word(&mut data, owner);
	push_address_word(&mut data, spender);
	push_u256_word(&mut data, value);
	push_u256_word(&mut data, deadline);
	push_u256_word(&mut data, U256::from(signature.v));
	data.extend_from_slice(&signature.r);
	data.extend_from_slice(&signature.s);
	data
}

/// Encodes `transferFrom(address,address,uint256)`.
pub fn encode_transfer_from(from: &Address, to: &Address, value: U256) -> Vec<u8> {
	let mut data = SELECTOR_TRANSFER_FROM.to_vec();
	push_address_word(&mut data, from);
	push_address_word(&mut data, to);
	push_u256_word(&mut data, value);
	data
}

/// Decodes a single uint256 return value.
pub fn decode_u256(data: &[u8]) -> Result<U256, String> {
	if data.len() < 32 {
		return Err(format!("Expected 32-byte word, got {} bytes", data.len()));
	}
	Ok(U256::from_be_slice(&data[..32]))
}

/// Decodes an ABI-encoded string return value (offset, length, bytes).
pub fn decode_string(data: &[u8]) -> Result<String, String> {
	if data.len() < 64 {
		return Err(format!(
			"Expected at least 64 bytes for string head, got {}",
			data.len()
		));
	}
	let offset = U256::from_be_slice(&data[..32]);
	let offset: usize = offset
		.try_into()
		.map_err(|_| "String offset out of range".to_string())?;
	if data.len() < offset + 32 {
		return Err("String length word out of bounds".to_string());
	}
	let length = U256::from_be_slice(&data[offset..offset + 32]);
	let length: usize = length
		.try_into()
		.map_err(|_| "String length out of range".to_string())?;
	let start = offset + 32;
	if data.len() < start + length {
		return Err("String body out of bounds".to_string());
	}
	String::from_utf8(data[start..start + length].to_vec())
		.map_err(|e| format!("String is not valid UTF-8: {}", e))
}
