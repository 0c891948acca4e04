//! Account identity and signature types for the relay system.
//!
//! This module defines the address representation shared by the fallback
//! ledger, the chain client, and the permit builder, together with the
//! decomposed signature form required for on-chain permit redemption.

use crate::utils::{with_0x_prefix, without_0x_prefix};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 20-byte account identifier.
///
/// Stored as raw bytes to avoid repeated hex round-trips; serialized as a
/// lowercase `0x`-prefixed hex string. Every constructor validates the
/// length, so a value of this type always holds exactly 20 bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Address(pub Vec<u8>);

impl Address {
	/// Returns the last 20 bytes of the identifier as a fixed-size array,
	/// left-padding with zeros if the stored value is shorter.
	pub fn to_fixed(&self) -> [u8; 20] {
		let mut out = [0u8; 20];
		if self.0.len() >= 20 {
			out.copy_from_slice(&self.0[self.0.len() - 20..]);
		} else {
			out[20 - self.0.len()..].copy_from_slice(&self.0);
		}
		out
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", with_0x_prefix(&hex::encode(&self.0)))
	}
}

impl fmt::Debug for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Address({})", self)
	}
}

impl Serialize for Address {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&with_0x_prefix(&hex::encode(&self.0)))
	}
}

impl<'de> Deserialize<'de> for Address {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		parse_address(&s).map_err(serde::de::Error::custom)
	}
}

impl std::str::FromStr for Address {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse_address(s)
	}
}

/// Parses a 20-byte address from a hex string with optional `0x` prefix.
pub fn parse_address(s: &str) -> Result<Address, String> {
	let bytes = hex::decode(without_0x_prefix(s))
		.map_err(|e| format!("Invalid hex in address '{}': {}", s, e))?;
	if bytes.len() != 20 {
		return Err(format!(
			"Address must be 20 bytes, got {} in '{}'",
			bytes.len(),
			s
		));
	}
	Ok(Address(bytes))
}

/// Secp256k1 signature decomposed into its three fixed-width components.
///
/// This is the form the on-chain `permit(owner, spender, value, deadline,
/// v, r, s)` entry point consumes. `v` is normalized to the legacy 27/28
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
	pub v: u8,
	pub r: [u8; 32],
	pub s: [u8; 32],
}

impl Signature {
	/// Splits a 65-byte `r || s || v` signature blob into components.
	///
	/// Accepts `v` as either a raw recovery id (0/1) or the legacy 27/28
	/// form and normalizes to 27/28.
	pub fn from_rsv_bytes(bytes: &[u8]) -> Result<Self, String> {
		if bytes.len() != 65 {
			return Err(format!("Signature must be 65 bytes, got {}", bytes.len()));
		}
		let mut r = [0u8; 32];
		let mut s = [0u8; 32];
		r.copy_from_slice(&bytes[0..32]);
		s.copy_from_slice(&bytes[32..64]);
		let v = if bytes[64] < 27 { bytes[64] + 27 } else { bytes[64] };
		Ok(Signature { v, r, s })
	}

	/// Reassembles the components into the 65-byte `r || s || v` form.
	pub fn to_rsv_bytes(&self) -> [u8; 65] {
		let mut out = [0u8; 65];
		out[0..32].copy_from_slice(&self.r);
		out[32..64].copy_from_slice(&self.s);
		out[64] = self.v;
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_address_accepts_prefixed_and_bare() {
		let bare = parse_address("5fbdb2315678afecb367f032d93f642f64180aa3").unwrap();
		let prefixed = parse_address("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap();
		assert_eq!(bare, prefixed);
		assert_eq!(
			prefixed.to_string(),
			"0x5fbdb2315678afecb367f032d93f642f64180aa3"
		);
	}

	#[test]
	fn test_parse_address_rejects_bad_input() {
		assert!(parse_address("0x1234").is_err());
		assert!(parse_address("not hex").is_err());
	}

	#[test]
	fn test_address_serde_round_trip() {
		let addr = parse_address("0x5fbdb2315678afecb367f032d93f642f64180aa3").unwrap();
		let json = serde_json::to_string(&addr).unwrap();
		assert_eq!(json, "\"0x5fbdb2315678afecb367f032d93f642f64180aa3\"");
		let back: Address = serde_json::from_str(&json).unwrap();
		assert_eq!(back, addr);
	}

	#[test]
	fn test_signature_split_normalizes_v() {
		let mut raw = [0u8; 65];
		raw[0] = 0xaa;
		raw[32] = 0xbb;
		raw[64] = 1;
		let sig = Signature::from_rsv_bytes(&raw).unwrap();
		assert_eq!(sig.v, 28);
		assert_eq!(sig.r[0], 0xaa);
		assert_eq!(sig.s[0], 0xbb);

		raw[64] = 27;
		let sig = Signature::from_rsv_bytes(&raw).unwrap();
		assert_eq!(sig.v, 27);
	}

	#[test]
	fn test_signature_round_trip() {
		let mut raw = [7u8; 65];
		raw[64] = 28;
		let sig = Signature::from_rsv_bytes(&raw).unwrap();
		assert_eq!(sig.to_rsv_bytes(), raw);
	}

	#[test]
	fn test_signature_rejects_short_input() {
		assert!(Signature::from_rsv_bytes(&[0u8; 64]).is_err());
	}
}
