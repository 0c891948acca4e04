//! Token contract and network identity configuration.
//!
//! Defines the settings the relay needs to talk to the deployed token
//! contract: where it lives, which chain it is on, and the identity fields
//! of its EIP-712 signing domain.

use crate::account::Address;
use serde::{Deserialize, Serialize};

/// Configuration for the token contract the relay operates against.
///
/// `chain_id` doubles as the locally cached default used when live chain-id
/// resolution fails; `name` is the signing-domain fallback when the
/// on-chain `name()` call cannot be reached.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
	/// Address of the deployed token contract.
	pub address: Address,
	/// RPC endpoint of the primary ledger.
	pub rpc_url: String,
	/// Chain id of the network the contract is deployed on.
	pub chain_id: u64,
	/// Token name for the signing domain when `name()` is unreachable.
	#[serde(default = "default_token_name")]
	pub name: String,
	/// EIP-712 domain version.
	#[serde(default = "default_domain_version")]
	pub version: String,
}

fn default_token_name() -> String {
	"Token".to_string()
}

fn default_domain_version() -> String {
	"1".to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_deserialize_applies_domain_defaults() {
		let toml_str = r#"
address = "0x5fbdb2315678afecb367f032d93f642f64180aa3"
rpc_url = "http://127.0.0.1:7545"
chain_id = 1337
"#;
		let config: TokenConfig = toml::from_str(toml_str).unwrap();
		assert_eq!(config.name, "Token");
		assert_eq!(config.version, "1");
		assert_eq!(config.chain_id, 1337);
	}

	#[test]
	fn test_deserialize_rejects_malformed_address() {
		let toml_str = r#"
address = "0x1234"
rpc_url = "http://127.0.0.1:7545"
chain_id = 1337
"#;
		assert!(toml::from_str::<TokenConfig>(toml_str).is_err());
	}
}
