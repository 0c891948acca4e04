//! Configuration module for the permit relay system.
//!
//! This module provides structures and utilities for managing relay
//! configuration. It supports loading configuration from TOML files with
//! `${VAR}` environment-variable substitution and validates that all
//! required values are properly set before any service is built.

use regex::Regex;
use relay_types::{without_0x_prefix, Address, SecretString};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub use relay_types::TokenConfig;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the permit relay.
///
/// Contains the token contract identity, the participant accounts, and the
/// dispatch policy the dual-path dispatcher runs under.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Token contract and network identity.
	pub token: TokenConfig,
	/// Participant accounts: owner, spender, recipient.
	pub accounts: AccountsConfig,
	/// Dispatch policy for the dual-path dispatcher.
	#[serde(default)]
	pub dispatch: DispatchConfig,
}

/// Participant account configuration.
///
/// Private keys support `${VAR}` / `${VAR:-default}` substitution so they
/// never have to appear in the file itself. The recipient is an address
/// only; it carries no signing capability.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountsConfig {
	/// Private key of the token owner (the permit signer).
	pub owner_private_key: SecretString,
	/// Private key of the spender (the gas-paying relayer).
	pub spender_private_key: SecretString,
	/// Address receiving delegated transfers.
	pub recipient_address: Address,
}

/// Dispatch policy selected by the caller.
///
/// Degraded mode absorbs primary-ledger failures into deterministic local
/// results; strict mode surfaces them as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
	Degraded,
	Strict,
}

/// Configuration for the dual-path dispatcher.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchConfig {
	/// Operating mode; degraded by default, matching the simulation usage.
	#[serde(default = "default_mode")]
	pub mode: DispatchMode,
	/// Confirmations required before a primary transaction counts as final.
	#[serde(default = "default_confirmations")]
	pub min_confirmations: u64,
}

impl Default for DispatchConfig {
	fn default() -> Self {
		Self {
			mode: default_mode(),
			min_confirmations: default_confirmations(),
		}
	}
}

fn default_mode() -> DispatchMode {
	DispatchMode::Degraded
}

/// Returns the default number of confirmations required.
fn default_confirmations() -> u64 {
	1
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).unwrap();
		let var_name = cap.get(1).unwrap().as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => {
				if let Some(default) = default_value {
					default.to_string()
				} else {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)));
				}
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

/// Checks that a secret is a 32-byte hex private key with optional prefix.
fn validate_private_key(label: &str, key: &SecretString) -> Result<(), ConfigError> {
	key.with_exposed(|raw| {
		let bare = without_0x_prefix(raw);
		if bare.len() != 64 || hex::decode(bare).is_err() {
			return Err(ConfigError::Validation(format!(
				"{} must be a 32-byte hex private key",
				label
			)));
		}
		Ok(())
	})
}

impl Config {
	/// Loads configuration from a TOML file, resolving environment
	/// variables and validating the result.
	pub fn from_file(path: &str) -> Result<Self, ConfigError> {
		let raw = std::fs::read_to_string(path)?;
		raw.parse()
	}

	/// Validates the configuration to ensure all required fields are
	/// properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.token.rpc_url.is_empty() {
			return Err(ConfigError::Validation("Token rpc_url cannot be empty".into()));
		}
		if self.token.chain_id == 0 {
			return Err(ConfigError::Validation("Token chain_id must be non-zero".into()));
		}
		if self.token.name.is_empty() {
			return Err(ConfigError::Validation("Token name cannot be empty".into()));
		}

		validate_private_key("owner_private_key", &self.accounts.owner_private_key)?;
		validate_private_key("spender_private_key", &self.accounts.spender_private_key)?;

		if self.dispatch.min_confirmations == 0 {
			return Err(ConfigError::Validation(
				"min_confirmations must be at least 1".into(),
			));
		}
		if self.dispatch.min_confirmations > 100 {
			return Err(ConfigError::Validation(
				"min_confirmations cannot exceed 100".into(),
			));
		}

		Ok(())
	}
}

/// Implementation of FromStr for Config to enable parsing from string.
///
/// Environment variables are resolved and the configuration is validated
/// after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const VALID_CONFIG: &str = r#"
[token]
address = "0x5fbdb2315678afecb367f032d93f642f64180aa3"
rpc_url = "http://127.0.0.1:7545"
chain_id = 1337
name = "MyGasslessToken"

[accounts]
owner_private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
spender_private_key = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d"
recipient_address = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8"
"#;

	#[test]
	fn test_parse_valid_config_applies_defaults() {
		let config: Config = VALID_CONFIG.parse().unwrap();
		assert_eq!(config.token.name, "MyGasslessToken");
		assert_eq!(config.token.version, "1");
		assert_eq!(config.dispatch.mode, DispatchMode::Degraded);
		assert_eq!(config.dispatch.min_confirmations, 1);
	}

	#[test]
	fn test_parse_strict_mode() {
		let with_dispatch = format!(
			"{}\n[dispatch]\nmode = \"strict\"\nmin_confirmations = 3\n",
			VALID_CONFIG
		);
		let config: Config = with_dispatch.parse().unwrap();
		assert_eq!(config.dispatch.mode, DispatchMode::Strict);
		assert_eq!(config.dispatch.min_confirmations, 3);
	}

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("TEST_RELAY_RPC", "http://localhost:8545");
		let input = "rpc_url = \"${TEST_RELAY_RPC}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "rpc_url = \"http://localhost:8545\"");
		std::env::remove_var("TEST_RELAY_RPC");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${MISSING_RELAY_VAR:-default_value}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"default_value\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${MISSING_RELAY_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("MISSING_RELAY_VAR"));
	}

	#[test]
	fn test_invalid_token_address_rejected() {
		let bad = VALID_CONFIG.replace(
			"0x5fbdb2315678afecb367f032d93f642f64180aa3",
			"0x1234",
		);
		let result: Result<Config, _> = bad.parse();
		assert!(result.is_err());
	}

	#[test]
	fn test_short_private_key_rejected() {
		let bad = VALID_CONFIG.replace(
			"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
			"0xdeadbeef",
		);
		let result: Result<Config, _> = bad.parse();
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("owner_private_key"));
	}

	#[test]
	fn test_zero_confirmations_rejected() {
		let bad = format!("{}\n[dispatch]\nmin_confirmations = 0\n", VALID_CONFIG);
		let result: Result<Config, _> = bad.parse();
		assert!(result.is_err());
	}

	#[test]
	fn test_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("relay.toml");
		std::fs::write(&path, VALID_CONFIG).unwrap();

		let config = Config::from_file(path.to_str().unwrap()).unwrap();
		assert_eq!(config.token.chain_id, 1337);
		assert_eq!(
			config.accounts.recipient_address.to_string(),
			"0x70997970c51812dc3a010c7d01b50e0d17dc79c8"
		);
	}

	#[test]
	fn test_config_with_env_var_key() {
		std::env::set_var(
			"TEST_RELAY_OWNER_KEY",
			"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
		);
		let with_env = VALID_CONFIG.replace(
			"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
			"${TEST_RELAY_OWNER_KEY}",
		);
		let config: Config = with_env.parse().unwrap();
		assert!(config
			.accounts
			.owner_private_key
			.expose_secret()
			.starts_with("0xac0974bec"));
		std::env::remove_var("TEST_RELAY_OWNER_KEY");
	}
}
