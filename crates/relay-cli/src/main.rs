//! Main entry point for the permit relay.
//!
//! This binary drives the complete gasless-transfer flow against a
//! configured token contract: query the owner's balance, redeem a signed
//! permit from the spender's wallet, then execute a delegated transfer to
//! the recipient. Primary-ledger failures degrade to the in-memory
//! fallback ledger according to the configured dispatch mode.

use alloy_primitives::U256;
use clap::Parser;
use relay_account::AccountRegistry;
use relay_chain::{implementations::alloy::create_chain, ChainService};
use relay_config::Config;
use relay_core::Dispatcher;
use relay_ledger::FallbackLedger;
use relay_types::{truncate_id, with_0x_prefix};
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line arguments for the relay.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	/// Transfer value in base units (default 0.1 token)
	#[arg(short, long, default_value = "100000000000000000")]
	value: String,
}

/// Main entry point for the relay.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Wires up the chain client, account registry, and fallback ledger
/// 5. Runs the gasless transfer flow
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt().with_env_filter(env_filter).with_target(true).init();

	let config = Config::from_file(args.config.to_str().unwrap_or("config.toml"))?;
	tracing::info!(token = %config.token.address, "Loaded configuration");

	let value: U256 = args
		.value
		.parse()
		.map_err(|e| format!("Invalid transfer value '{}': {}", args.value, e))?;

	run_gasless_flow(config, value).await
}

/// Drives balance query, permit redemption, and delegated transfer.
async fn run_gasless_flow(config: Config, value: U256) -> Result<(), Box<dyn std::error::Error>> {
	let chain = Arc::new(ChainService::new(create_chain(
		&config.token,
		&config.accounts.spender_private_key,
	)?));
	let registry = Arc::new(AccountRegistry::from_keys(
		&config.accounts.owner_private_key,
		&config.accounts.spender_private_key,
		config.accounts.recipient_address.clone(),
	)?);
	let ledger = Arc::new(FallbackLedger::new());

	let owner = registry.owner().address().clone();
	let spender = registry.spender().address().clone();
	let recipient = registry.recipient().address().clone();

	let dispatcher = Dispatcher::new(
		chain,
		ledger,
		Arc::clone(&registry),
		config.token.clone(),
		config.dispatch.clone(),
	);

	let balance = dispatcher.get_balance(&owner).await?;
	tracing::info!(owner = %owner, balance = %balance, "Owner token balance");

	dispatcher.redeem_permit().await?;
	let allowance = dispatcher.get_allowance(&owner, &spender).await?;
	tracing::info!(spender = %spender, allowance = %allowance, "Spender authorized");

	let handle = dispatcher.transfer_from(&owner, &recipient, value).await?;
	tracing::info!(
		tx_hash = %truncate_id(&with_0x_prefix(&hex::encode(&handle.hash.0))),
		origin = ?handle.origin,
		finalized = handle.is_finalized(),
		"Delegated transfer dispatched"
	);

	let owner_after = dispatcher.get_balance(&owner).await?;
	let recipient_after = dispatcher.get_balance(&recipient).await?;
	tracing::info!(
		owner_balance = %owner_after,
		recipient_balance = %recipient_after,
		"Final ledger view"
	);

	Ok(())
}
