//! Alloy-based primary-ledger implementation.
//!
//! This implementation uses the Alloy library to call and transact against
//! the deployed token contract over HTTP. State-changing calls are signed
//! by the spender's wallet, which is what makes the flow gasless for the
//! owner.

use crate::{abi, ChainError, ChainInterface};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address as AlloyAddress, FixedBytes, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport_http::Http;
use async_trait::async_trait;
use relay_types::{
	with_0x_prefix, Address, SecretString, Signature, TokenConfig, TransactionHash,
	TransactionReceipt,
};
use std::sync::Arc;

fn to_alloy_address(address: &Address) -> AlloyAddress {
	AlloyAddress::from(address.to_fixed())
}

/// Alloy-based token contract client.
///
/// Holds one HTTP provider wired to the spender's wallet, so every
/// submitted transaction is paid for by the spender.
pub struct AlloyChain {
	/// Alloy provider for the configured network.
	provider: Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
	/// Deployed token contract address.
	token: AlloyAddress,
}

impl AlloyChain {
	/// Creates a new AlloyChain instance against the configured token.
	///
	/// The spender key becomes the wallet of the provider; the owner never
	/// submits anything directly.
	pub fn new(token: &TokenConfig, spender_key: &SecretString) -> Result<Self, ChainError> {
		let url = token
			.rpc_url
			.parse()
			.map_err(|e| ChainError::Network(format!("Invalid RPC URL: {}", e)))?;

		let signer: PrivateKeySigner = spender_key.with_exposed(|key| {
			key.parse()
				.map_err(|_| ChainError::Network("Invalid spender private key format".to_string()))
		})?;
		let chain_signer = signer.with_chain_id(Some(token.chain_id));
		let wallet = EthereumWallet::from(chain_signer);

		let provider = ProviderBuilder::new()
			.with_recommended_fillers()
			.wallet(wallet)
			.on_http(url);

		Ok(Self {
			provider: Arc::new(provider) as Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
			token: to_alloy_address(&token.address),
		})
	}

	/// Issues a read-only call against the token contract.
	async fn call_token(&self, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
		let request = TransactionRequest::default()
			.to(self.token)
			.input(data.into());

		let result = self
			.provider
			.call(&request)
			.await
			.map_err(|e| ChainError::Network(format!("Call failed: {}", e)))?;

		Ok(result.to_vec())
	}

	/// Submits a state-changing transaction to the token contract.
	async fn send_token_tx(&self, data: Vec<u8>) -> Result<TransactionHash, ChainError> {
		let request = TransactionRequest::default()
			.to(self.token)
			.input(data.into());

		// The provider's wallet handles signing and nonce management.
		let pending_tx = self
			.provider
			.send_transaction(request)
			.await
			.map_err(|e| ChainError::Network(format!("Failed to send transaction: {}", e)))?;

		let tx_hash = *pending_tx.tx_hash();
		tracing::info!(
			tx_hash = %with_0x_prefix(&hex::encode(tx_hash.0)),
			"Submitted transaction"
		);

		Ok(TransactionHash(tx_hash.0.to_vec()))
	}
}

#[async_trait]
impl ChainInterface for AlloyChain {
	async fn chain_id(&self) -> Result<u64, ChainError> {
		self.provider
			.get_chain_id()
			.await
			.map_err(|e| ChainError::Network(format!("Failed to get chain id: {}", e)))
	}

	async fn token_name(&self) -> Result<String, ChainError> {
		let result = self.call_token(abi::encode_name()).await?;
		abi::decode_string(&result).map_err(ChainError::Network)
	}

	async fn balance_of(&self, address: &Address) -> Result<U256, ChainError> {
		let result = self.call_token(abi::encode_balance_of(address)).await?;
		abi::decode_u256(&result).map_err(ChainError::Network)
	}

	async fn allowance(&self, owner: &Address, spender: &Address) -> Result<U256, ChainError> {
		let result = self.call_token(abi::encode_allowance(owner, spender)).await?;
		abi::decode_u256(&result).map_err(ChainError::Network)
	}

	async fn nonces(&self, owner: &Address) -> Result<U256, ChainError> {
		let result = self.call_token(abi::encode_nonces(owner)).await?;
		abi::decode_u256(&result).map_err(ChainError::Network)
	}

	async fn submit_permit(
		&self,
		owner: &Address,
		spender: &Address,
		value: U256,
		deadline: U256,
		signature: &Signature,
	) -> Result<TransactionHash, ChainError> {
		self.send_token_tx(abi::encode_permit(owner, spender, value, deadline, signature))
			.await
	}

	async fn submit_transfer_from(
		&self,
		from: &Address,
		to: &Address,
		value: U256,
	) -> Result<TransactionHash, ChainError> {
		self.send_token_tx(abi::encode_transfer_from(from, to, value))
			.await
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, ChainError> {
		let tx_hash = FixedBytes::<32>::from_slice(&hash.0);

		// Poll interval for checking confirmations; local dev chains mine
		// fast, so keep it tight.
		let poll_interval = tokio::time::Duration::from_secs(2);
		let seconds_per_confirmation = 15;
		let max_timeout = 600;
		let timeout_seconds = (confirmations * seconds_per_confirmation)
			.max(seconds_per_confirmation)
			.min(max_timeout);
		let max_wait_time = tokio::time::Duration::from_secs(timeout_seconds);
		let start_time = tokio::time::Instant::now();

		tracing::debug!(
			"Waiting for {} confirmations (timeout: {}s)",
			confirmations,
			timeout_seconds
		);

		loop {
			if start_time.elapsed() > max_wait_time {
				return Err(ChainError::Network(format!(
					"Timeout waiting for {} confirmations after {} seconds",
					confirmations,
					max_wait_time.as_secs()
				)));
			}

			let receipt = match self.provider.get_transaction_receipt(tx_hash).await {
				Ok(Some(receipt)) => receipt,
				Ok(None) => {
					// Transaction not yet mined, wait and retry
					tokio::time::sleep(poll_interval).await;
					continue;
				},
				Err(e) => {
					return Err(ChainError::Network(format!("Failed to get receipt: {}", e)));
				},
			};

			let current_block = self
				.provider
				.get_block_number()
				.await
				.map_err(|e| ChainError::Network(format!("Failed to get block number: {}", e)))?;

			let tx_block = receipt.block_number.unwrap_or(0);
			let current_confirmations = current_block.saturating_sub(tx_block);

			if current_confirmations >= confirmations.saturating_sub(1) {
				return Ok(TransactionReceipt {
					hash: TransactionHash(receipt.transaction_hash.0.to_vec()),
					block_number: tx_block,
					success: receipt.status(),
				});
			}

			tokio::time::sleep(poll_interval).await;
		}
	}
}

/// Factory function to create the HTTP chain client from configuration.
pub fn create_chain(
	token: &TokenConfig,
	spender_key: &SecretString,
) -> Result<Box<dyn ChainInterface>, ChainError> {
	Ok(Box::new(AlloyChain::new(token, spender_key)?))
}
