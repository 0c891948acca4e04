//! Dual-path dispatcher for the permit relay system.
//!
//! Every public operation tries the primary ledger first and, in degraded
//! mode, absorbs primary failures into deterministic local results backed
//! by the fallback ledger. The fallback ledger also acts as a
//! write-through cache on the healthy path, which is what makes repeated
//! queries idempotent: once an account has been touched, the primary
//! ledger is never consulted for it again in this session.
//!
//! Whether failures are absorbed or surfaced is decided by the
//! [`DispatchMode`] the caller opts into, never hard-coded here.

use crate::permit::{self, PermitDomain, PermitMessage};
use alloy_primitives::{keccak256, U256};
use relay_account::{AccountError, AccountRegistry};
use relay_chain::{ChainError, ChainService};
use relay_config::{DispatchConfig, DispatchMode};
use relay_ledger::FallbackLedger;
use relay_types::{
	truncate_id, with_0x_prefix, Address, TokenConfig, TransactionHandle, TransactionHash,
	TransactionReceipt, DEADLINE_NO_EXPIRY,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during dispatch operations.
///
/// In degraded mode only signing and allowance errors reach the caller;
/// network failures are absorbed into fallback results.
#[derive(Debug, Error)]
pub enum DispatchError {
	/// The primary ledger is unreachable or a call reverted.
	#[error("Network unavailable: {0}")]
	NetworkUnavailable(#[from] ChainError),
	/// The owner account cannot produce the required signature.
	#[error("Signing unavailable: {0}")]
	SigningUnavailable(#[from] AccountError),
	/// A delegated transfer exceeds the available allowance even after
	/// the permit cascade.
	#[error("Insufficient allowance: required {required}, available {available}")]
	InsufficientAllowance { required: U256, available: U256 },
}

/// Orchestrates balance/allowance queries, permit redemption, and
/// delegated transfers across the primary ledger and the fallback ledger.
///
/// The fallback ledger is an owned instance passed in by the caller, so
/// independent sessions never share simulation state.
pub struct Dispatcher {
	/// Primary-ledger client.
	chain: Arc<ChainService>,
	/// Fallback ledger, doubling as write-through cache.
	ledger: Arc<FallbackLedger>,
	/// The fixed owner/spender/recipient identities.
	registry: Arc<AccountRegistry>,
	/// Token contract identity, including the cached default chain id.
	token: TokenConfig,
	/// Degraded vs strict failure policy.
	mode: DispatchMode,
	/// Confirmation depth for primary transactions.
	confirmations: u64,
	/// Session-local counter salting simulated transaction hashes.
	sequence: AtomicU64,
}

impl Dispatcher {
	/// Creates a dispatcher over the given services.
	pub fn new(
		chain: Arc<ChainService>,
		ledger: Arc<FallbackLedger>,
		registry: Arc<AccountRegistry>,
		token: TokenConfig,
		dispatch: DispatchConfig,
	) -> Self {
		Self {
			chain,
			ledger,
			registry,
			token,
			mode: dispatch.mode,
			confirmations: dispatch.min_confirmations,
			sequence: AtomicU64::new(0),
		}
	}

	fn degraded(&self) -> bool {
		self.mode == DispatchMode::Degraded
	}

	/// Returns the token balance of an address.
	///
	/// Served from the fallback ledger once the address has been touched;
	/// otherwise queried from the primary ledger and cached. In degraded
	/// mode a primary failure yields the deterministic default instead of
	/// an error.
	pub async fn get_balance(&self, address: &Address) -> Result<U256, DispatchError> {
		if let Some(cached) = self.ledger.cached_balance(address).await {
			tracing::debug!(address = %address, "Balance served from fallback ledger");
			return Ok(cached);
		}

		match self.chain.balance_of(address).await {
			Ok(balance) => {
				self.ledger.record_balance(address, balance).await;
				Ok(balance)
			},
			Err(e) if self.degraded() => {
				tracing::warn!(
					address = %address,
					error = %e,
					"Primary ledger unreachable, serving default balance"
				);
				Ok(self.ledger.balance_or_default(address).await)
			},
			Err(e) => Err(e.into()),
		}
	}

	/// Returns the allowance granted by `owner` to `spender`.
	///
	/// Same caching and degradation policy as [`Self::get_balance`].
	pub async fn get_allowance(
		&self,
		owner: &Address,
		spender: &Address,
	) -> Result<U256, DispatchError> {
		if let Some(cached) = self.ledger.cached_allowance(owner, spender).await {
			tracing::debug!(
				owner = %owner,
				spender = %spender,
				"Allowance served from fallback ledger"
			);
			return Ok(cached);
		}

		match self.chain.allowance(owner, spender).await {
			Ok(allowance) => {
				self.ledger.record_allowance(owner, spender, allowance).await;
				Ok(allowance)
			},
			Err(e) if self.degraded() => {
				tracing::warn!(
					owner = %owner,
					spender = %spender,
					error = %e,
					"Primary ledger unreachable, serving default allowance"
				);
				Ok(self.ledger.allowance_or_default(owner, spender).await)
			},
			Err(e) => Err(e.into()),
		}
	}

	/// Redeems a permit authorizing the spender over the owner's full
	/// balance.
	///
	/// The fallback allowance is written before the on-chain attempt, so
	/// the local view honors the authorization whether or not the primary
	/// ledger accepts it. In degraded mode the return value does not
	/// distinguish "accepted on chain" from "accepted in simulation";
	/// strict mode surfaces primary failures instead.
	pub async fn redeem_permit(&self) -> Result<bool, DispatchError> {
		let owner = self.registry.owner().address().clone();
		let spender = self.registry.spender().address().clone();

		// The permit authorizes the owner's full current balance.
		let balance = self.get_balance(&owner).await?;

		self.ledger.record_allowance(&owner, &spender, balance).await;
		let local_nonce = self.ledger.next_nonce(&owner).await;

		match self
			.redeem_on_chain(&owner, &spender, balance, local_nonce)
			.await
		{
			Ok(receipt) => {
				tracing::info!(
					block = receipt.block_number,
					value = %balance,
					"Permit redeemed on primary ledger"
				);
				Ok(true)
			},
			Err(DispatchError::NetworkUnavailable(e)) if self.degraded() => {
				tracing::warn!(
					error = %e,
					"Permit redemption degraded, fallback allowance stands"
				);
				Ok(true)
			},
			Err(e) => Err(e),
		}
	}

	/// Primary-path permit redemption: resolve domain inputs, build and
	/// sign the message, submit, await confirmation.
	async fn redeem_on_chain(
		&self,
		owner: &Address,
		spender: &Address,
		value: U256,
		local_nonce: U256,
	) -> Result<TransactionReceipt, DispatchError> {
		// Domain inputs each degrade individually to their locally cached
		// defaults; an unreachable network still produces a well-formed
		// (if unredeemable) authorization.
		let chain_id = match self.chain.chain_id().await {
			Ok(id) => id,
			Err(e) => {
				tracing::warn!(
					error = %e,
					chain_id = self.token.chain_id,
					"Chain id resolution failed, using configured default"
				);
				self.token.chain_id
			},
		};
		let name = match self.chain.token_name().await {
			Ok(name) => name,
			Err(e) => {
				tracing::warn!(
					error = %e,
					name = %self.token.name,
					"Token name lookup failed, using configured default"
				);
				self.token.name.clone()
			},
		};
		let nonce = match self.chain.nonces(owner).await {
			Ok(nonce) => nonce,
			Err(e) => {
				tracing::warn!(
					error = %e,
					nonce = %local_nonce,
					"Permit nonce lookup failed, using fallback ledger nonce"
				);
				local_nonce
			},
		};

		let domain = PermitDomain {
			name,
			version: self.token.version.clone(),
			chain_id,
			verifying_contract: self.token.address.clone(),
		};
		let message = PermitMessage {
			owner: owner.clone(),
			spender: spender.clone(),
			value,
			nonce,
			deadline: DEADLINE_NO_EXPIRY,
		};

		let signature = permit::build_and_sign(self.registry.owner(), &domain, &message).await?;

		let hash = self
			.chain
			.submit_permit(owner, spender, value, DEADLINE_NO_EXPIRY, &signature)
			.await?;
		let receipt = self.chain.wait_for_confirmation(&hash, self.confirmations).await?;
		if !receipt.success {
			return Err(DispatchError::NetworkUnavailable(
				ChainError::TransactionFailed("Permit transaction reverted".to_string()),
			));
		}
		Ok(receipt)
	}

	/// Executes a delegated transfer of `value` from `from` to `to`.
	///
	/// If the spender's allowance is below `value`, a permit redemption
	/// runs first. Allowance sufficiency after that cascade is a hard
	/// precondition: the fallback ledger is only mutated once it holds.
	/// The primary transfer is then attempted; in degraded mode a primary
	/// failure yields a placeholder handle whose finalization check
	/// reports success immediately, so callers never block on it.
	pub async fn transfer_from(
		&self,
		from: &Address,
		to: &Address,
		value: U256,
	) -> Result<TransactionHandle, DispatchError> {
		let spender = self.registry.spender().address().clone();

		let mut allowance = self.get_allowance(from, &spender).await?;
		if allowance < value {
			tracing::info!(
				allowance = %allowance,
				value = %value,
				"Allowance below transfer value, redeeming permit first"
			);
			self.redeem_permit().await?;
			allowance = self.get_allowance(from, &spender).await?;
		}
		if allowance < value {
			return Err(DispatchError::InsufficientAllowance {
				required: value,
				available: allowance,
			});
		}

		self.ledger.consume_allowance(from, &spender, value).await;
		self.ledger.apply_transfer(from, to, value).await;

		match self.transfer_on_chain(from, to, value).await {
			Ok(receipt) => {
				tracing::info!(
					tx_hash = %truncate_id(&with_0x_prefix(&hex::encode(&receipt.hash.0))),
					block = receipt.block_number,
					"Delegated transfer confirmed on primary ledger"
				);
				Ok(TransactionHandle::primary(
					spender,
					self.token.address.clone(),
					value,
					receipt,
				))
			},
			Err(e) if self.degraded() => {
				tracing::warn!(
					error = %e,
					"Primary transfer failed, returning simulated handle"
				);
				let hash = self.simulated_hash(from, to, value);
				Ok(TransactionHandle::simulated(
					hash,
					spender,
					self.token.address.clone(),
				))
			},
			Err(e) => Err(e.into()),
		}
	}

	async fn transfer_on_chain(
		&self,
		from: &Address,
		to: &Address,
		value: U256,
	) -> Result<TransactionReceipt, ChainError> {
		let hash = self.chain.submit_transfer_from(from, to, value).await?;
		let receipt = self.chain.wait_for_confirmation(&hash, self.confirmations).await?;
		if !receipt.success {
			return Err(ChainError::TransactionFailed(
				"transferFrom transaction reverted".to_string(),
			));
		}
		Ok(receipt)
	}

	/// Derives a deterministic placeholder hash for a simulated transfer.
	///
	/// Salted with a session-local sequence number so repeated identical
	/// transfers still get distinct handles.
	fn simulated_hash(&self, from: &Address, to: &Address, value: U256) -> TransactionHash {
		let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
		let mut preimage = Vec::with_capacity(18 + 20 + 20 + 32 + 8);
		preimage.extend_from_slice(b"simulated-transfer");
		preimage.extend_from_slice(&from.to_fixed());
		preimage.extend_from_slice(&to.to_fixed());
		preimage.extend_from_slice(&value.to_be_bytes::<32>());
		preimage.extend_from_slice(&sequence.to_be_bytes());
		TransactionHash(keccak256(preimage).as_slice().to_vec())
	}
}
