//! In-memory fallback ledger for the permit relay system.
//!
//! This module provides the simulated balance/allowance/transfer store the
//! dispatcher falls back to when the primary ledger is unreachable, and
//! which doubles as its write-through cache when the primary ledger is
//! healthy. All state is process-lifetime; there is no persistence.
//!
//! Keys appear lazily on first reference. An absent balance or allowance
//! does not mean zero: the first reference materializes one whole token
//! unit (10^18 base units) so degraded-mode results stay deterministic.

use alloy_primitives::U256;
use relay_types::{Address, ONE_TOKEN};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Record of a fallback transfer, one per recipient (last-write-wins).
///
/// Marks that a recipient has been touched by the fallback ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
	/// Account the value was credited to.
	pub recipient: Address,
	/// Account the value was debited from.
	pub source: Address,
	/// Transferred amount in base units.
	pub value: U256,
}

/// All fallback state behind a single lock.
///
/// Keeping the maps together means a debit and its matching credit are
/// applied under one write guard, which is what preserves conservation
/// when multiple operations land on the same account pair.
#[derive(Default)]
struct LedgerState {
	balances: HashMap<Address, U256>,
	allowances: HashMap<(Address, Address), U256>,
	transfers: HashMap<Address, TransferRecord>,
	nonces: HashMap<Address, U256>,
}

/// In-memory simulated balance/allowance/transfer store.
///
/// Owned explicitly by whoever builds the dispatcher and passed in by
/// reference, so independent sessions never share state.
#[derive(Default)]
pub struct FallbackLedger {
	state: RwLock<LedgerState>,
}

impl FallbackLedger {
	/// Creates an empty ledger.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the cached balance for an address, if the address has been
	/// touched by the fallback path in this session.
	pub async fn cached_balance(&self, address: &Address) -> Option<U256> {
		let state = self.state.read().await;
		state.balances.get(address).copied()
	}

	/// Caches a balance observed on the primary ledger (write-through).
	pub async fn record_balance(&self, address: &Address, value: U256) {
		let mut state = self.state.write().await;
		state.balances.insert(address.clone(), value);
	}

	/// Returns the balance for an address, materializing the default on
	/// first reference.
	pub async fn balance_or_default(&self, address: &Address) -> U256 {
		let mut state = self.state.write().await;
		*state.balances.entry(address.clone()).or_insert(ONE_TOKEN)
	}

	/// Returns the cached allowance for an (owner, spender) pair, if the
	/// pair has been touched by the fallback path in this session.
	pub async fn cached_allowance(&self, owner: &Address, spender: &Address) -> Option<U256> {
		let state = self.state.read().await;
		state
			.allowances
			.get(&(owner.clone(), spender.clone()))
			.copied()
	}

	/// Caches an allowance value (write-through or permit simulation).
	pub async fn record_allowance(&self, owner: &Address, spender: &Address, value: U256) {
		let mut state = self.state.write().await;
		state
			.allowances
			.insert((owner.clone(), spender.clone()), value);
	}

	/// Returns the allowance for a pair, materializing the default on
	/// first reference.
	pub async fn allowance_or_default(&self, owner: &Address, spender: &Address) -> U256 {
		let mut state = self.state.write().await;
		*state
			.allowances
			.entry((owner.clone(), spender.clone()))
			.or_insert(ONE_TOKEN)
	}

	/// Debits a spent amount from an allowance, saturating at zero.
	pub async fn consume_allowance(&self, owner: &Address, spender: &Address, value: U256) {
		let mut state = self.state.write().await;
		let entry = state
			.allowances
			.entry((owner.clone(), spender.clone()))
			.or_insert(ONE_TOKEN);
		*entry = entry.saturating_sub(value);
	}

	/// Applies a transfer to the simulated balances.
	///
	/// Debits `value` from `from` (saturating at zero) and credits it to
	/// `to`, materializing defaults for either side on first reference,
	/// and records the transfer against the recipient. The whole mutation
	/// happens under one write guard.
	pub async fn apply_transfer(
		&self,
		from: &Address,
		to: &Address,
		value: U256,
	) -> TransferRecord {
		let mut state = self.state.write().await;

		let source = state.balances.entry(from.clone()).or_insert(ONE_TOKEN);
		*source = source.saturating_sub(value);

		let destination = state.balances.entry(to.clone()).or_insert(ONE_TOKEN);
		*destination = destination.saturating_add(value);

		let record = TransferRecord {
			recipient: to.clone(),
			source: from.clone(),
			value,
		};
		state.transfers.insert(to.clone(), record.clone());
		record
	}

	/// Returns the last transfer recorded against a recipient.
	pub async fn transfer_record(&self, recipient: &Address) -> Option<TransferRecord> {
		let state = self.state.read().await;
		state.transfers.get(recipient).cloned()
	}

	/// Returns the owner's current nonce and advances it.
	///
	/// Nonces start at zero and only ever grow, mirroring the per-owner
	/// monotonicity of the on-chain counter.
	pub async fn next_nonce(&self, owner: &Address) -> U256 {
		let mut state = self.state.write().await;
		let entry = state.nonces.entry(owner.clone()).or_insert(U256::ZERO);
		let current = *entry;
		*entry = entry.saturating_add(U256::from(1));
		current
	}

	/// Returns the owner's current nonce without advancing it.
	pub async fn peek_nonce(&self, owner: &Address) -> U256 {
		let state = self.state.read().await;
		state.nonces.get(owner).copied().unwrap_or(U256::ZERO)
	}
}
