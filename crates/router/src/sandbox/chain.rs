//! In-memory chain state implementing [`Host`].

use crate::error::CollaboratorError;
use crate::host::Host;
use crate::interfaces::StableSwapRegistry;
use crate::types::{Address, U256};
use alloy::primitives::Log;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Basis-point denominator for transfer fees.
const BPS: u32 = 10_000;

#[derive(Debug, Clone, Default)]
struct ChainState {
    /// (token, owner) -> balance.
    balances: HashMap<(Address, Address), U256>,
    /// (token, owner, spender) -> allowance.
    allowances: HashMap<(Address, Address, Address), U256>,
    native: HashMap<Address, U256>,
    /// Tokens that burn a share of every transfer, in basis points.
    transfer_fees: HashMap<Address, u32>,
    /// Pair address -> (reserve0, reserve1).
    reserves: HashMap<Address, (U256, U256)>,
    logs: Vec<Log>,
}

impl ChainState {
    fn balance(&self, token: Address, owner: Address) -> U256 {
        self.balances
            .get(&(token, owner))
            .copied()
            .unwrap_or_default()
    }

    fn debit(&mut self, token: Address, owner: Address, amount: U256) -> Result<(), CollaboratorError> {
        let available = self.balance(token, owner);
        if available < amount {
            return Err(CollaboratorError::InsufficientBalance {
                token,
                owner,
                needed: amount,
                available,
            });
        }
        self.balances.insert((token, owner), available - amount);
        Ok(())
    }

    fn credit(&mut self, token: Address, owner: Address, amount: U256) {
        let entry = self.balances.entry((token, owner)).or_default();
        *entry = entry.saturating_add(amount);
    }

    fn move_tokens(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), CollaboratorError> {
        self.debit(token, from, amount)?;
        let fee_bps = self.transfer_fees.get(&token).copied().unwrap_or(0);
        let fee = amount * U256::from(fee_bps) / U256::from(BPS);
        self.credit(token, to, amount - fee);
        Ok(())
    }
}

/// An in-memory EVM-like ledger: token and native balances, allowances,
/// logs, and the reserves of sandbox pairs.
///
/// All mutable state lives in one snapshot so a checkpoint covers every
/// collaborator built on top of the chain.
pub struct Chain {
    state: RwLock<ChainState>,
    journal: Mutex<Vec<ChainState>>,
    registries: RwLock<HashMap<Address, Arc<dyn StableSwapRegistry>>>,
}

impl Chain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ChainState::default()),
            journal: Mutex::new(Vec::new()),
            registries: RwLock::new(HashMap::new()),
        }
    }

    /// Create `amount` of `token` for `to`.
    pub fn mint(&self, token: Address, to: Address, amount: U256) {
        self.state.write().credit(token, to, amount);
    }

    /// Destroy `amount` of `token` held by `from`.
    pub fn burn(&self, token: Address, from: Address, amount: U256) -> Result<(), CollaboratorError> {
        self.state.write().debit(token, from, amount)
    }

    /// Give `to` native currency.
    pub fn deal_native(&self, to: Address, amount: U256) {
        let mut state = self.state.write();
        let entry = state.native.entry(to).or_default();
        *entry = entry.saturating_add(amount);
    }

    /// Make `token` burn `fee_bps` basis points of every transfer.
    pub fn set_transfer_fee(&self, token: Address, fee_bps: u32) {
        self.state.write().transfer_fees.insert(token, fee_bps.min(BPS));
    }

    /// Make a stable-pool registry resolvable at its address.
    pub fn deploy_stable_registry(&self, registry: Arc<dyn StableSwapRegistry>) {
        self.registries.write().insert(registry.address(), registry);
    }

    /// Logs emitted so far.
    pub fn logs(&self) -> Vec<Log> {
        self.state.read().logs.clone()
    }

    /// Recorded reserves of the pair at `pair`.
    pub fn reserves(&self, pair: Address) -> (U256, U256) {
        self.state
            .read()
            .reserves
            .get(&pair)
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn set_reserves(&self, pair: Address, reserves: (U256, U256)) {
        self.state.write().reserves.insert(pair, reserves);
    }

    /// Run `f` as one transaction: keep its effects on `Ok`, discard them on
    /// `Err`.
    pub fn transact<T, E>(&self, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let checkpoint = self.checkpoint();
        let result = f();
        match &result {
            Ok(_) => self.commit(checkpoint),
            Err(_) => self.revert_to(checkpoint),
        }
        result
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for Chain {
    fn balance_of(&self, token: Address, owner: Address) -> U256 {
        self.state.read().balance(token, owner)
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.state
            .read()
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), CollaboratorError> {
        self.state.write().move_tokens(token, from, to, amount)
    }

    fn transfer_from(
        &self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), CollaboratorError> {
        let mut state = self.state.write();
        let key = (token, from, spender);
        let allowed = state.allowances.get(&key).copied().unwrap_or_default();
        if allowed < amount {
            return Err(CollaboratorError::InsufficientAllowance {
                token,
                owner: from,
                spender,
                needed: amount,
                available: allowed,
            });
        }
        state.move_tokens(token, from, to, amount)?;
        if allowed != U256::MAX {
            state.allowances.insert(key, allowed - amount);
        }
        Ok(())
    }

    fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), CollaboratorError> {
        self.state
            .write()
            .allowances
            .insert((token, owner, spender), amount);
        Ok(())
    }

    fn native_balance(&self, owner: Address) -> U256 {
        self.state
            .read()
            .native
            .get(&owner)
            .copied()
            .unwrap_or_default()
    }

    fn send_native(&self, from: Address, to: Address, amount: U256) -> Result<(), CollaboratorError> {
        let mut state = self.state.write();
        let available = state.native.get(&from).copied().unwrap_or_default();
        if available < amount {
            return Err(CollaboratorError::InsufficientBalance {
                token: Address::ZERO,
                owner: from,
                needed: amount,
                available,
            });
        }
        state.native.insert(from, available - amount);
        let entry = state.native.entry(to).or_default();
        *entry = entry.saturating_add(amount);
        Ok(())
    }

    fn emit(&self, log: Log) {
        self.state.write().logs.push(log);
    }

    fn log_count(&self) -> usize {
        self.state.read().logs.len()
    }

    fn logs_since(&self, index: usize) -> Vec<Log> {
        self.state
            .read()
            .logs
            .get(index..)
            .map(<[Log]>::to_vec)
            .unwrap_or_default()
    }

    fn stable_registry(&self, at: Address) -> Option<Arc<dyn StableSwapRegistry>> {
        self.registries.read().get(&at).cloned()
    }

    fn checkpoint(&self) -> usize {
        let snapshot = self.state.read().clone();
        let mut journal = self.journal.lock();
        journal.push(snapshot);
        journal.len() - 1
    }

    fn revert_to(&self, checkpoint: usize) {
        let snapshot = {
            let mut journal = self.journal.lock();
            if checkpoint >= journal.len() {
                return;
            }
            let snapshot = journal.drain(checkpoint..).next();
            snapshot
        };
        if let Some(snapshot) = snapshot {
            *self.state.write() = snapshot;
        }
    }

    fn commit(&self, checkpoint: usize) {
        self.journal.lock().truncate(checkpoint);
    }
}
