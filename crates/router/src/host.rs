//! Execution environment the router runs inside.

use crate::error::CollaboratorError;
use crate::interfaces::StableSwapRegistry;
use crate::types::{Address, U256};
use alloy::primitives::Log;
use std::sync::Arc;

/// The chain the router is deployed on.
///
/// Provides the fungible-token ledger, native currency balances, event
/// emission, contract lookup for the stable-pool registry and a journal of
/// state checkpoints. The journal is how the embedding environment makes a
/// call all-or-nothing: take a checkpoint, run the call, then either commit
/// or revert to it. Router components never revert on their own.
pub trait Host: Send + Sync {
    /// Token balance of `owner`.
    fn balance_of(&self, token: Address, owner: Address) -> U256;

    /// Remaining amount `spender` may move out of `owner`'s balance.
    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256;

    /// Move `amount` of `token` from `from` (the calling contract or account)
    /// to `to`.
    fn transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), CollaboratorError>;

    /// Move `amount` of `token` from `from` to `to` on behalf of `spender`,
    /// consuming allowance.
    fn transfer_from(
        &self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), CollaboratorError>;

    /// Set the allowance `owner` grants to `spender`.
    fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), CollaboratorError>;

    /// Native currency balance of `owner`.
    fn native_balance(&self, owner: Address) -> U256;

    /// Send native currency.
    fn send_native(&self, from: Address, to: Address, amount: U256)
        -> Result<(), CollaboratorError>;

    /// Append a log to the current transaction.
    fn emit(&self, log: Log);

    /// Number of logs emitted so far.
    fn log_count(&self) -> usize;

    /// Logs emitted at or after position `index`.
    fn logs_since(&self, index: usize) -> Vec<Log>;

    /// Resolve the stable-pool registry deployed at `at`, if any.
    fn stable_registry(&self, at: Address) -> Option<Arc<dyn StableSwapRegistry>>;

    /// Take a state checkpoint and return its id.
    fn checkpoint(&self) -> usize;

    /// Restore the state captured by `checkpoint`, dropping it and every
    /// later checkpoint.
    fn revert_to(&self, checkpoint: usize);

    /// Keep the current state, dropping `checkpoint` and every later one.
    fn commit(&self, checkpoint: usize);
}
