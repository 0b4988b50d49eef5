//! Interfaces of the liquidity contracts the router calls into.
//!
//! `caller` arguments carry the calling account (the router, for every call
//! the router makes).

use crate::error::CollaboratorError;
use crate::types::{Address, U256};
use std::sync::Arc;

/// Wrapped-native token contract.
pub trait NativeGateway: Send + Sync {
    /// Address of the wrapped token.
    fn token(&self) -> Address;

    /// Take `amount` native currency from `caller` and credit the same amount
    /// of wrapped token.
    fn deposit(&self, caller: Address, amount: U256) -> Result<(), CollaboratorError>;

    /// Burn `amount` wrapped token held by `caller` and send back native
    /// currency.
    fn withdraw(&self, caller: Address, amount: U256) -> Result<(), CollaboratorError>;
}

/// Registry of two-coin stable pools.
pub trait StableSwapRegistry: Send + Sync {
    /// Address the registry is deployed at.
    fn address(&self) -> Address;

    /// Pool trading `from` against `to`, if one is registered.
    fn find_pool_for_coins(&self, from: Address, to: Address) -> Option<Arc<dyn StablePool>>;
}

/// Two-coin stable pool with a fixed coin ordering.
pub trait StablePool: Send + Sync {
    fn address(&self) -> Address;

    /// Coin held in slot `index` (0 or 1).
    fn coins(&self, index: usize) -> Result<Address, CollaboratorError>;

    /// Sell `dx` of coin `i` for at least `min_dy` of coin `j`. The pool pulls
    /// `dx` from `caller` using its allowance and pays `caller`.
    fn exchange(
        &self,
        caller: Address,
        i: i128,
        j: i128,
        dx: U256,
        min_dy: U256,
    ) -> Result<U256, CollaboratorError>;
}

/// Registry of constant-product pairs.
pub trait PairFactory: Send + Sync {
    /// Pair for the two tokens in either order, if one exists.
    fn get_pair(&self, token_a: Address, token_b: Address)
        -> Option<Arc<dyn ConstantProductPair>>;
}

/// Constant-product pair holding `token0 < token1`.
pub trait ConstantProductPair: Send + Sync {
    fn address(&self) -> Address;

    /// Output for `amount_in` of `token_in`, and whether the pair's reserves
    /// must be synced before a swap will honour that output.
    fn get_return(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> Result<(U256, bool), CollaboratorError>;

    /// Reconcile reserves with actual holdings.
    fn sync(&self) -> Result<(), CollaboratorError>;

    /// Pay out `amount0_out` of token0 and `amount1_out` of token1 to `to`.
    /// Input must already have been transferred to the pair.
    fn swap(
        &self,
        caller: Address,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
        data: &[u8],
    ) -> Result<(), CollaboratorError>;
}
