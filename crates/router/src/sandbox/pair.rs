//! Constant-product pair and its factory.
//!
//! The pair prices off recorded reserves and settles off actual balances.
//! Holdings that fall below the recorded reserves (a rebase, a burn) leave
//! the pair stale: quotes are computed as if the reserves were already
//! clamped to holdings, and `swap` refuses to run until `sync` has clamped
//! them.

use super::Chain;
use crate::error::CollaboratorError;
use crate::host::Host;
use crate::interfaces::{ConstantProductPair, PairFactory};
use crate::types::{Address, U256};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

const BPS: u32 = 10_000;

/// x·y=k pair holding `token0 < token1`.
pub struct SandboxPair {
    address: Address,
    token0: Address,
    token1: Address,
    fee_bps: u32,
    chain: Arc<Chain>,
}

impl SandboxPair {
    /// Create a pair with a 30 bp fee. Tokens may be given in either order.
    pub fn new(address: Address, token_a: Address, token_b: Address, chain: Arc<Chain>) -> Self {
        let (token0, token1) = if token_a <= token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        Self {
            address,
            token0,
            token1,
            fee_bps: 30,
            chain,
        }
    }

    /// Set the swap fee in basis points.
    pub fn with_fee_bps(mut self, fee_bps: u32) -> Self {
        self.fee_bps = fee_bps.min(BPS);
        self
    }

    pub fn token0(&self) -> Address {
        self.token0
    }

    pub fn token1(&self) -> Address {
        self.token1
    }

    /// Mint liquidity into the pair and record it as reserves.
    /// `amount_a` is credited to `token_a`, `amount_b` to the other token.
    pub fn add_liquidity(&self, token_a: Address, amount_a: U256, amount_b: U256) {
        let (amount0, amount1) = if token_a == self.token0 {
            (amount_a, amount_b)
        } else {
            (amount_b, amount_a)
        };
        self.chain.mint(self.token0, self.address, amount0);
        self.chain.mint(self.token1, self.address, amount1);
        let (reserve0, reserve1) = self.chain.reserves(self.address);
        self.chain.set_reserves(
            self.address,
            (reserve0 + amount0, reserve1 + amount1),
        );
    }

    /// Recorded reserves.
    pub fn reserves(&self) -> (U256, U256) {
        self.chain.reserves(self.address)
    }

    /// Output for `amount_in` against the given reserves, after the fee.
    pub fn get_amount_out(&self, amount_in: U256, reserve_in: U256, reserve_out: U256) -> U256 {
        let amount_in_with_fee = amount_in * U256::from(BPS - self.fee_bps);
        let numerator = amount_in_with_fee * reserve_out;
        let denominator = reserve_in * U256::from(BPS) + amount_in_with_fee;
        if denominator.is_zero() {
            return U256::ZERO;
        }
        numerator / denominator
    }

    fn balances(&self) -> (U256, U256) {
        (
            self.chain.balance_of(self.token0, self.address),
            self.chain.balance_of(self.token1, self.address),
        )
    }

    fn is_stale(&self) -> bool {
        let (reserve0, reserve1) = self.reserves();
        let (balance0, balance1) = self.balances();
        reserve0 > balance0 || reserve1 > balance1
    }
}

impl ConstantProductPair for SandboxPair {
    fn address(&self) -> Address {
        self.address
    }

    fn get_return(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> Result<(U256, bool), CollaboratorError> {
        let (reserve0, reserve1) = self.reserves();
        let (balance0, balance1) = self.balances();
        let reserve0 = reserve0.min(balance0);
        let reserve1 = reserve1.min(balance1);

        let (reserve_in, reserve_out) = if token_in == self.token0 && token_out == self.token1 {
            (reserve0, reserve1)
        } else if token_in == self.token1 && token_out == self.token0 {
            (reserve1, reserve0)
        } else {
            return Err(CollaboratorError::PairNotFound {
                token_a: token_in,
                token_b: token_out,
            });
        };

        Ok((
            self.get_amount_out(amount_in, reserve_in, reserve_out),
            self.is_stale(),
        ))
    }

    fn sync(&self) -> Result<(), CollaboratorError> {
        let (reserve0, reserve1) = self.reserves();
        let (balance0, balance1) = self.balances();
        self.chain
            .set_reserves(self.address, (reserve0.min(balance0), reserve1.min(balance1)));
        Ok(())
    }

    fn swap(
        &self,
        _caller: Address,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
        _data: &[u8],
    ) -> Result<(), CollaboratorError> {
        if amount0_out.is_zero() && amount1_out.is_zero() {
            return Err(CollaboratorError::Reverted(
                "insufficient output amount".to_string(),
            ));
        }
        if self.is_stale() {
            return Err(CollaboratorError::ReservesOutOfSync);
        }
        let (reserve0, reserve1) = self.reserves();
        if amount0_out >= reserve0 || amount1_out >= reserve1 {
            return Err(CollaboratorError::InsufficientLiquidity);
        }

        if !amount0_out.is_zero() {
            self.chain.transfer(self.token0, self.address, to, amount0_out)?;
        }
        if !amount1_out.is_zero() {
            self.chain.transfer(self.token1, self.address, to, amount1_out)?;
        }

        let (balance0, balance1) = self.balances();
        let amount0_in = balance0.saturating_sub(reserve0 - amount0_out);
        let amount1_in = balance1.saturating_sub(reserve1 - amount1_out);
        if amount0_in.is_zero() && amount1_in.is_zero() {
            return Err(CollaboratorError::Reverted(
                "insufficient input amount".to_string(),
            ));
        }

        let fee = U256::from(self.fee_bps);
        let scale = U256::from(BPS);
        let adjusted0 = balance0 * scale - amount0_in * fee;
        let adjusted1 = balance1 * scale - amount1_in * fee;
        if adjusted0 * adjusted1 < reserve0 * reserve1 * scale * scale {
            let allowed = if amount0_out.is_zero() {
                self.get_amount_out(amount0_in, reserve0, reserve1)
            } else {
                self.get_amount_out(amount1_in, reserve1, reserve0)
            };
            return Err(CollaboratorError::InsufficientOutput {
                requested: amount0_out.max(amount1_out),
                allowed,
            });
        }

        self.chain.set_reserves(self.address, (balance0, balance1));
        Ok(())
    }
}

/// Factory indexing pairs by their sorted tokens.
pub struct SandboxPairFactory {
    pairs: RwLock<HashMap<(Address, Address), Arc<dyn ConstantProductPair>>>,
}

impl SandboxPairFactory {
    pub fn new() -> Self {
        Self {
            pairs: RwLock::new(HashMap::new()),
        }
    }

    /// Register `pair` as the pair for the two tokens.
    pub fn add_pair(&self, token_a: Address, token_b: Address, pair: Arc<dyn ConstantProductPair>) {
        self.pairs.write().insert(sorted(token_a, token_b), pair);
    }
}

impl Default for SandboxPairFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PairFactory for SandboxPairFactory {
    fn get_pair(&self, token_a: Address, token_b: Address) -> Option<Arc<dyn ConstantProductPair>> {
        self.pairs.read().get(&sorted(token_a, token_b)).cloned()
    }
}

fn sorted(token_a: Address, token_b: Address) -> (Address, Address) {
    if token_a <= token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_a() -> Address {
        Address::repeat_byte(0x0A)
    }

    fn token_b() -> Address {
        Address::repeat_byte(0x0B)
    }

    fn pair_address() -> Address {
        Address::repeat_byte(0x70)
    }

    fn trader() -> Address {
        Address::repeat_byte(0xAA)
    }

    fn setup() -> (Arc<Chain>, SandboxPair) {
        let chain = Arc::new(Chain::new());
        let pair = SandboxPair::new(pair_address(), token_b(), token_a(), chain.clone())
            .with_fee_bps(0);
        pair.add_liquidity(token_a(), U256::from(100), U256::from(194));
        (chain, pair)
    }

    #[test]
    fn test_tokens_are_sorted() {
        let (_, pair) = setup();
        assert_eq!(pair.token0(), token_a());
        assert_eq!(pair.token1(), token_b());
        assert_eq!(pair.reserves(), (U256::from(100), U256::from(194)));
    }

    #[test]
    fn test_quote_and_swap() {
        let (chain, pair) = setup();
        chain.mint(token_a(), pair_address(), U256::from(100));

        let (out, needs_sync) = pair
            .get_return(token_a(), token_b(), U256::from(100))
            .unwrap();
        assert_eq!(out, U256::from(97));
        assert!(!needs_sync);

        pair.swap(trader(), U256::ZERO, out, trader(), &[]).unwrap();
        assert_eq!(chain.balance_of(token_b(), trader()), U256::from(97));
        assert_eq!(pair.reserves(), (U256::from(200), U256::from(97)));
    }

    #[test]
    fn test_swap_without_input_fails() {
        let (_, pair) = setup();
        let err = pair
            .swap(trader(), U256::ZERO, U256::from(10), trader(), &[])
            .unwrap_err();
        assert_eq!(
            err,
            CollaboratorError::Reverted("insufficient input amount".to_string())
        );
    }

    #[test]
    fn test_stale_reserves_require_sync() {
        let (chain, pair) = setup();
        chain.burn(token_b(), pair_address(), U256::from(44)).unwrap();
        chain.mint(token_a(), pair_address(), U256::from(100));

        let (out, needs_sync) = pair
            .get_return(token_a(), token_b(), U256::from(100))
            .unwrap();
        assert!(needs_sync);
        assert_eq!(out, U256::from(75));

        assert_eq!(
            pair.swap(trader(), U256::ZERO, out, trader(), &[]),
            Err(CollaboratorError::ReservesOutOfSync)
        );

        pair.sync().unwrap();
        pair.swap(trader(), U256::ZERO, out, trader(), &[]).unwrap();
        assert_eq!(chain.balance_of(token_b(), trader()), U256::from(75));
    }

    #[test]
    fn test_factory_lookup_ignores_order() {
        let (_, pair) = setup();
        let factory = SandboxPairFactory::new();
        factory.add_pair(pair.token0(), pair.token1(), Arc::new(pair));

        assert!(factory.get_pair(token_a(), token_b()).is_some());
        assert!(factory.get_pair(token_b(), token_a()).is_some());
        assert!(factory
            .get_pair(token_a(), Address::repeat_byte(0x0C))
            .is_none());
    }
}
