//! Pegged two-coin pool and its registry.

use super::Chain;
use crate::error::CollaboratorError;
use crate::host::Host;
use crate::interfaces::{StablePool, StableSwapRegistry};
use crate::types::{Address, U256};
use parking_lot::RwLock;
use std::sync::Arc;

/// Two coins exchanged one-for-one minus a flat fee.
pub struct SandboxStablePool {
    address: Address,
    coins: [Address; 2],
    fee_bps: u32,
    chain: Arc<Chain>,
}

impl SandboxStablePool {
    /// Create a pool with a 4 bp fee.
    pub fn new(address: Address, coin0: Address, coin1: Address, chain: Arc<Chain>) -> Self {
        Self {
            address,
            coins: [coin0, coin1],
            fee_bps: 4,
            chain,
        }
    }

    /// Set the exchange fee in basis points.
    pub fn with_fee_bps(mut self, fee_bps: u32) -> Self {
        self.fee_bps = fee_bps.min(10_000);
        self
    }

    /// Mint `amount0` of coin 0 and `amount1` of coin 1 into the pool.
    pub fn seed(&self, amount0: U256, amount1: U256) {
        self.chain.mint(self.coins[0], self.address, amount0);
        self.chain.mint(self.coins[1], self.address, amount1);
    }

    /// Output for `dx` after the fee.
    pub fn get_dy(&self, dx: U256) -> U256 {
        dx * U256::from(10_000 - self.fee_bps) / U256::from(10_000)
    }

    fn coin(&self, index: i128) -> Result<Address, CollaboratorError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.coins.get(i).copied())
            .ok_or(CollaboratorError::InvalidCoinIndex(index))
    }
}

impl StablePool for SandboxStablePool {
    fn address(&self) -> Address {
        self.address
    }

    fn coins(&self, index: usize) -> Result<Address, CollaboratorError> {
        self.coins
            .get(index)
            .copied()
            .ok_or(CollaboratorError::InvalidCoinIndex(index as i128))
    }

    fn exchange(
        &self,
        caller: Address,
        i: i128,
        j: i128,
        dx: U256,
        min_dy: U256,
    ) -> Result<U256, CollaboratorError> {
        if i == j {
            return Err(CollaboratorError::InvalidCoinIndex(j));
        }
        let coin_in = self.coin(i)?;
        let coin_out = self.coin(j)?;

        self.chain
            .transfer_from(coin_in, self.address, caller, self.address, dx)?;

        let dy = self.get_dy(dx);
        if dy < min_dy {
            return Err(CollaboratorError::SlippageExceeded {
                min: min_dy,
                actual: dy,
            });
        }
        if self.chain.balance_of(coin_out, self.address) < dy {
            return Err(CollaboratorError::InsufficientLiquidity);
        }
        self.chain.transfer(coin_out, self.address, caller, dy)?;
        Ok(dy)
    }
}

/// Registry listing stable pools by their coins.
pub struct SandboxStableRegistry {
    address: Address,
    pools: RwLock<Vec<Arc<dyn StablePool>>>,
}

impl SandboxStableRegistry {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            pools: RwLock::new(Vec::new()),
        }
    }

    /// Register a pool. Pools are searched in registration order.
    pub fn add_pool(&self, pool: Arc<dyn StablePool>) {
        self.pools.write().push(pool);
    }
}

impl StableSwapRegistry for SandboxStableRegistry {
    fn address(&self) -> Address {
        self.address
    }

    fn find_pool_for_coins(&self, from: Address, to: Address) -> Option<Arc<dyn StablePool>> {
        self.pools
            .read()
            .iter()
            .find(|pool| {
                let (Ok(c0), Ok(c1)) = (pool.coins(0), pool.coins(1)) else {
                    return false;
                };
                (c0 == from && c1 == to) || (c0 == to && c1 == from)
            })
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usdc() -> Address {
        Address::repeat_byte(0x01)
    }

    fn dai() -> Address {
        Address::repeat_byte(0x03)
    }

    fn trader() -> Address {
        Address::repeat_byte(0xAA)
    }

    fn pool_address() -> Address {
        Address::repeat_byte(0x50)
    }

    #[test]
    fn test_exchange_pulls_and_pays() {
        let chain = Arc::new(Chain::new());
        let pool = SandboxStablePool::new(pool_address(), usdc(), dai(), chain.clone());
        pool.seed(U256::from(1_000_000), U256::from(1_000_000));
        chain.mint(usdc(), trader(), U256::from(10_000));
        chain
            .approve(usdc(), trader(), pool_address(), U256::from(10_000))
            .unwrap();

        let dy = pool
            .exchange(trader(), 0, 1, U256::from(10_000), U256::ZERO)
            .unwrap();
        assert_eq!(dy, U256::from(9_996));
        assert_eq!(chain.balance_of(dai(), trader()), U256::from(9_996));
        assert_eq!(chain.balance_of(usdc(), trader()), U256::ZERO);
    }

    #[test]
    fn test_exchange_rejects_bad_indices() {
        let chain = Arc::new(Chain::new());
        let pool = SandboxStablePool::new(pool_address(), usdc(), dai(), chain);

        assert_eq!(
            pool.exchange(trader(), 0, 0, U256::from(1), U256::ZERO),
            Err(CollaboratorError::InvalidCoinIndex(0))
        );
        assert_eq!(
            pool.exchange(trader(), 2, 0, U256::from(1), U256::ZERO),
            Err(CollaboratorError::InvalidCoinIndex(2))
        );
    }

    #[test]
    fn test_registry_matches_either_order() {
        let chain = Arc::new(Chain::new());
        let registry = SandboxStableRegistry::new(Address::repeat_byte(0x5E));
        registry.add_pool(Arc::new(SandboxStablePool::new(
            pool_address(),
            usdc(),
            dai(),
            chain,
        )));

        assert!(registry.find_pool_for_coins(usdc(), dai()).is_some());
        assert!(registry.find_pool_for_coins(dai(), usdc()).is_some());
        assert!(registry
            .find_pool_for_coins(usdc(), Address::repeat_byte(0x02))
            .is_none());
    }
}
