//! Router deployment parameters.

use crate::types::Address;
use alloy::primitives::address;

/// Default router predeploy address.
pub const ROUTER_PREDEPLOY_ADDRESS: Address = address!("4200000000000000000000000000000000000052");

/// Configuration for the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Address the router holds balances under.
    pub address: Address,

    /// The only account allowed to change the stable-pool registry.
    pub owner: Address,

    /// Initial stable-pool registry. The zero address leaves it unset; stable
    /// hops then fail until the owner sets one.
    pub stable_registry: Address,
}

impl RouterConfig {
    /// Create a configuration owned by `owner` at the predeploy address.
    pub fn new(owner: Address) -> Self {
        Self {
            address: ROUTER_PREDEPLOY_ADDRESS,
            owner,
            stable_registry: Address::ZERO,
        }
    }

    /// Create a new configuration with a custom router address.
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    /// Create a new configuration with an initial stable-pool registry.
    pub fn with_stable_registry(mut self, registry: Address) -> Self {
        self.stable_registry = registry;
        self
    }

    /// Check whether `caller` may run admin operations.
    pub fn is_owner(&self, caller: Address) -> bool {
        caller == self.owner
    }
}
