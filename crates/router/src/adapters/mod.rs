//! Per-hop adapters, one per liquidity mechanism.

mod constant_product;
mod stable;

pub use constant_product::swap_constant_product;
pub use stable::swap_stable;

use crate::host::Host;
use crate::interfaces::{NativeGateway, PairFactory};
use crate::types::{Address, Amount};

/// Everything a hop needs: the chain, the collaborators, and the router's
/// own identity (every adapter call acts on the router's balances).
#[derive(Clone, Copy)]
pub struct HopEnv<'a> {
    pub host: &'a dyn Host,
    pub gateway: &'a dyn NativeGateway,
    pub pairs: &'a dyn PairFactory,
    /// Address of the stable-pool registry, resolved through the host.
    pub stable_registry: Address,
    /// The router executing the hop.
    pub router: Address,
}

/// What a hop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopOutcome {
    /// The mechanism ran.
    Swapped { amount_in: Amount, amount_out: Amount },
    /// Input and output token coincide.
    Skipped,
    /// No stable pool is registered for the tokens; funds stay where they are.
    PassedThrough,
}
