//! In-memory collaborators for simulations and tests.
//!
//! A [`Chain`] plays the host; the other types are reference
//! implementations of the contracts the router talks to, all keeping their
//! balances on that chain.

mod chain;
mod gateway;
mod pair;
mod stable;

pub use chain::Chain;
pub use gateway::WrappedNative;
pub use pair::{SandboxPair, SandboxPairFactory};
pub use stable::{SandboxStablePool, SandboxStableRegistry};
