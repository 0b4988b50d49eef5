//! Token-swap router over stable pools and constant-product pairs.
//!
//! This library provides:
//! - Single-hop and multi-hop swaps with a per-hop mechanism flag
//! - Transparent wrapping of the native currency on native legs
//! - Custody accounting with minimum-output checks at the router and at the
//!   caller's wallet, plus refund of unspent input
//! - A reentrancy flag rejecting nested calls
//! - An in-memory sandbox chain with reference pools for simulation

pub mod adapters;
pub mod asset;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod gateway;
pub mod host;
pub mod interfaces;
pub mod route;
pub mod router;
pub mod sandbox;
pub mod types;

pub use adapters::HopOutcome;
pub use config::{RouterConfig, ROUTER_PREDEPLOY_ADDRESS};
pub use error::{CollaboratorError, RouterError};
pub use events::{ISwapRouter, RouterEvent};
pub use host::Host;
pub use interfaces::{
    ConstantProductPair, NativeGateway, PairFactory, StablePool, StableSwapRegistry,
};
pub use route::{Hop, Route};
pub use router::Router;
pub use types::{is_native, Address, Amount, CallContext, Mechanism, TokenId, NATIVE_TOKEN, U256};
