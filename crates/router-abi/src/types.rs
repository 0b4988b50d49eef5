//! Type definitions for router transactions.

use alloy_primitives::{Bytes, Log};
use swap_router::RouterError;

/// Result of a transaction handled at the router address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerOutcome {
    /// ABI-encoded return data.
    pub output: Bytes,
    /// Logs emitted by the call, in order.
    pub logs: Vec<Log>,
}

/// Errors that can occur while handling a router transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    #[error("Invalid calldata: {0}")]
    InvalidCalldata(String),

    #[error("Unknown mechanism flag: {0}")]
    UnknownMechanism(u8),

    #[error("Router error: {0}")]
    Router(#[from] RouterError),
}
