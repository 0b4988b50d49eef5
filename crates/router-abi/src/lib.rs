//! ABI front door for the swap router.
//!
//! Decodes transactions sent to the router address, runs them against the
//! router inside a host checkpoint and hands back return data and logs.

mod handler;
mod selectors;
mod types;

pub use handler::RouterHandler;
pub use selectors::{selectors as function_selectors, SwapRouter};
pub use types::{HandlerError, HandlerOutcome};
