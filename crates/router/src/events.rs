//! Notifications emitted by the router.

use crate::types::{Address, Amount, TokenId};
use alloy::primitives::Log;
use alloy::sol;
use alloy::sol_types::SolEvent;

sol! {
    /// Log signatures of the router.
    interface ISwapRouter {
        event Swapped(
            address indexed sender,
            address indexed src_token,
            address indexed dst_token,
            uint256 amount
        );

        event StableSwapRegistryUpdated(address registry);
    }
}

/// An observable side effect of a router call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterEvent {
    /// A single- or multi-hop swap completed. `amount` is the input the
    /// route actually consumed (received minus refunded).
    Swapped {
        sender: Address,
        src_token: TokenId,
        dst_token: TokenId,
        amount: Amount,
    },
    /// The stable-pool registry was replaced.
    StableSwapRegistryUpdated { registry: Address },
}

impl RouterEvent {
    /// Encode the event as a log emitted by `emitter`.
    pub fn into_log(self, emitter: Address) -> Log {
        let data = match self {
            RouterEvent::Swapped {
                sender,
                src_token,
                dst_token,
                amount,
            } => ISwapRouter::Swapped {
                sender,
                src_token,
                dst_token,
                amount,
            }
            .encode_log_data(),
            RouterEvent::StableSwapRegistryUpdated { registry } => {
                ISwapRouter::StableSwapRegistryUpdated { registry }.encode_log_data()
            }
        };
        Log {
            address: emitter,
            data,
        }
    }
}
