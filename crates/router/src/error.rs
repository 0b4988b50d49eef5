//! Error types for the router and its collaborators.

use crate::types::{Address, U256};

/// Failures raised by external collaborators: the token ledger, the native
/// gateway, stable pools, constant-product pairs and their registries.
///
/// The router never translates these; they surface verbatim through
/// [`RouterError::Upstream`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("insufficient balance of {token} for {owner}: need {needed}, have {available}")]
    InsufficientBalance {
        token: Address,
        owner: Address,
        needed: U256,
        available: U256,
    },

    #[error("insufficient allowance of {token} from {owner} to {spender}: need {needed}, have {available}")]
    InsufficientAllowance {
        token: Address,
        owner: Address,
        spender: Address,
        needed: U256,
        available: U256,
    },

    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    #[error("insufficient output: requested {requested}, allowed {allowed}")]
    InsufficientOutput { requested: U256, allowed: U256 },

    #[error("exchange returned {actual}, below minimum {min}")]
    SlippageExceeded { min: U256, actual: U256 },

    #[error("no pair for {token_a} and {token_b}")]
    PairNotFound { token_a: Address, token_b: Address },

    #[error("no stable-pool registry deployed at {0}")]
    RegistryNotDeployed(Address),

    #[error("invalid coin index {0}")]
    InvalidCoinIndex(i128),

    #[error("reserves out of sync with balances")]
    ReservesOutOfSync,

    #[error("reverted: {0}")]
    Reverted(String),
}

/// Errors returned by router entry points.
///
/// Every variant aborts the enclosing unit of work.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    #[error("invalid route length: {assets} assets for {mechanisms} mechanism flags")]
    InvalidRouteLength { assets: usize, mechanisms: usize },

    #[error("stable-pool registry cannot be the zero address")]
    ZeroRegistryAddress,

    #[error("token {token} matches no coin slot of stable pool {pool}")]
    UnresolvedAssetSlot { pool: Address, token: Address },

    #[error("insufficient return: got {actual}, minimum {min_return}")]
    InsufficientReturn { min_return: U256, actual: U256 },

    #[error("caller {0} is not authorized")]
    Unauthorized(Address),

    #[error("reentrant call")]
    Reentrancy,

    #[error("invalid native value: expected {expected}, got {actual}")]
    InvalidNativeValue { expected: U256, actual: U256 },

    #[error("upstream failure: {0}")]
    Upstream(#[from] CollaboratorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_is_verbatim() {
        let err: RouterError = CollaboratorError::InsufficientLiquidity.into();
        assert_eq!(
            err,
            RouterError::Upstream(CollaboratorError::InsufficientLiquidity)
        );
        assert_eq!(err.to_string(), "upstream failure: insufficient liquidity");
    }

    #[test]
    fn test_error_messages() {
        let err = RouterError::InvalidRouteLength {
            assets: 3,
            mechanisms: 1,
        };
        assert_eq!(
            err.to_string(),
            "invalid route length: 3 assets for 1 mechanism flags"
        );

        let err = RouterError::InsufficientReturn {
            min_return: U256::from(95),
            actual: U256::from(90),
        };
        assert_eq!(err.to_string(), "insufficient return: got 90, minimum 95");
    }
}
