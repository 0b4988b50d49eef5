//! Core type definitions for the router.
//!
//! Re-exports from alloy-primitives for Ethereum-compatible types.

pub use alloy::primitives::{Address, U256};
use std::fmt;

/// Identity of an asset the router can move: a token contract address, or
/// [`NATIVE_TOKEN`] for the chain's native currency.
pub type TokenId = Address;

/// Native currency sentinel (zero address).
pub const NATIVE_TOKEN: TokenId = Address::ZERO;

/// Amount of tokens in the smallest unit (e.g. wei).
pub type Amount = U256;

/// Returns true if `token` is the native currency sentinel.
pub fn is_native(token: TokenId) -> bool {
    token == NATIVE_TOKEN
}

/// Liquidity mechanism used for a single hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mechanism {
    /// Two-coin stable pool resolved through the stable-pool registry.
    StableSwap = 0,
    /// Constant-product pair resolved through the pair factory, exact input.
    ConstantProductExactIn = 1,
}

impl Mechanism {
    /// Wire representation of the flag.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Mechanism {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mechanism::StableSwap),
            1 => Ok(Mechanism::ConstantProductExactIn),
            other => Err(other),
        }
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mechanism::StableSwap => write!(f, "stable-swap"),
            Mechanism::ConstantProductExactIn => write!(f, "constant-product"),
        }
    }
}

/// Caller identity and native value attached to an entry-point call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// The account invoking the router.
    pub sender: Address,
    /// Native currency sent along with the call.
    pub value: U256,
}

impl CallContext {
    /// A call without attached native value.
    pub fn new(sender: Address) -> Self {
        Self {
            sender,
            value: U256::ZERO,
        }
    }

    /// Attach native value to the call.
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_token() {
        assert!(is_native(NATIVE_TOKEN));
        assert!(NATIVE_TOKEN.is_zero());

        let usdc = Address::repeat_byte(0x01);
        assert!(!is_native(usdc));
    }

    #[test]
    fn test_mechanism_flags() {
        assert_eq!(Mechanism::try_from(0), Ok(Mechanism::StableSwap));
        assert_eq!(
            Mechanism::try_from(1),
            Ok(Mechanism::ConstantProductExactIn)
        );
        assert_eq!(Mechanism::try_from(7), Err(7));

        assert_eq!(Mechanism::ConstantProductExactIn.as_u8(), 1);
    }

    #[test]
    fn test_call_context() {
        let alice = Address::repeat_byte(0xAA);
        let ctx = CallContext::new(alice);
        assert!(ctx.value.is_zero());

        let ctx = ctx.with_value(U256::from(5));
        assert_eq!(ctx.value, U256::from(5));
        assert_eq!(ctx.sender, alice);
    }
}
