//! Wrapped native currency.

use super::Chain;
use crate::error::CollaboratorError;
use crate::host::Host;
use crate::interfaces::NativeGateway;
use crate::types::{Address, U256};
use std::sync::Arc;

/// WETH-style gateway. The token contract holds the native currency backing
/// every wrapped unit.
pub struct WrappedNative {
    token: Address,
    chain: Arc<Chain>,
}

impl WrappedNative {
    pub fn new(token: Address, chain: Arc<Chain>) -> Self {
        Self { token, chain }
    }
}

impl NativeGateway for WrappedNative {
    fn token(&self) -> Address {
        self.token
    }

    fn deposit(&self, caller: Address, amount: U256) -> Result<(), CollaboratorError> {
        self.chain.send_native(caller, self.token, amount)?;
        self.chain.mint(self.token, caller, amount);
        Ok(())
    }

    fn withdraw(&self, caller: Address, amount: U256) -> Result<(), CollaboratorError> {
        self.chain.burn(self.token, caller, amount)?;
        self.chain.send_native(self.token, caller, amount)
    }
}
