//! Router transaction handler.

use crate::selectors::{selectors, SwapRouter};
use crate::types::{HandlerError, HandlerOutcome};
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolValue};
use std::sync::Arc;
use swap_router::{CallContext, Host, Mechanism, Router, RouterError};
use tracing::{debug, info, warn};

/// Handler for transactions sent to the router address.
pub struct RouterHandler {
    router: Arc<Router>,
    host: Arc<dyn Host>,
}

impl RouterHandler {
    /// Create a handler driving `router` on `host`. `host` must be the host
    /// the router was built with.
    pub fn new(router: Arc<Router>, host: Arc<dyn Host>) -> Self {
        Self { router, host }
    }

    /// Address transactions must be sent to.
    pub fn router_address(&self) -> Address {
        self.router.address()
    }

    /// Check whether a transaction to `to` belongs to this handler.
    pub fn is_router_call(&self, to: Option<Address>) -> bool {
        to == Some(self.router.address())
    }

    /// Handle a transaction to the router.
    ///
    /// # Arguments
    /// * `caller` - The address calling the router
    /// * `calldata` - The transaction calldata
    /// * `value` - Native value sent with the transaction
    ///
    /// # Returns
    /// * `Ok(HandlerOutcome)` - Return data and logs of the call
    /// * `Err(HandlerError)` - If the call failed; its effects are discarded
    pub fn handle_transaction(
        &self,
        caller: Address,
        calldata: &Bytes,
        value: U256,
    ) -> Result<HandlerOutcome, HandlerError> {
        let checkpoint = self.host.checkpoint();
        let first_log = self.host.log_count();

        match self.dispatch(caller, calldata, value) {
            Ok(output) => {
                let logs = self.host.logs_since(first_log);
                self.host.commit(checkpoint);
                Ok(HandlerOutcome { output, logs })
            }
            Err(err) => {
                warn!("Router transaction from {:?} reverted: {}", caller, err);
                self.host.revert_to(checkpoint);
                Err(err)
            }
        }
    }

    fn dispatch(&self, caller: Address, calldata: &Bytes, value: U256) -> Result<Bytes, HandlerError> {
        if calldata.len() < 4 {
            return Err(HandlerError::InvalidCalldata(
                "calldata too short for function selector".to_string(),
            ));
        }

        let selector = &calldata[0..4];
        let data = &calldata[4..];
        let ctx = CallContext::new(caller).with_value(value);

        match selector {
            s if s == selectors::SWAP.as_slice() => self.handle_swap(ctx, data),
            s if s == selectors::SWAP_MULTI.as_slice() => self.handle_swap_multi(ctx, data),
            s if s == selectors::SET_STABLE_SWAP_REGISTRY.as_slice() => {
                self.handle_set_stable_swap_registry(ctx, data)
            }
            s if s == selectors::STABLE_SWAP_REGISTRY.as_slice() => {
                Ok(self.router.stable_swap_registry().abi_encode().into())
            }
            s if s == selectors::OWNER.as_slice() => Ok(self.router.owner().abi_encode().into()),
            _ => Err(HandlerError::InvalidCalldata(format!(
                "unknown function selector: 0x{}",
                hex::encode(selector)
            ))),
        }
    }

    /// Handle swap(address,address,uint256,uint256,uint8)
    fn handle_swap(&self, ctx: CallContext, data: &[u8]) -> Result<Bytes, HandlerError> {
        let call = SwapRouter::swapCall::abi_decode_raw(data)
            .map_err(|e| HandlerError::InvalidCalldata(format!("failed to decode swap: {}", e)))?;
        let mechanism = mechanism(call.mechanism)?;

        debug!(
            "swap: src={:?}, dst={:?}, amount={}, min_return={}, mechanism={}",
            call.srcToken, call.dstToken, call.amount, call.minReturn, mechanism
        );

        let amount_out = self.router.swap(
            ctx,
            call.srcToken,
            call.dstToken,
            call.amount,
            call.minReturn,
            mechanism,
        )?;
        Ok(amount_out.abi_encode().into())
    }

    /// Handle swapMulti(address[],uint256,uint256,uint8[])
    fn handle_swap_multi(&self, ctx: CallContext, data: &[u8]) -> Result<Bytes, HandlerError> {
        let call = SwapRouter::swapMultiCall::abi_decode_raw(data).map_err(|e| {
            HandlerError::InvalidCalldata(format!("failed to decode swapMulti: {}", e))
        })?;
        if call.tokens.len() < 2 || call.tokens.len() != call.mechanisms.len() + 1 {
            return Err(RouterError::InvalidRouteLength {
                assets: call.tokens.len(),
                mechanisms: call.mechanisms.len(),
            }
            .into());
        }
        let mechanisms = call
            .mechanisms
            .iter()
            .map(|flag| mechanism(*flag))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "swapMulti: tokens={:?}, amount={}, min_return={}, mechanisms={:?}",
            call.tokens, call.amount, call.minReturn, mechanisms
        );

        let amount_out =
            self.router
                .swap_multi(ctx, call.tokens, call.amount, call.minReturn, mechanisms)?;
        Ok(amount_out.abi_encode().into())
    }

    /// Handle setStableSwapRegistry(address)
    fn handle_set_stable_swap_registry(
        &self,
        ctx: CallContext,
        data: &[u8],
    ) -> Result<Bytes, HandlerError> {
        let call = SwapRouter::setStableSwapRegistryCall::abi_decode_raw(data).map_err(|e| {
            HandlerError::InvalidCalldata(format!("failed to decode setStableSwapRegistry: {}", e))
        })?;
        if !ctx.value.is_zero() {
            return Err(HandlerError::InvalidCalldata(
                "setStableSwapRegistry is not payable".to_string(),
            ));
        }

        info!("Router Handler: setStableSwapRegistry called by {:?}", ctx.sender);
        self.router
            .set_stable_swap_registry(ctx.sender, call.registry)?;
        Ok(Bytes::new())
    }
}

fn mechanism(flag: u8) -> Result<Mechanism, HandlerError> {
    Mechanism::try_from(flag).map_err(HandlerError::UnknownMechanism)
}
