//! The router: entry points, custody and settlement around a route.

use crate::adapters::{HopEnv, HopOutcome};
use crate::asset;
use crate::config::RouterConfig;
use crate::dispatcher::{execute_route, Baseline};
use crate::error::RouterError;
use crate::events::RouterEvent;
use crate::host::Host;
use crate::interfaces::{NativeGateway, PairFactory};
use crate::route::Route;
use crate::types::{Address, Amount, CallContext, Mechanism, TokenId, U256};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Swap router over stable pools and constant-product pairs.
///
/// The router only holds funds for the duration of a call: it pulls the
/// caller's input, runs the route on its own balances, pays out the output
/// and refunds whatever input was left. Atomicity of a call is up to the
/// host; the router only guarantees that it fails instead of settling a bad
/// result.
pub struct Router {
    config: RouterConfig,
    stable_registry: RwLock<Address>,
    host: Arc<dyn Host>,
    gateway: Arc<dyn NativeGateway>,
    pairs: Arc<dyn PairFactory>,
    /// Set while a call is in flight.
    entered: AtomicBool,
}

/// Clears the in-flight flag when a call returns, on every path.
struct EntryGuard<'a>(&'a AtomicBool);

impl Drop for EntryGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Router {
    /// Create a router.
    pub fn new(
        config: RouterConfig,
        host: Arc<dyn Host>,
        gateway: Arc<dyn NativeGateway>,
        pairs: Arc<dyn PairFactory>,
    ) -> Self {
        Self {
            stable_registry: RwLock::new(config.stable_registry),
            config,
            host,
            gateway,
            pairs,
            entered: AtomicBool::new(false),
        }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Address the router holds balances under.
    pub fn address(&self) -> Address {
        self.config.address
    }

    /// Account allowed to change the stable-pool registry.
    pub fn owner(&self) -> Address {
        self.config.owner
    }

    /// Current stable-pool registry address.
    pub fn stable_swap_registry(&self) -> Address {
        *self.stable_registry.read()
    }

    /// Swap `amount` of `src` for at least `min_return` of `dst` in one hop.
    ///
    /// Native currency is paid as the call's value, which must equal
    /// `amount`; stable pools never take native value directly. When `src`
    /// and `dst` are the same asset nothing moves and `amount` is returned.
    pub fn swap(
        &self,
        ctx: CallContext,
        src: TokenId,
        dst: TokenId,
        amount: Amount,
        min_return: Amount,
        mechanism: Mechanism,
    ) -> Result<Amount, RouterError> {
        let _guard = self.enter()?;

        if src == dst {
            return Ok(amount);
        }
        if mechanism == Mechanism::StableSwap && !ctx.value.is_zero() {
            return Err(RouterError::InvalidNativeValue {
                expected: U256::ZERO,
                actual: ctx.value,
            });
        }

        let route = Route::single(src, dst, mechanism);
        self.run_route(&ctx, &route, amount, min_return)
    }

    /// Swap `amount` of `tokens[0]` for at least `min_return` of the last
    /// token, hopping through every token in between. `mechanisms[i]` prices
    /// the hop from `tokens[i]` to `tokens[i + 1]`.
    pub fn swap_multi(
        &self,
        ctx: CallContext,
        tokens: Vec<TokenId>,
        amount: Amount,
        min_return: Amount,
        mechanisms: Vec<Mechanism>,
    ) -> Result<Amount, RouterError> {
        let _guard = self.enter()?;

        let route = Route::new(tokens, mechanisms)?;
        if route.mechanisms()[0] == Mechanism::StableSwap && !ctx.value.is_zero() {
            return Err(RouterError::InvalidNativeValue {
                expected: U256::ZERO,
                actual: ctx.value,
            });
        }

        self.run_route(&ctx, &route, amount, min_return)
    }

    /// Point stable hops at a new registry. Owner only.
    pub fn set_stable_swap_registry(
        &self,
        caller: Address,
        registry: Address,
    ) -> Result<(), RouterError> {
        if !self.config.is_owner(caller) {
            return Err(RouterError::Unauthorized(caller));
        }
        if registry.is_zero() {
            return Err(RouterError::ZeroRegistryAddress);
        }

        *self.stable_registry.write() = registry;
        info!("Stable swap registry updated: {:?}", registry);
        self.emit(RouterEvent::StableSwapRegistryUpdated { registry });
        Ok(())
    }

    fn enter(&self) -> Result<EntryGuard<'_>, RouterError> {
        self.entered
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| RouterError::Reentrancy)?;
        Ok(EntryGuard(&self.entered))
    }

    fn emit(&self, event: RouterEvent) {
        self.host.emit(event.into_log(self.config.address));
    }

    /// Custody, routing and settlement. Balances of every route asset are
    /// measured against snapshots taken before custody, so funds the router
    /// held before the call are never spent, paid out or counted as input.
    fn run_route(
        &self,
        ctx: &CallContext,
        route: &Route,
        amount: Amount,
        min_return: Amount,
    ) -> Result<Amount, RouterError> {
        let host = self.host.as_ref();
        let this = self.config.address;
        let src = route.token_in();
        let dst = route.token_out();

        debug!(
            "route from {:?}: {:?} via {:?}, amount={}, min_return={}",
            ctx.sender,
            route.tokens(),
            route.mechanisms(),
            amount,
            min_return
        );

        // Custody
        let baseline = Baseline::capture(host, this, route);
        let src_before = baseline.of(src);
        let dst_before = baseline.of(dst);
        asset::transfer_from_caller(host, src, ctx, this, amount)?;
        let received = asset::balance_of(host, src, this).saturating_sub(src_before);

        // Routing
        let env = HopEnv {
            host,
            gateway: self.gateway.as_ref(),
            pairs: self.pairs.as_ref(),
            stable_registry: self.stable_swap_registry(),
            router: this,
        };
        let outcomes = execute_route(&env, route, &baseline)?;
        let passed_through = outcomes
            .iter()
            .filter(|outcome| **outcome == HopOutcome::PassedThrough)
            .count();

        // Settlement
        let output = asset::balance_of(host, dst, this).saturating_sub(dst_before);
        if output < min_return {
            return Err(RouterError::InsufficientReturn {
                min_return,
                actual: output,
            });
        }

        let wallet_before = asset::balance_of(host, dst, ctx.sender);
        asset::transfer(host, dst, this, ctx.sender, output)?;
        let delivered = asset::balance_of(host, dst, ctx.sender).saturating_sub(wallet_before);
        if delivered < min_return {
            return Err(RouterError::InsufficientReturn {
                min_return,
                actual: delivered,
            });
        }

        let residual = asset::balance_of(host, src, this).saturating_sub(src_before);
        asset::transfer(host, src, this, ctx.sender, residual)?;

        let consumed = received.saturating_sub(residual);
        info!(
            "Swap executed: sender={:?}, {:?} -> {:?}, consumed={}, output={}, refunded={}, passed_through_hops={}",
            ctx.sender, src, dst, consumed, output, residual, passed_through
        );
        self.emit(RouterEvent::Swapped {
            sender: ctx.sender,
            src_token: src,
            dst_token: dst,
            amount: consumed,
        });

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::{Chain, SandboxPairFactory, WrappedNative};

    fn owner() -> Address {
        Address::repeat_byte(0x0F)
    }

    fn alice() -> Address {
        Address::repeat_byte(0xAA)
    }

    fn setup() -> (Arc<Chain>, Router) {
        let chain = Arc::new(Chain::new());
        let gateway = Arc::new(WrappedNative::new(Address::repeat_byte(0xEE), chain.clone()));
        let router = Router::new(
            RouterConfig::new(owner()),
            chain.clone(),
            gateway,
            Arc::new(SandboxPairFactory::new()),
        );
        (chain, router)
    }

    #[test]
    fn test_entry_flag_is_exclusive() {
        let (_, router) = setup();

        let guard = router.enter().unwrap();
        assert!(matches!(router.enter(), Err(RouterError::Reentrancy)));
        assert_eq!(
            router.swap(
                CallContext::new(alice()),
                Address::repeat_byte(0x0A),
                Address::repeat_byte(0x0A),
                U256::from(1),
                U256::ZERO,
                Mechanism::StableSwap,
            ),
            Err(RouterError::Reentrancy)
        );

        drop(guard);
        assert!(router.enter().is_ok());
    }

    #[test]
    fn test_identity_swap_moves_nothing() {
        let (chain, router) = setup();
        let token = Address::repeat_byte(0x0A);

        let out = router
            .swap(
                CallContext::new(alice()),
                token,
                token,
                U256::from(5),
                U256::from(5),
                Mechanism::ConstantProductExactIn,
            )
            .unwrap();

        assert_eq!(out, U256::from(5));
        assert_eq!(chain.balance_of(token, router.address()), U256::ZERO);
        assert!(chain.logs().is_empty());
    }

    #[test]
    fn test_registry_update_requires_owner() {
        let (chain, router) = setup();
        let registry = Address::repeat_byte(0x5E);

        assert_eq!(
            router.set_stable_swap_registry(alice(), registry),
            Err(RouterError::Unauthorized(alice()))
        );
        assert_eq!(
            router.set_stable_swap_registry(owner(), Address::ZERO),
            Err(RouterError::ZeroRegistryAddress)
        );
        assert!(router.stable_swap_registry().is_zero());
        assert!(chain.logs().is_empty());

        router.set_stable_swap_registry(owner(), registry).unwrap();
        assert_eq!(router.stable_swap_registry(), registry);
        assert_eq!(chain.logs().len(), 1);
    }

    #[test]
    fn test_stable_first_hop_rejects_value() {
        let (_, router) = setup();
        let ctx = CallContext::new(alice()).with_value(U256::from(1));

        assert_eq!(
            router.swap_multi(
                ctx,
                vec![Address::ZERO, Address::repeat_byte(0x01)],
                U256::from(1),
                U256::ZERO,
                vec![Mechanism::StableSwap],
            ),
            Err(RouterError::InvalidNativeValue {
                expected: U256::ZERO,
                actual: U256::from(1),
            })
        );
    }
}
