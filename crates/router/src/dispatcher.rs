//! Hop-by-hop execution of a route.

use crate::adapters::{swap_constant_product, swap_stable, HopEnv, HopOutcome};
use crate::asset;
use crate::error::RouterError;
use crate::host::Host;
use crate::route::Route;
use crate::types::{Address, Amount, Mechanism, TokenId};
use std::collections::HashMap;
use tracing::debug;

/// Router balances of every route asset, captured before custody.
///
/// Hops only spend what the call brought in on top of these, so funds the
/// router already held are neither swapped nor paid out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Baseline {
    balances: HashMap<TokenId, Amount>,
}

impl Baseline {
    /// Snapshot `holder`'s balance of every token on `route`.
    pub fn capture(host: &dyn Host, holder: Address, route: &Route) -> Self {
        let balances = route
            .tokens()
            .iter()
            .map(|&token| (token, asset::balance_of(host, token, holder)))
            .collect();
        Self { balances }
    }

    /// Captured balance of `token`; zero for tokens off the route.
    pub fn of(&self, token: TokenId) -> Amount {
        self.balances.get(&token).copied().unwrap_or_default()
    }
}

/// Run every hop of `route` on the router's balances.
///
/// Each hop spends everything the router gained in its input token since
/// `baseline` was captured, so the output of one hop is the input of the
/// next without an explicit transfer. Identity hops are skipped. The first
/// failing hop aborts the route.
pub fn execute_route(
    env: &HopEnv<'_>,
    route: &Route,
    baseline: &Baseline,
) -> Result<Vec<HopOutcome>, RouterError> {
    let mut outcomes = Vec::with_capacity(route.len());

    for (index, hop) in route.hops().enumerate() {
        if hop.is_identity() {
            debug!("hop {}: {:?} -> itself, skipped", index, hop.token_in);
            outcomes.push(HopOutcome::Skipped);
            continue;
        }

        let amount = asset::balance_of(env.host, hop.token_in, env.router)
            .saturating_sub(baseline.of(hop.token_in));
        let outcome = match hop.mechanism {
            Mechanism::StableSwap => swap_stable(env, hop.token_in, hop.token_out, amount)?,
            Mechanism::ConstantProductExactIn => {
                swap_constant_product(env, hop.token_in, hop.token_out, amount)?
            }
        };

        debug!(
            "hop {}: {:?} -> {:?} via {}: {:?}",
            index, hop.token_in, hop.token_out, hop.mechanism, outcome
        );
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::{
        Chain, SandboxPair, SandboxPairFactory, SandboxStablePool, SandboxStableRegistry,
        WrappedNative,
    };
    use crate::types::U256;
    use std::sync::Arc;

    fn usdc() -> Address {
        Address::repeat_byte(0x01)
    }

    fn wbtc() -> Address {
        Address::repeat_byte(0x02)
    }

    fn dai() -> Address {
        Address::repeat_byte(0x03)
    }

    fn router() -> Address {
        Address::repeat_byte(0x52)
    }

    fn registry_address() -> Address {
        Address::repeat_byte(0x5E)
    }

    struct Fixture {
        chain: Arc<Chain>,
        gateway: WrappedNative,
        pairs: SandboxPairFactory,
        registry: Arc<SandboxStableRegistry>,
    }

    impl Fixture {
        fn new() -> Self {
            let chain = Arc::new(Chain::new());
            let registry = Arc::new(SandboxStableRegistry::new(registry_address()));
            chain.deploy_stable_registry(registry.clone());

            let pair = SandboxPair::new(Address::repeat_byte(0x70), usdc(), wbtc(), chain.clone())
                .with_fee_bps(0);
            pair.add_liquidity(usdc(), U256::from(1_000), U256::from(1_000));
            let pairs = SandboxPairFactory::new();
            pairs.add_pair(usdc(), wbtc(), Arc::new(pair));

            Self {
                gateway: WrappedNative::new(Address::repeat_byte(0xEE), chain.clone()),
                pairs,
                chain,
                registry,
            }
        }

        fn env(&self) -> HopEnv<'_> {
            HopEnv {
                host: self.chain.as_ref(),
                gateway: &self.gateway,
                pairs: &self.pairs,
                stable_registry: registry_address(),
                router: router(),
            }
        }
    }

    #[test]
    fn test_outputs_feed_next_hop() {
        let fx = Fixture::new();
        let pool = SandboxStablePool::new(Address::repeat_byte(0x50), dai(), usdc(), fx.chain.clone())
            .with_fee_bps(0);
        pool.seed(U256::from(10_000), U256::from(10_000));
        fx.registry.add_pool(Arc::new(pool));
        fx.chain.mint(dai(), router(), U256::from(250));

        let route = Route::new(
            vec![dai(), usdc(), wbtc()],
            vec![Mechanism::StableSwap, Mechanism::ConstantProductExactIn],
        )
        .unwrap();
        let outcomes = execute_route(&fx.env(), &route, &Baseline::default()).unwrap();

        // 250 * 1000 / (1000 + 250) = 200
        assert_eq!(
            outcomes,
            vec![
                HopOutcome::Swapped {
                    amount_in: U256::from(250),
                    amount_out: U256::from(250),
                },
                HopOutcome::Swapped {
                    amount_in: U256::from(250),
                    amount_out: U256::from(200),
                },
            ]
        );
        assert_eq!(fx.chain.balance_of(wbtc(), router()), U256::from(200));
        assert_eq!(fx.chain.balance_of(usdc(), router()), U256::ZERO);
        assert_eq!(fx.chain.balance_of(dai(), router()), U256::ZERO);
    }

    #[test]
    fn test_identity_hops_are_skipped() {
        let fx = Fixture::new();
        fx.chain.mint(usdc(), router(), U256::from(100));

        let route = Route::new(
            vec![usdc(), usdc(), wbtc()],
            vec![Mechanism::StableSwap, Mechanism::ConstantProductExactIn],
        )
        .unwrap();
        let outcomes = execute_route(&fx.env(), &route, &Baseline::default()).unwrap();

        assert_eq!(outcomes[0], HopOutcome::Skipped);
        // 100 * 1000 / 1100 = 90
        assert_eq!(fx.chain.balance_of(wbtc(), router()), U256::from(90));
    }

    #[test]
    fn test_failing_hop_aborts_route() {
        let fx = Fixture::new();
        fx.chain.mint(usdc(), router(), U256::from(100));

        // No dai pair exists, so the second hop fails.
        let route = Route::new(
            vec![usdc(), wbtc(), dai()],
            vec![
                Mechanism::ConstantProductExactIn,
                Mechanism::ConstantProductExactIn,
            ],
        )
        .unwrap();

        let err = execute_route(&fx.env(), &route, &Baseline::default()).unwrap_err();
        assert!(matches!(err, RouterError::Upstream(_)));
    }

    #[test]
    fn test_prior_balances_are_not_spent() {
        let fx = Fixture::new();
        fx.chain.mint(usdc(), router(), U256::from(40));
        fx.chain.mint(wbtc(), router(), U256::from(7));

        let route = Route::single(usdc(), wbtc(), Mechanism::ConstantProductExactIn);
        let baseline = Baseline::capture(fx.chain.as_ref(), router(), &route);
        assert_eq!(baseline.of(usdc()), U256::from(40));
        assert_eq!(baseline.of(dai()), U256::ZERO);

        fx.chain.mint(usdc(), router(), U256::from(100));
        let outcomes = execute_route(&fx.env(), &route, &baseline).unwrap();

        // 100 * 1000 / 1100 = 90
        assert_eq!(
            outcomes,
            vec![HopOutcome::Swapped {
                amount_in: U256::from(100),
                amount_out: U256::from(90),
            }]
        );
        assert_eq!(fx.chain.balance_of(usdc(), router()), U256::from(40));
        assert_eq!(fx.chain.balance_of(wbtc(), router()), U256::from(97));
    }
}
