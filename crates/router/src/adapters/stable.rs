//! Stable-pool hop.

use super::{HopEnv, HopOutcome};
use crate::asset;
use crate::error::{CollaboratorError, RouterError};
use crate::gateway::{unwrap_received, wrap, wrapped};
use crate::interfaces::StablePool;
use crate::types::{is_native, Amount, TokenId, U256};
use tracing::{debug, warn};

/// Swap `amount` of `token_in` for `token_out` through the stable pool the
/// registry lists for the two tokens.
///
/// A missing pool is not an error: the hop passes the input through
/// untouched and reports [`HopOutcome::PassedThrough`]. No per-hop minimum
/// is applied; the route-level minimum covers the whole swap.
pub fn swap_stable(
    env: &HopEnv<'_>,
    token_in: TokenId,
    token_out: TokenId,
    amount: Amount,
) -> Result<HopOutcome, RouterError> {
    let registry = env
        .host
        .stable_registry(env.stable_registry)
        .ok_or(CollaboratorError::RegistryNotDeployed(env.stable_registry))?;

    let coin_in = wrapped(env.gateway, token_in);
    let coin_out = wrapped(env.gateway, token_out);

    let Some(pool) = registry.find_pool_for_coins(coin_in, coin_out) else {
        warn!(
            "no stable pool for {:?} -> {:?}, passing {} through",
            coin_in, coin_out, amount
        );
        return Ok(HopOutcome::PassedThrough);
    };

    let i = coin_index(pool.as_ref(), coin_in)?;
    let j = coin_index(pool.as_ref(), coin_out)?;
    debug!(
        "stable hop via {:?}: i={}, j={}, amount={}",
        pool.address(),
        i,
        j,
        amount
    );

    if is_native(token_in) {
        wrap(env.gateway, env.router, amount)?;
    }
    asset::approve(env.host, coin_in, env.router, pool.address(), amount)?;
    let coin_out_before = asset::balance_of(env.host, coin_out, env.router);
    let amount_out = pool.exchange(env.router, i, j, amount, U256::ZERO)?;

    if is_native(token_out) {
        unwrap_received(env.host, env.gateway, env.router, coin_out_before)?;
    }

    Ok(HopOutcome::Swapped {
        amount_in: amount,
        amount_out,
    })
}

/// Slot `coin` occupies in the pool.
fn coin_index(pool: &dyn StablePool, coin: TokenId) -> Result<i128, RouterError> {
    for slot in 0..2 {
        if pool.coins(slot)? == coin {
            return Ok(slot as i128);
        }
    }
    Err(RouterError::UnresolvedAssetSlot {
        pool: pool.address(),
        token: coin,
    })
}
