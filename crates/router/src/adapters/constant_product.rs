//! Constant-product hop.

use super::{HopEnv, HopOutcome};
use crate::asset;
use crate::error::{CollaboratorError, RouterError};
use crate::gateway::{unwrap_received, wrap, wrapped};
use crate::types::{is_native, Amount, TokenId, U256};
use tracing::debug;

/// Swap exactly `amount` of `token_in` for `token_out` through their pair.
///
/// The input is sent to the pair first and the pair's own quote decides the
/// output. When the pair reports stale reserves it is synced before the
/// swap. Output is requested on the side of the token that sorts opposite
/// to the input: `token0` is the lower address.
pub fn swap_constant_product(
    env: &HopEnv<'_>,
    token_in: TokenId,
    token_out: TokenId,
    amount: Amount,
) -> Result<HopOutcome, RouterError> {
    if is_native(token_in) {
        wrap(env.gateway, env.router, amount)?;
    }

    let coin_in = wrapped(env.gateway, token_in);
    let coin_out = wrapped(env.gateway, token_out);

    let pair = env
        .pairs
        .get_pair(coin_in, coin_out)
        .ok_or(CollaboratorError::PairNotFound {
            token_a: coin_in,
            token_b: coin_out,
        })?;

    asset::transfer(env.host, coin_in, env.router, pair.address(), amount)?;

    let (amount_out, needs_sync) = pair.get_return(coin_in, coin_out, amount)?;
    if needs_sync {
        debug!("pair {:?} reports stale reserves, syncing", pair.address());
        pair.sync()?;
    }

    let (amount0_out, amount1_out) = if coin_in < coin_out {
        (U256::ZERO, amount_out)
    } else {
        (amount_out, U256::ZERO)
    };
    debug!(
        "constant-product hop via {:?}: in={}, out0={}, out1={}",
        pair.address(),
        amount,
        amount0_out,
        amount1_out
    );
    let coin_out_before = asset::balance_of(env.host, coin_out, env.router);
    pair.swap(env.router, amount0_out, amount1_out, env.router, &[])?;

    if is_native(token_out) {
        unwrap_received(env.host, env.gateway, env.router, coin_out_before)?;
    }

    Ok(HopOutcome::Swapped {
        amount_in: amount,
        amount_out,
    })
}
