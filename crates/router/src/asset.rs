//! Uniform operations over an asset that is either the native currency or a
//! fungible token.
//!
//! Everything that branches on [`is_native`] lives here so routing code never
//! has to.

use crate::error::{CollaboratorError, RouterError};
use crate::host::Host;
use crate::types::{is_native, Address, Amount, CallContext, TokenId, U256};

/// Balance of `owner` in `token`.
pub fn balance_of(host: &dyn Host, token: TokenId, owner: Address) -> Amount {
    if is_native(token) {
        host.native_balance(owner)
    } else {
        host.balance_of(token, owner)
    }
}

/// Send `amount` of `token` from `from` to `to`. Zero amounts are a no-op.
pub fn transfer(
    host: &dyn Host,
    token: TokenId,
    from: Address,
    to: Address,
    amount: Amount,
) -> Result<(), CollaboratorError> {
    if amount.is_zero() {
        return Ok(());
    }
    if is_native(token) {
        host.send_native(from, to, amount)
    } else {
        host.transfer(token, from, to, amount)
    }
}

/// Pull `amount` of `token` from the caller into `to`.
///
/// Native currency must arrive as the call's attached value, exactly
/// `amount` of it. Token pulls consume the allowance the caller granted `to`
/// and must not carry native value.
pub fn transfer_from_caller(
    host: &dyn Host,
    token: TokenId,
    ctx: &CallContext,
    to: Address,
    amount: Amount,
) -> Result<(), RouterError> {
    if is_native(token) {
        if ctx.value != amount {
            return Err(RouterError::InvalidNativeValue {
                expected: amount,
                actual: ctx.value,
            });
        }
        transfer(host, token, ctx.sender, to, amount)?;
        return Ok(());
    }

    if !ctx.value.is_zero() {
        return Err(RouterError::InvalidNativeValue {
            expected: U256::ZERO,
            actual: ctx.value,
        });
    }
    if !amount.is_zero() {
        host.transfer_from(token, to, ctx.sender, to, amount)?;
    }
    Ok(())
}

/// Let `spender` move `amount` of `owner`'s `token`. Native currency has no
/// allowances, so this is a no-op for it.
pub fn approve(
    host: &dyn Host,
    token: TokenId,
    owner: Address,
    spender: Address,
    amount: Amount,
) -> Result<(), CollaboratorError> {
    if is_native(token) {
        return Ok(());
    }
    host.approve(token, owner, spender, amount)
}
