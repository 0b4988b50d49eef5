//! Native currency wrapping.

use crate::error::CollaboratorError;
use crate::host::Host;
use crate::interfaces::NativeGateway;
use crate::types::{is_native, Address, Amount, TokenId};

/// Token a pool sees for `token`: the wrapped token for native currency,
/// `token` itself otherwise.
pub fn wrapped(gateway: &dyn NativeGateway, token: TokenId) -> TokenId {
    if is_native(token) {
        gateway.token()
    } else {
        token
    }
}

/// Wrap `amount` of `holder`'s native currency.
pub fn wrap(
    gateway: &dyn NativeGateway,
    holder: Address,
    amount: Amount,
) -> Result<(), CollaboratorError> {
    if amount.is_zero() {
        return Ok(());
    }
    gateway.deposit(holder, amount)
}

/// Unwrap whatever wrapped token `holder` gained on top of `before`.
/// Returns the amount unwrapped.
pub fn unwrap_received(
    host: &dyn Host,
    gateway: &dyn NativeGateway,
    holder: Address,
    before: Amount,
) -> Result<Amount, CollaboratorError> {
    let received = host
        .balance_of(gateway.token(), holder)
        .saturating_sub(before);
    if !received.is_zero() {
        gateway.withdraw(holder, received)?;
    }
    Ok(received)
}
