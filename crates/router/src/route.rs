//! Routes: the ordered assets a swap passes through and the mechanism used
//! for every hop.

use crate::error::RouterError;
use crate::types::{Mechanism, TokenId};

/// A single hop in a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    /// The input token for this hop.
    pub token_in: TokenId,
    /// The output token for this hop.
    pub token_out: TokenId,
    /// The mechanism that prices this hop.
    pub mechanism: Mechanism,
}

impl Hop {
    /// Hops whose input and output coincide are skipped.
    pub fn is_identity(&self) -> bool {
        self.token_in == self.token_out
    }
}

/// A validated route of `N >= 2` tokens and `N - 1` mechanism flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    tokens: Vec<TokenId>,
    mechanisms: Vec<Mechanism>,
}

impl Route {
    /// Build a route, checking that there is exactly one mechanism per hop.
    pub fn new(tokens: Vec<TokenId>, mechanisms: Vec<Mechanism>) -> Result<Self, RouterError> {
        if tokens.len() < 2 || tokens.len() != mechanisms.len() + 1 {
            return Err(RouterError::InvalidRouteLength {
                assets: tokens.len(),
                mechanisms: mechanisms.len(),
            });
        }
        Ok(Self { tokens, mechanisms })
    }

    /// A one-hop route.
    pub fn single(token_in: TokenId, token_out: TokenId, mechanism: Mechanism) -> Self {
        Self {
            tokens: vec![token_in, token_out],
            mechanisms: vec![mechanism],
        }
    }

    /// Get the number of hops in this route.
    pub fn len(&self) -> usize {
        self.mechanisms.len()
    }

    /// Always false: a route has at least one hop.
    pub fn is_empty(&self) -> bool {
        self.mechanisms.is_empty()
    }

    /// Get the input token.
    pub fn token_in(&self) -> TokenId {
        self.tokens[0]
    }

    /// Get the output token.
    pub fn token_out(&self) -> TokenId {
        self.tokens[self.tokens.len() - 1]
    }

    /// Get every token on the route, input first.
    pub fn tokens(&self) -> &[TokenId] {
        &self.tokens
    }

    /// Get the mechanism of every hop, in order.
    pub fn mechanisms(&self) -> &[Mechanism] {
        &self.mechanisms
    }

    /// Iterate over the hops in order.
    pub fn hops(&self) -> impl Iterator<Item = Hop> + '_ {
        self.tokens
            .windows(2)
            .zip(&self.mechanisms)
            .map(|(window, &mechanism)| Hop {
                token_in: window[0],
                token_out: window[1],
                mechanism,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, NATIVE_TOKEN};

    fn setup_tokens() -> (TokenId, TokenId, TokenId) {
        let eth = NATIVE_TOKEN;
        let usdc = Address::repeat_byte(0x01);
        let wbtc = Address::repeat_byte(0x02);
        (eth, usdc, wbtc)
    }

    #[test]
    fn test_route_hops() {
        let (eth, usdc, wbtc) = setup_tokens();
        let route = Route::new(
            vec![eth, usdc, wbtc],
            vec![Mechanism::ConstantProductExactIn, Mechanism::StableSwap],
        )
        .unwrap();

        assert_eq!(route.len(), 2);
        assert_eq!(route.token_in(), eth);
        assert_eq!(route.token_out(), wbtc);

        let hops: Vec<Hop> = route.hops().collect();
        assert_eq!(
            hops,
            vec![
                Hop {
                    token_in: eth,
                    token_out: usdc,
                    mechanism: Mechanism::ConstantProductExactIn,
                },
                Hop {
                    token_in: usdc,
                    token_out: wbtc,
                    mechanism: Mechanism::StableSwap,
                },
            ]
        );
    }

    #[test]
    fn test_route_length_mismatch() {
        let (eth, usdc, wbtc) = setup_tokens();

        assert_eq!(
            Route::new(vec![eth, usdc, wbtc], vec![Mechanism::StableSwap]),
            Err(RouterError::InvalidRouteLength {
                assets: 3,
                mechanisms: 1,
            })
        );
        assert_eq!(
            Route::new(
                vec![eth, usdc],
                vec![Mechanism::StableSwap, Mechanism::StableSwap]
            ),
            Err(RouterError::InvalidRouteLength {
                assets: 2,
                mechanisms: 2,
            })
        );
        // A lone token is not a route even though the counts line up.
        assert_eq!(
            Route::new(vec![eth], vec![]),
            Err(RouterError::InvalidRouteLength {
                assets: 1,
                mechanisms: 0,
            })
        );
    }

    #[test]
    fn test_identity_hop() {
        let (_, usdc, wbtc) = setup_tokens();
        let route = Route::new(
            vec![usdc, usdc, wbtc],
            vec![Mechanism::StableSwap, Mechanism::ConstantProductExactIn],
        )
        .unwrap();

        let identity: Vec<bool> = route.hops().map(|h| h.is_identity()).collect();
        assert_eq!(identity, vec![true, false]);
    }
}
