//! Router predeploy contract bindings and selectors.

use alloy_sol_macro::sol;

sol! {
    /// Calls accepted at the router address.
    interface SwapRouter {
        function swap(
            address srcToken,
            address dstToken,
            uint256 amount,
            uint256 minReturn,
            uint8 mechanism
        ) external payable returns (uint256);

        function swapMulti(
            address[] tokens,
            uint256 amount,
            uint256 minReturn,
            uint8[] mechanisms
        ) external payable returns (uint256);

        function setStableSwapRegistry(address registry) external;

        function stableSwapRegistry() external view returns (address);

        function owner() external view returns (address);
    }
}

pub mod selectors {
    use super::SwapRouter;
    use alloy_sol_types::SolCall;

    pub const SWAP: [u8; 4] = SwapRouter::swapCall::SELECTOR;
    pub const SWAP_MULTI: [u8; 4] = SwapRouter::swapMultiCall::SELECTOR;
    pub const SET_STABLE_SWAP_REGISTRY: [u8; 4] = SwapRouter::setStableSwapRegistryCall::SELECTOR;
    pub const STABLE_SWAP_REGISTRY: [u8; 4] = SwapRouter::stableSwapRegistryCall::SELECTOR;
    pub const OWNER: [u8; 4] = SwapRouter::ownerCall::SELECTOR;
}
