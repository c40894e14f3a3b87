//! Reward Distributor contract bindings
//!
//! The distributor is upgradeable; `getDCUBalance` only exists from V2 on.

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    contract RewardDistributor {
        function getPointsBalance(address user) external view returns (uint256);
        function getDCUBalance(address user) external view returns (uint256 balance, bool isTokenBalance);
        function claimHypercertReward(uint256 hypercertNumber) external;
    }
}
