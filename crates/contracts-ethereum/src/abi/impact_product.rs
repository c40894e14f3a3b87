//! Impact Product NFT contract bindings

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    contract ImpactProductNFT {
        function claimLevelForUser(address user, uint256 cleanupId, uint8 level) external;
        function getUserTokenId(address user) external view returns (uint256);
        function tokenURI(uint256 tokenId) external view returns (string);
        function tokenLevel(uint256 tokenId) external view returns (uint8);
        function userCurrentLevel(address user) external view returns (uint8);
        function getTokenURIForLevel(uint8 level) external view returns (string);
    }
}
