//! Verification contract bindings (`Submission.sol`)

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    contract SubmissionContract {
        struct SubmissionDetails {
            uint256 id;
            address submitter;
            string dataURI;
            string beforePhotoHash;
            string afterPhotoHash;
            string impactFormDataHash;
            int256 latitude;
            int256 longitude;
            uint256 timestamp;
            uint8 status;
            address approver;
            uint256 processedTimestamp;
            bool rewarded;
            uint256 feePaid;
            bool feeRefunded;
            bool hasImpactForm;
        }

        function createSubmission(
            string calldata dataURI,
            string calldata beforePhotoHash,
            string calldata afterPhotoHash,
            string calldata impactFormDataHash,
            int256 lat,
            int256 lng,
            address referrer
        ) external payable returns (uint256);
        function attachRecyclables(uint256 submissionId, string calldata recyclablesPhotoHash, string calldata recyclablesReceiptHash) external;
        function approveSubmission(uint256 submissionId) external;
        function rejectSubmission(uint256 submissionId) external;
        function claimRewards() external;

        function getSubmissionDetails(uint256 submissionId) external view returns (SubmissionDetails memory);
        function getHypercertEligibility(address user) external view returns (uint256 cleanupCount, uint256 hypercertCount, bool isEligible);
        function submissionCount() external view returns (uint256);
        function submissionFee() external view returns (uint256);
        function feeEnabled() external view returns (bool);
        function hasRole(bytes32 role, address account) external view returns (bool);
        function getClaimableRewards(address user) external view returns (uint256);
    }
}
