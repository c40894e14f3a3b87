//! Contract ABI bindings module
//!
//! Alloy bindings for the three DeCleanup contracts.

pub mod impact_product;
pub mod reward_distributor;
pub mod submission;

pub use impact_product::ImpactProductNFT;
pub use reward_distributor::RewardDistributor;
pub use submission::SubmissionContract;
