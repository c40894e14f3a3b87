//! Cleanup Contracts Trait - core abstraction over the DeCleanup contract suite
//!
//! This crate defines the [`CleanupContracts`] trait, a typed interface over the
//! three on-chain contracts the rewards client talks to:
//!
//! - **Verification** (`Submission.sol`): cleanup submissions, verifier
//!   decisions, base rewards
//! - **Impact Product** NFT: the per-user leveled token
//! - **Reward Distributor**: cDCU points and hypercert rewards
//!
//! It also defines [`WalletConnector`], the seam to the user's wallet.

use alloy_primitives::Address;
use async_trait::async_trait;

pub mod error;
pub mod types;
pub mod wallet;

pub use error::{CleanupError, CleanupResult, ErrorKind};
pub use types::*;
pub use wallet::{WalletConnector, WalletError, WalletErrorKind, WalletResult};

/// Transaction hash as a `0x`-prefixed hex string
pub type TxHash = String;

/// Main trait for reading and writing the cleanup contracts
///
/// Write operations take an optional `chain_hint`: a chain id the caller
/// already knows the wallet is on. Implementations trust a hint that equals
/// the required chain and skip their own chain checks.
#[async_trait]
pub trait CleanupContracts: Send + Sync {
    // ===== Verification contract - Read Operations =====

    /// Global submission counter (`submissionCount()`)
    async fn submission_count(&self) -> CleanupResult<u64>;

    /// Fetch a submission. Returns [`CleanupError::DoesNotExist`] when the
    /// contract has no record (zero submitter or revert).
    async fn get_submission(&self, id: u64) -> CleanupResult<Submission>;

    /// Current submission fee settings
    async fn submission_fee(&self) -> CleanupResult<FeeInfo>;

    /// Base rewards claimable by a user, in wei
    async fn claimable_rewards(&self, user: Address) -> CleanupResult<alloy_primitives::U256>;

    /// Whether an account holds the verifier (admin) role
    async fn is_verifier(&self, account: Address) -> CleanupResult<bool>;

    /// Hypercert eligibility counters for a user
    async fn hypercert_eligibility(&self, user: Address) -> CleanupResult<HypercertEligibility>;

    // ===== Verification contract - Write Operations =====

    /// Create a submission and return its id
    ///
    /// `None` when the transaction confirmed but the id could not be learned.
    async fn create_submission(
        &self,
        submission: &NewSubmission,
        chain_hint: Option<u64>,
    ) -> CleanupResult<Option<u64>>;

    /// Approve a submission (verifier only)
    async fn approve_submission(&self, id: u64, chain_hint: Option<u64>) -> CleanupResult<TxHash>;

    /// Reject a submission (verifier only)
    async fn reject_submission(&self, id: u64, chain_hint: Option<u64>) -> CleanupResult<TxHash>;

    /// Claim accumulated rewards for the signer
    async fn claim_rewards(&self, chain_hint: Option<u64>) -> CleanupResult<TxHash>;

    /// Attach recyclables evidence to an existing submission
    async fn attach_recyclables(
        &self,
        id: u64,
        photo_hash: &str,
        receipt_hash: Option<&str>,
        chain_hint: Option<u64>,
    ) -> CleanupResult<TxHash>;

    // ===== Impact Product NFT =====

    /// User's current Impact Product level (`userCurrentLevel`)
    async fn user_level(&self, user: Address) -> CleanupResult<u8>;

    /// Token id of the user's Impact Product
    async fn user_token_id(&self, user: Address) -> CleanupResult<u64>;

    /// Token URI for a token id
    async fn token_uri(&self, token_id: u64) -> CleanupResult<String>;

    /// Metadata URI for a level
    async fn token_uri_for_level(&self, level: u8) -> CleanupResult<String>;

    // ===== Reward Distributor =====

    /// cDCU balance (points, or token balance after migration)
    async fn points_balance(&self, user: Address) -> CleanupResult<DcuBalance>;

    /// Claim the reward for a minted hypercert
    async fn claim_hypercert_reward(
        &self,
        hypercert_number: u64,
        chain_hint: Option<u64>,
    ) -> CleanupResult<TxHash>;
}
