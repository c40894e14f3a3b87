//! Cleanup status resolver
//!
//! Reconciles the cached pointer with on-chain submission state. The cache
//! is tried first; when it is missing or wrong, a bounded reverse scan of the
//! most recent submission ids finds the user's latest submission.

use crate::cache::{PendingLocation, PointerCache};
use crate::config::ResolverConfig;
use crate::eligibility::{
    compute_claim_eligibility, ClaimEligibility, REASON_FOREIGN_SUBMISSION,
    REASON_NO_SUBMISSIONS, REASON_THIS_ALREADY_CLAIMED, REASON_UNDER_REVIEW,
};
use alloy_primitives::Address;
use decleanup_contracts_trait::{
    CleanupContracts, CleanupError, CleanupResult, Submission, SubmissionStatus,
};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Read-time projection of a submission for the UI. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationStatus {
    pub cleanup_id: u64,
    pub status: SubmissionStatus,
    /// Approved by a verifier
    pub verified: bool,
    pub rejected: bool,
    /// Base cDCU reward paid out for this submission
    pub base_reward_claimed: bool,
    /// User's Impact Product already covers this submission's level
    pub impact_product_claimed: bool,
    /// User's current Impact Product level
    pub level: u8,
}

impl VerificationStatus {
    pub fn has_pending_cleanup(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn can_claim(&self) -> bool {
        compute_claim_eligibility(self).can_claim
    }
}

/// Outcome of resolving a user's latest submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Resolution {
    Found(VerificationStatus),
    NotFound,
}

impl Resolution {
    pub fn status(&self) -> Option<&VerificationStatus> {
        match self {
            Self::Found(status) => Some(status),
            Self::NotFound => None,
        }
    }
}

/// Everything the UI needs to choose between "submit", "pending", and "claim"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCleanupStatus {
    pub has_pending_cleanup: bool,
    pub can_claim: bool,
    pub cleanup_id: Option<u64>,
    pub verified: bool,
    pub base_reward_claimed: bool,
    pub impact_product_claimed: bool,
    pub level: u8,
    pub rejected: bool,
    pub reason: Option<String>,
}

impl UserCleanupStatus {
    fn not_found() -> Self {
        Self {
            has_pending_cleanup: false,
            can_claim: false,
            cleanup_id: None,
            verified: false,
            base_reward_claimed: false,
            impact_product_claimed: false,
            level: 0,
            rejected: false,
            reason: Some(REASON_NO_SUBMISSIONS.to_string()),
        }
    }

    fn from_status(status: &VerificationStatus) -> Self {
        let eligibility = compute_claim_eligibility(status);
        Self {
            has_pending_cleanup: status.has_pending_cleanup(),
            can_claim: eligibility.can_claim,
            cleanup_id: Some(status.cleanup_id),
            verified: status.verified,
            base_reward_claimed: status.base_reward_claimed,
            impact_product_claimed: status.impact_product_claimed,
            level: status.level,
            rejected: status.rejected,
            reason: eligibility.reason,
        }
    }
}

/// Ids scanned for a counter value, newest first
///
/// Covers `counter - 1` down to `max(lowest_id, counter - window)`.
pub fn scan_range(counter: u64, window: u64, lowest_id: u64) -> impl Iterator<Item = u64> {
    let start = counter.saturating_sub(window).max(lowest_id);
    (start..counter).rev()
}

/// Parse a user-supplied account address
pub fn parse_address(address: &str) -> CleanupResult<Address> {
    Address::from_str(address.trim())
        .map_err(|e| CleanupError::invalid_parameter("address", format!("'{}': {}", address, e)))
}

pub struct StatusResolver {
    contracts: Arc<dyn CleanupContracts>,
    cache: PointerCache,
    config: ResolverConfig,
}

impl StatusResolver {
    pub fn new(
        contracts: Arc<dyn CleanupContracts>,
        cache: PointerCache,
        config: ResolverConfig,
    ) -> Self {
        Self {
            contracts,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &PointerCache {
        &self.cache
    }

    /// Resolve the latest submission of a textual address
    pub async fn resolve_latest(&self, address: &str) -> CleanupResult<Resolution> {
        let address = parse_address(address)?;
        self.resolve_latest_for(&address).await
    }

    /// Resolve the latest submission of `address`
    ///
    /// Only a failure to read the submission counter is an error. Cache
    /// failures are logged and ignored, and per-id fetch failures are skipped.
    pub async fn resolve_latest_for(&self, address: &Address) -> CleanupResult<Resolution> {
        let cached = match self.cache.pending_id(address).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Could not read cached pointer: {}", e);
                None
            }
        };

        if let Some(id) = cached {
            debug!("Checking cached submission {}", id);
            match self.contracts.get_submission(id).await {
                Ok(submission) if !submission.belongs_to(address) => {
                    info!("Cached submission {} belongs to another address", id);
                    self.invalidate(address).await;
                }
                Ok(submission) if submission.is_rejected() => {
                    info!("Cached submission {} was rejected", id);
                    self.invalidate(address).await;
                    return Ok(Resolution::Found(rejected_status(&submission)));
                }
                Ok(submission) => {
                    return Ok(Resolution::Found(self.derive_status(address, &submission).await));
                }
                Err(e) if e.is_does_not_exist() => {
                    info!("Cached submission {} does not exist", id);
                    self.invalidate(address).await;
                }
                Err(e) => {
                    warn!("Could not check cached submission {}: {}", id, e);
                }
            }
        }

        if let Err(e) = self.cache.clear_legacy().await {
            warn!("Could not clear legacy cache keys: {}", e);
        }

        let counter = self.contracts.submission_count().await?;
        debug!(
            "Scanning back from submission counter {} (window {})",
            counter, self.config.scan_window
        );

        for id in scan_range(
            counter,
            self.config.scan_window,
            self.config.lowest_submission_id,
        ) {
            let submission = match self.contracts.get_submission(id).await {
                Ok(submission) => submission,
                Err(e) if e.is_does_not_exist() => {
                    debug!("Submission {} does not exist", id);
                    continue;
                }
                Err(e) => {
                    warn!("Skipping submission {}: {}", id, e);
                    continue;
                }
            };

            if !submission.belongs_to(address) {
                continue;
            }

            if submission.is_rejected() {
                info!("Latest submission {} was rejected", id);
                if cached.is_some() {
                    self.invalidate(address).await;
                }
                return Ok(Resolution::Found(rejected_status(&submission)));
            }

            if cached != Some(id) {
                if let Err(e) = self.cache.remember(address, id, None).await {
                    warn!("Could not cache submission {}: {}", id, e);
                }
            }
            return Ok(Resolution::Found(self.derive_status(address, &submission).await));
        }

        debug!("No submission found for {}", address);
        Ok(Resolution::NotFound)
    }

    /// Full status projection for the UI
    pub async fn user_status(&self, address: &str) -> CleanupResult<UserCleanupStatus> {
        Ok(match self.resolve_latest(address).await? {
            Resolution::Found(status) => UserCleanupStatus::from_status(&status),
            Resolution::NotFound => UserCleanupStatus::not_found(),
        })
    }

    /// Eligibility for a specific submission, or for the latest one
    pub async fn can_claim_level(
        &self,
        address: &str,
        cleanup_id: Option<u64>,
    ) -> CleanupResult<ClaimEligibility> {
        let user = parse_address(address)?;

        let Some(id) = cleanup_id else {
            return Ok(match self.resolve_latest_for(&user).await? {
                Resolution::Found(status) => compute_claim_eligibility(&status),
                Resolution::NotFound => ClaimEligibility::denied(REASON_NO_SUBMISSIONS),
            });
        };

        let submission = self.contracts.get_submission(id).await?;
        if !submission.belongs_to(&user) {
            return Ok(ClaimEligibility::denied(REASON_FOREIGN_SUBMISSION));
        }

        let status = if submission.is_rejected() {
            rejected_status(&submission)
        } else {
            self.derive_status(&user, &submission).await
        };

        let eligibility = compute_claim_eligibility(&status);
        Ok(match eligibility.reason.as_deref() {
            Some(REASON_UNDER_REVIEW) | None => eligibility,
            Some(_) if status.impact_product_claimed => {
                ClaimEligibility::denied(REASON_THIS_ALREADY_CLAIMED)
            }
            Some(_) => eligibility,
        })
    }

    /// Remember a submission the user just created
    ///
    /// With an unknown id any older pointer is dropped, so the next
    /// resolution scans for the new submission.
    pub async fn remember_submission(
        &self,
        address: &Address,
        id: Option<u64>,
        location: Option<PendingLocation>,
    ) -> CleanupResult<()> {
        match id {
            Some(id) => self.cache.remember(address, id, location).await,
            None => {
                warn!("Not caching a submission with unknown id for {}", address);
                self.cache.invalidate(address).await
            }
        }
    }

    async fn invalidate(&self, address: &Address) {
        if let Err(e) = self.cache.invalidate(address).await {
            warn!("Could not invalidate cached pointer: {}", e);
        }
    }

    async fn derive_status(&self, address: &Address, submission: &Submission) -> VerificationStatus {
        let (level, impact_product_claimed) = match self.contracts.user_level(*address).await {
            Ok(level) => (level, level >= self.config.submission_level),
            Err(e) => {
                warn!(
                    "Could not read Impact Product level, falling back to reward flag: {}",
                    e
                );
                (0, submission.reward_paid)
            }
        };

        VerificationStatus {
            cleanup_id: submission.id,
            status: submission.status,
            verified: submission.is_approved(),
            rejected: false,
            base_reward_claimed: submission.reward_paid,
            impact_product_claimed,
            level,
        }
    }
}

fn rejected_status(submission: &Submission) -> VerificationStatus {
    VerificationStatus {
        cleanup_id: submission.id,
        status: SubmissionStatus::Rejected,
        verified: false,
        rejected: true,
        base_reward_claimed: submission.reward_paid,
        impact_product_claimed: false,
        level: 0,
    }
}
