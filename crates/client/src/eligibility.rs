//! Claim eligibility derived from a resolved verification status

use crate::resolver::VerificationStatus;
use serde::Serialize;

pub const REASON_NO_SUBMISSIONS: &str = "No cleanup submissions found. Submit a cleanup first.";
pub const REASON_UNDER_REVIEW: &str =
    "Your cleanup is still under review. Please wait for verification.";
pub const REASON_REJECTED: &str =
    "Your latest cleanup submission was rejected. Please submit a new cleanup.";
pub const REASON_ALREADY_CLAIMED: &str = "Your cleanup has already been claimed.";
pub const REASON_THIS_ALREADY_CLAIMED: &str = "This cleanup has already been claimed.";
pub const REASON_FOREIGN_SUBMISSION: &str = "This cleanup was submitted by a different address.";

/// Whether the Impact Product for a submission can be claimed, and why not
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimEligibility {
    pub can_claim: bool,
    pub reason: Option<String>,
}

impl ClaimEligibility {
    pub fn allowed() -> Self {
        Self {
            can_claim: true,
            reason: None,
        }
    }

    pub fn denied(reason: &str) -> Self {
        Self {
            can_claim: false,
            reason: Some(reason.to_string()),
        }
    }
}

/// `can_claim = verified && !impact_product_claimed`
///
/// The base reward flag plays no part: it tracks the cDCU payout, not the
/// Impact Product level.
pub fn compute_claim_eligibility(status: &VerificationStatus) -> ClaimEligibility {
    if status.rejected {
        ClaimEligibility::denied(REASON_REJECTED)
    } else if !status.verified {
        ClaimEligibility::denied(REASON_UNDER_REVIEW)
    } else if status.impact_product_claimed {
        ClaimEligibility::denied(REASON_ALREADY_CLAIMED)
    } else {
        ClaimEligibility::allowed()
    }
}
