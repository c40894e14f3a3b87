//! Submission-related types

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinates are stored on-chain as integers scaled by this factor
pub const COORDINATE_SCALE: f64 = 1e6;

/// Verification status of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStatus {
    /// Awaiting a verifier decision
    Pending,
    /// Approved by a verifier
    Approved,
    /// Rejected by a verifier
    Rejected,
}

impl SubmissionStatus {
    /// Decode the on-chain status byte (`0=Pending, 1=Approved, 2=Rejected`)
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Pending),
            1 => Some(Self::Approved),
            2 => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Approved and Rejected never change again
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Approved => write!(f, "Approved"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

/// A cleanup submission as recorded by the verification contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: u64,
    pub submitter: Address,
    pub data_uri: String,
    pub before_photo_hash: String,
    pub after_photo_hash: String,
    /// IPFS hash of the impact report JSON, if one was attached
    pub impact_report_hash: Option<String>,
    /// Latitude in degrees × 10⁶
    pub latitude_e6: i64,
    /// Longitude in degrees × 10⁶
    pub longitude_e6: i64,
    /// Creation time, unix seconds
    pub created_at: u64,
    pub status: SubmissionStatus,
    pub approver: Option<Address>,
    pub processed_at: Option<u64>,
    /// Base cleanup reward paid out
    pub reward_paid: bool,
    pub fee_paid: U256,
    pub fee_refunded: bool,
    pub has_impact_form: bool,
}

impl Submission {
    /// Latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude_e6 as f64 / COORDINATE_SCALE
    }

    /// Longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude_e6 as f64 / COORDINATE_SCALE
    }

    pub fn belongs_to(&self, address: &Address) -> bool {
        self.submitter == *address
    }

    pub fn is_approved(&self) -> bool {
        self.status == SubmissionStatus::Approved
    }

    pub fn is_rejected(&self) -> bool {
        self.status == SubmissionStatus::Rejected
    }
}

/// Parameters for `createSubmission`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubmission {
    pub data_uri: String,
    pub before_photo_hash: String,
    pub after_photo_hash: String,
    pub impact_report_hash: Option<String>,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    pub referrer: Option<Address>,
    /// Submission fee to attach, in wei
    pub fee: U256,
}

impl NewSubmission {
    /// Coordinates scaled to on-chain integers, rounding toward negative infinity
    pub fn scaled_coordinates(&self) -> (i64, i64) {
        (
            scale_coordinate(self.latitude),
            scale_coordinate(self.longitude),
        )
    }

    /// Referrer to encode; the zero address when absent
    pub fn referrer_or_zero(&self) -> Address {
        self.referrer.unwrap_or(Address::ZERO)
    }
}

/// Scale a coordinate in degrees to the on-chain integer representation
pub fn scale_coordinate(degrees: f64) -> i64 {
    (degrees * COORDINATE_SCALE).floor() as i64
}

/// Submission fee settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeInfo {
    /// Fee in wei
    pub fee: U256,
    pub enabled: bool,
}

/// Hypercert eligibility as reported by the verification contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HypercertEligibility {
    pub cleanup_count: u64,
    pub hypercert_count: u64,
    pub is_eligible: bool,
}

/// cDCU balance held by a user
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DcuBalance {
    /// Balance in whole cDCU
    pub amount: f64,
    /// True once points were migrated to the ERC-20 token
    pub is_token_balance: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_u8() {
        assert_eq!(SubmissionStatus::from_u8(0), Some(SubmissionStatus::Pending));
        assert_eq!(SubmissionStatus::from_u8(1), Some(SubmissionStatus::Approved));
        assert_eq!(SubmissionStatus::from_u8(2), Some(SubmissionStatus::Rejected));
        assert_eq!(SubmissionStatus::from_u8(3), None);
    }

    #[test]
    fn test_only_pending_is_open() {
        assert!(!SubmissionStatus::Pending.is_terminal());
        assert!(SubmissionStatus::Approved.is_terminal());
        assert!(SubmissionStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_scale_coordinate_floors() {
        assert_eq!(scale_coordinate(52.5), 52_500_000);
        assert_eq!(scale_coordinate(-0.0000015), -2);
        assert_eq!(scale_coordinate(-13.25), -13_250_000);
        assert_eq!(scale_coordinate(0.0), 0);
    }

    #[test]
    fn test_referrer_or_zero() {
        let submission = NewSubmission {
            data_uri: "ipfs://placeholder".to_string(),
            before_photo_hash: "QmBefore".to_string(),
            after_photo_hash: "QmAfter".to_string(),
            impact_report_hash: None,
            latitude: 1.0,
            longitude: 2.0,
            referrer: None,
            fee: U256::ZERO,
        };
        assert_eq!(submission.referrer_or_zero(), Address::ZERO);
        assert_eq!(submission.scaled_coordinates(), (1_000_000, 2_000_000));
    }
}
