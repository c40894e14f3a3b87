//! Submission conversions between Solidity and Rust

use super::helpers::*;
use crate::abi::submission::SubmissionContract::SubmissionDetails;
use crate::error::{EthereumCleanupError, Result};
use alloy::primitives::Address;
use decleanup_contracts_trait::{Submission, SubmissionStatus};

/// Decode the status byte, rejecting values outside the enum
pub fn convert_submission_status(status: u8) -> Result<SubmissionStatus> {
    SubmissionStatus::from_u8(status).ok_or_else(|| {
        EthereumCleanupError::Conversion(format!("unknown submission status {}", status))
    })
}

/// Convert `getSubmissionDetails` output into a [`Submission`]
///
/// Returns `Ok(None)` when the submitter is the zero address, which the
/// contract uses for ids that were never created.
pub fn convert_submission(details: SubmissionDetails) -> Result<Option<Submission>> {
    if details.submitter == Address::ZERO {
        return Ok(None);
    }

    Ok(Some(Submission {
        id: u256_to_u64(details.id),
        submitter: details.submitter,
        data_uri: details.dataURI,
        before_photo_hash: details.beforePhotoHash,
        after_photo_hash: details.afterPhotoHash,
        impact_report_hash: optional_string(details.impactFormDataHash),
        latitude_e6: i256_to_i64(details.latitude)?,
        longitude_e6: i256_to_i64(details.longitude)?,
        created_at: u256_to_u64(details.timestamp),
        status: convert_submission_status(details.status)?,
        approver: optional_address(details.approver),
        processed_at: optional_timestamp(details.processedTimestamp),
        reward_paid: details.rewarded,
        fee_paid: details.feePaid,
        fee_refunded: details.feeRefunded,
        has_impact_form: details.hasImpactForm,
    }))
}
