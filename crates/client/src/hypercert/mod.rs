//! Hypercert aggregation
//!
//! Every ten verified cleanups a user can mint a hypercert. This module
//! computes the milestone, aggregates the cleanups in the milestone's id range
//! (reading impact reports from IPFS), and builds the metadata document.

pub mod aggregate;
pub mod ipfs;
pub mod metadata;
pub mod units;

pub use aggregate::{aggregate_cleanup_data, CleanupData, CleanupLocation};
pub use ipfs::{ImpactReport, IpfsGateways, ReportSource};
pub use metadata::{build_hypercert_metadata, HypercertImages, HypercertMetadata};

use crate::error::{ClientError, Result};
use alloy_primitives::Address;
use decleanup_contracts_trait::CleanupContracts;
use serde::Serialize;
use std::ops::RangeInclusive;
use tracing::info;

/// Cleanups per hypercert
pub const CLEANUPS_PER_HYPERCERT: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HypercertMilestone {
    pub is_eligible: bool,
    pub hypercert_number: u64,
    pub next_milestone: u64,
}

/// Milestone status for a count of verified cleanups
pub fn check_hypercert_eligibility(cleanup_count: u64) -> HypercertMilestone {
    HypercertMilestone {
        is_eligible: cleanup_count > 0 && cleanup_count % CLEANUPS_PER_HYPERCERT == 0,
        hypercert_number: cleanup_count / CLEANUPS_PER_HYPERCERT,
        next_milestone: cleanup_count.div_ceil(CLEANUPS_PER_HYPERCERT) * CLEANUPS_PER_HYPERCERT,
    }
}

/// Cleanup ids covered by hypercert `number` (1-based)
pub fn hypercert_range(number: u64) -> Option<RangeInclusive<u64>> {
    if number == 0 {
        return None;
    }
    let to = number.checked_mul(CLEANUPS_PER_HYPERCERT)?;
    Some(to - (CLEANUPS_PER_HYPERCERT - 1)..=to)
}

/// Aggregated data and metadata ready for upload and minting
#[derive(Debug, Clone, Serialize)]
pub struct HypercertDraft {
    pub hypercert_number: u64,
    pub data: CleanupData,
    pub metadata: HypercertMetadata,
}

/// Aggregate the cleanups of hypercert `number` and build its metadata
///
/// Fails when none of the cleanups in range are the user's verified ones.
pub async fn prepare_hypercert(
    contracts: &dyn CleanupContracts,
    reports: &dyn ReportSource,
    user: &Address,
    number: u64,
    images: Option<&HypercertImages>,
) -> Result<HypercertDraft> {
    let range = hypercert_range(number).ok_or(ClientError::InvalidHypercertNumber(number))?;
    let (from, to) = (*range.start(), *range.end());

    let data = aggregate_cleanup_data(contracts, reports, user, from, to).await;
    if data.cleanup_ids.is_empty() {
        return Err(ClientError::NoVerifiedCleanups { from, to });
    }

    let metadata = build_hypercert_metadata(user, &data, number, images);
    info!("Prepared hypercert #{} for {}", number, user);

    Ok(HypercertDraft {
        hypercert_number: number,
        data,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milestones() {
        assert_eq!(
            check_hypercert_eligibility(0),
            HypercertMilestone {
                is_eligible: false,
                hypercert_number: 0,
                next_milestone: 0,
            }
        );
        assert_eq!(
            check_hypercert_eligibility(7),
            HypercertMilestone {
                is_eligible: false,
                hypercert_number: 0,
                next_milestone: 10,
            }
        );
        assert_eq!(
            check_hypercert_eligibility(20),
            HypercertMilestone {
                is_eligible: true,
                hypercert_number: 2,
                next_milestone: 20,
            }
        );
        assert_eq!(check_hypercert_eligibility(21).next_milestone, 30);
    }

    #[test]
    fn test_hypercert_range() {
        assert_eq!(hypercert_range(1), Some(1..=10));
        assert_eq!(hypercert_range(3), Some(21..=30));
        assert_eq!(hypercert_range(0), None);
        assert_eq!(hypercert_range(u64::MAX), None);
    }
}
