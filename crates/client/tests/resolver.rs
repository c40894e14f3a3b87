//! Status resolver against scripted contracts

mod common;

use common::*;
use decleanup_client::cache::{id_key, location_key};
use decleanup_client::{KeyValueStore, PendingLocation, Resolution};
use decleanup_contracts_trait::{CleanupError, SubmissionStatus};
use std::sync::Arc;

fn found(resolution: Resolution) -> decleanup_client::VerificationStatus {
    match resolution {
        Resolution::Found(status) => status,
        Resolution::NotFound => panic!("expected a submission"),
    }
}

#[tokio::test]
async fn test_valid_cached_pointer_skips_scan() {
    let contracts = Arc::new(MockContracts::new().with_submissions(vec![
        submission(1, other_user(), SubmissionStatus::Pending),
        submission(2, user(), SubmissionStatus::Approved),
        submission(3, other_user(), SubmissionStatus::Pending),
    ]));
    let (resolver, store) = build_resolver(contracts.clone());
    store.set(&id_key(&user()), "2".to_string()).await.unwrap();

    let status = resolver.user_status(&user().to_string()).await.unwrap();

    assert!(status.can_claim);
    assert_eq!(status.cleanup_id, Some(2));
    assert!(status.verified);
    assert_eq!(contracts.fetched(), vec![2]);
    assert_eq!(contracts.count_calls(), 0);
}

#[tokio::test]
async fn test_foreign_pointer_is_invalidated_and_scanned() {
    let contracts = Arc::new(MockContracts::new().with_submissions(vec![
        submission(1, user(), SubmissionStatus::Pending),
        submission(2, other_user(), SubmissionStatus::Pending),
        submission(3, other_user(), SubmissionStatus::Pending),
    ]));
    let (resolver, store) = build_resolver(contracts.clone());
    store.set(&id_key(&user()), "3".to_string()).await.unwrap();
    store
        .set(&location_key(&user()), r#"{"latitude":1.0,"longitude":2.0}"#.to_string())
        .await
        .unwrap();

    let status = found(resolver.resolve_latest_for(&user()).await.unwrap());

    assert_eq!(status.cleanup_id, 1);
    assert!(status.has_pending_cleanup());
    assert_eq!(contracts.count_calls(), 1);
    assert_eq!(contracts.fetched(), vec![3, 3, 2, 1]);
    assert_eq!(store.get(&id_key(&user())).await.unwrap().as_deref(), Some("1"));
    assert_eq!(store.get(&location_key(&user())).await.unwrap(), None);
}

#[tokio::test]
async fn test_missing_cached_submission_is_invalidated() {
    let contracts = Arc::new(MockContracts::new().with_submissions(vec![submission(
        1,
        user(),
        SubmissionStatus::Pending,
    )]));
    let (resolver, store) = build_resolver(contracts.clone());
    store.set(&id_key(&user()), "40".to_string()).await.unwrap();

    let status = found(resolver.resolve_latest_for(&user()).await.unwrap());

    assert_eq!(status.cleanup_id, 1);
    assert_eq!(store.get(&id_key(&user())).await.unwrap().as_deref(), Some("1"));
}

#[tokio::test]
async fn test_rejected_cached_submission_returns_without_scan() {
    let contracts = Arc::new(MockContracts::new().with_submissions(vec![
        submission(1, user(), SubmissionStatus::Approved),
        submission(2, user(), SubmissionStatus::Rejected),
    ]));
    let (resolver, store) = build_resolver(contracts.clone());
    store.set(&id_key(&user()), "2".to_string()).await.unwrap();

    let status = resolver.user_status(&user().to_string()).await.unwrap();

    assert!(status.rejected);
    assert!(!status.can_claim);
    assert_eq!(contracts.count_calls(), 0);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_rejected_scan_match_is_not_cached() {
    let contracts = Arc::new(MockContracts::new().with_submissions(vec![
        submission(1, user(), SubmissionStatus::Approved),
        submission(2, user(), SubmissionStatus::Rejected),
        submission(3, other_user(), SubmissionStatus::Pending),
    ]));
    let (resolver, store) = build_resolver(contracts.clone());

    let status = resolver.user_status(&user().to_string()).await.unwrap();

    assert!(status.rejected);
    assert!(!status.can_claim);
    assert_eq!(status.cleanup_id, Some(2));
    assert!(status.reason.unwrap().contains("was rejected"));
    assert!(store.is_empty().await);

    // The older approved submission is not resurrected
    contracts.reset_calls();
    let again = resolver.user_status(&user().to_string()).await.unwrap();
    assert!(again.rejected);
    assert_eq!(contracts.count_calls(), 1);
}

#[tokio::test]
async fn test_scan_is_bounded_by_window() {
    let submissions = (1..=120)
        .map(|id| submission(id, other_user(), SubmissionStatus::Pending))
        .collect();
    let contracts = Arc::new(MockContracts::new().with_submissions(submissions));
    let (resolver, _store) = build_resolver(contracts.clone());

    let resolution = resolver.resolve_latest_for(&user()).await.unwrap();

    assert_eq!(resolution, Resolution::NotFound);
    let fetched = contracts.fetched();
    assert_eq!(fetched.len(), 50);
    assert_eq!(fetched.first(), Some(&120));
    assert_eq!(fetched.last(), Some(&71));
}

#[tokio::test]
async fn test_small_counter_scans_every_id() {
    let contracts = Arc::new(MockContracts::new().with_submissions(vec![
        submission(1, other_user(), SubmissionStatus::Pending),
        submission(2, other_user(), SubmissionStatus::Pending),
    ]));
    let (resolver, _store) = build_resolver(contracts.clone());

    assert_eq!(
        resolver.resolve_latest_for(&user()).await.unwrap(),
        Resolution::NotFound
    );
    assert_eq!(contracts.fetched(), vec![2, 1]);
}

#[tokio::test]
async fn test_counter_boundary_excludes_counter_id() {
    // counter=5: ids 4..=1 are scanned, id 5 is not
    let contracts = Arc::new(
        MockContracts::new()
            .with_submissions(vec![
                submission(1, other_user(), SubmissionStatus::Pending),
                submission(2, other_user(), SubmissionStatus::Pending),
                submission(3, other_user(), SubmissionStatus::Pending),
                submission(4, other_user(), SubmissionStatus::Pending),
                submission(5, user(), SubmissionStatus::Approved),
            ])
            .with_count(Some(5)),
    );
    let (resolver, store) = build_resolver(contracts.clone());

    let resolution = resolver.resolve_latest_for(&user()).await.unwrap();

    assert_eq!(resolution, Resolution::NotFound);
    assert_eq!(contracts.fetched(), vec![4, 3, 2, 1]);
    assert!(store.is_empty().await);

    // Once the counter moves past it the submission is found
    let contracts = Arc::new(
        MockContracts::new()
            .with_submissions(vec![
                submission(4, other_user(), SubmissionStatus::Pending),
                submission(5, user(), SubmissionStatus::Approved),
            ])
            .with_count(Some(6)),
    );
    let (resolver, _store) = build_resolver(contracts.clone());
    let status = found(resolver.resolve_latest_for(&user()).await.unwrap());
    assert_eq!(status.cleanup_id, 5);
    assert!(status.can_claim());
}

#[tokio::test]
async fn test_resolution_is_idempotent() {
    let contracts = Arc::new(
        MockContracts::new()
            .with_submissions(vec![
                submission(1, user(), SubmissionStatus::Approved),
                submission(2, other_user(), SubmissionStatus::Pending),
            ])
            .with_level(user(), 1),
    );
    let (resolver, store) = build_resolver(contracts.clone());

    let first = resolver.user_status(&user().to_string()).await.unwrap();
    let keys_after_first = store.keys().await;
    let second = resolver.user_status(&user().to_string()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(store.keys().await, keys_after_first);
    assert_eq!(contracts.count_calls(), 1);
    assert!(!first.can_claim);
    assert!(first.impact_product_claimed);
}

#[tokio::test]
async fn test_transient_pointer_failure_keeps_cache() {
    let contracts = Arc::new(
        MockContracts::new()
            .with_submissions(vec![
                submission(1, user(), SubmissionStatus::Pending),
                submission(2, other_user(), SubmissionStatus::Pending),
            ])
            .with_failing_id(1),
    );
    let (resolver, store) = build_resolver(contracts.clone());
    store.set(&id_key(&user()), "1".to_string()).await.unwrap();

    let resolution = resolver.resolve_latest_for(&user()).await.unwrap();

    // Scan skips the unreadable id and finds nothing else
    assert_eq!(resolution, Resolution::NotFound);
    assert_eq!(contracts.fetched(), vec![1, 2, 1]);
    assert_eq!(store.get(&id_key(&user())).await.unwrap().as_deref(), Some("1"));
}

#[tokio::test]
async fn test_rejected_scan_match_clears_kept_pointer() {
    let contracts = Arc::new(
        MockContracts::new()
            .with_submissions(vec![
                submission(1, user(), SubmissionStatus::Approved),
                submission(2, user(), SubmissionStatus::Rejected),
            ])
            .with_failing_id(1),
    );
    let (resolver, store) = build_resolver(contracts.clone());
    store.set(&id_key(&user()), "1".to_string()).await.unwrap();
    store
        .set(&location_key(&user()), r#"{"latitude":1.0,"longitude":2.0}"#.to_string())
        .await
        .unwrap();

    let status = found(resolver.resolve_latest_for(&user()).await.unwrap());
    assert_eq!(status.cleanup_id, 2);
    assert!(status.rejected);
    assert_eq!(store.get(&id_key(&user())).await.unwrap(), None);
    assert_eq!(store.get(&location_key(&user())).await.unwrap(), None);

    // Once the older id is readable again it must not resurface
    contracts.recover_id(1);
    contracts.reset_calls();
    let status = found(resolver.resolve_latest_for(&user()).await.unwrap());
    assert_eq!(status.cleanup_id, 2);
    assert!(status.rejected);
    assert_eq!(contracts.fetched(), vec![2]);
}

#[tokio::test]
async fn test_created_submission_with_unknown_id_is_not_cached() {
    let contracts = Arc::new(MockContracts::new().with_submissions(vec![
        submission(1, user(), SubmissionStatus::Approved),
        submission(2, user(), SubmissionStatus::Pending),
    ]));
    let (resolver, store) = build_resolver(contracts.clone());
    store.set(&id_key(&user()), "1".to_string()).await.unwrap();

    resolver
        .remember_submission(&user(), None, Some(PendingLocation { latitude: 1.0, longitude: 2.0 }))
        .await
        .unwrap();
    assert!(store.is_empty().await);

    let status = found(resolver.resolve_latest_for(&user()).await.unwrap());
    assert_eq!(status.cleanup_id, 2);

    resolver.remember_submission(&user(), Some(3), None).await.unwrap();
    assert_eq!(store.get(&id_key(&user())).await.unwrap().as_deref(), Some("3"));
}

#[tokio::test]
async fn test_per_id_failures_are_skipped() {
    let contracts = Arc::new(
        MockContracts::new()
            .with_submissions(vec![
                submission(1, user(), SubmissionStatus::Pending),
                submission(2, other_user(), SubmissionStatus::Pending),
                submission(3, other_user(), SubmissionStatus::Pending),
            ])
            .with_failing_id(3),
    );
    let (resolver, _store) = build_resolver(contracts.clone());

    let status = found(resolver.resolve_latest_for(&user()).await.unwrap());
    assert_eq!(status.cleanup_id, 1);
}

#[tokio::test]
async fn test_counter_failure_propagates() {
    let contracts = Arc::new(MockContracts::new().with_count(None));
    let (resolver, _store) = build_resolver(contracts.clone());

    let err = resolver.resolve_latest_for(&user()).await.unwrap_err();
    assert!(err.is_retriable());
}

#[tokio::test]
async fn test_malformed_address_fails_before_network() {
    let contracts = Arc::new(MockContracts::new());
    let (resolver, _store) = build_resolver(contracts.clone());

    let err = resolver.resolve_latest("0x1234").await.unwrap_err();
    assert!(matches!(err, CleanupError::InvalidParameter { .. }));
    assert_eq!(contracts.count_calls(), 0);
    assert!(contracts.fetched().is_empty());
}

#[tokio::test]
async fn test_legacy_keys_cleared_on_miss() {
    let contracts = Arc::new(MockContracts::new().with_submissions(vec![submission(
        1,
        user(),
        SubmissionStatus::Pending,
    )]));
    let (resolver, store) = build_resolver(contracts.clone());
    store.set("pending_cleanup_id", "9".to_string()).await.unwrap();
    store.set("pending_cleanup_location", "{}".to_string()).await.unwrap();

    resolver.resolve_latest_for(&user()).await.unwrap();

    assert_eq!(store.keys().await, vec![id_key(&user())]);
}

#[tokio::test]
async fn test_base_reward_and_impact_product_are_independent() {
    let mut paid = submission(1, user(), SubmissionStatus::Approved);
    paid.reward_paid = true;
    let contracts = Arc::new(MockContracts::new().with_submissions(vec![paid]));
    let (resolver, _store) = build_resolver(contracts.clone());

    let status = resolver.user_status(&user().to_string()).await.unwrap();
    assert!(status.base_reward_claimed);
    assert!(!status.impact_product_claimed);
    assert!(status.can_claim);

    contracts.set_level(user(), 1);
    let status = resolver.user_status(&user().to_string()).await.unwrap();
    assert!(status.impact_product_claimed);
    assert!(!status.can_claim);
    assert!(status.reason.unwrap().contains("already been claimed"));
}

#[tokio::test]
async fn test_level_read_failure_falls_back_to_reward_flag() {
    let mut paid = submission(1, user(), SubmissionStatus::Approved);
    paid.reward_paid = true;
    let contracts = Arc::new(
        MockContracts::new()
            .with_submissions(vec![paid])
            .with_level_error(),
    );
    let (resolver, _store) = build_resolver(contracts.clone());

    let status = found(resolver.resolve_latest_for(&user()).await.unwrap());
    assert!(status.impact_product_claimed);
    assert!(!status.can_claim());
}

#[tokio::test]
async fn test_status_transitions_are_observed() {
    let contracts = Arc::new(MockContracts::new().with_submissions(vec![submission(
        1,
        user(),
        SubmissionStatus::Pending,
    )]));
    let (resolver, _store) = build_resolver(contracts.clone());

    let pending = resolver.user_status(&user().to_string()).await.unwrap();
    assert!(pending.has_pending_cleanup);
    assert!(pending.reason.unwrap().contains("still under review"));

    contracts.set_status(1, SubmissionStatus::Approved);
    let approved = resolver.user_status(&user().to_string()).await.unwrap();
    assert!(!approved.has_pending_cleanup);
    assert!(approved.can_claim);
}

#[tokio::test]
async fn test_not_found_status() {
    let contracts = Arc::new(MockContracts::new().with_count(Some(1)));
    let (resolver, _store) = build_resolver(contracts.clone());

    let status = resolver.user_status(&user().to_string()).await.unwrap();
    assert!(!status.can_claim);
    assert_eq!(status.cleanup_id, None);
    assert!(status.reason.unwrap().contains("No cleanup submissions found"));
}

#[tokio::test]
async fn test_can_claim_level_for_specific_submission() {
    let contracts = Arc::new(
        MockContracts::new()
            .with_submissions(vec![
                submission(1, user(), SubmissionStatus::Approved),
                submission(2, other_user(), SubmissionStatus::Approved),
                submission(3, user(), SubmissionStatus::Pending),
            ])
            .with_level(user(), 1),
    );
    let (resolver, _store) = build_resolver(contracts.clone());
    let address = user().to_string();

    let foreign = resolver.can_claim_level(&address, Some(2)).await.unwrap();
    assert!(!foreign.can_claim);
    assert!(foreign.reason.unwrap().contains("different address"));

    let claimed = resolver.can_claim_level(&address, Some(1)).await.unwrap();
    assert_eq!(
        claimed.reason.as_deref(),
        Some("This cleanup has already been claimed.")
    );

    let latest = resolver.can_claim_level(&address, None).await.unwrap();
    assert!(latest.reason.unwrap().contains("still under review"));

    let missing = resolver.can_claim_level(&address, Some(99)).await.unwrap_err();
    assert!(missing.is_does_not_exist());
}
