//! Hypercert aggregation against scripted contracts and report sources

mod common;

use common::*;
use decleanup_client::hypercert::aggregate::{
    DEFAULT_LOCATION_TYPE, PLACEHOLDER_AREA_SQM, PLACEHOLDER_HOURS, PLACEHOLDER_WASTE_TYPE,
    PLACEHOLDER_WEIGHT_KG,
};
use decleanup_client::hypercert::{
    aggregate_cleanup_data, build_hypercert_metadata, prepare_hypercert, HypercertImages,
    ImpactReport,
};
use decleanup_client::ClientError;
use decleanup_contracts_trait::{Submission, SubmissionStatus};
use serde_json::json;

fn with_report(id: u64, hash: &str) -> Submission {
    let mut submission = submission(id, user(), SubmissionStatus::Approved);
    submission.has_impact_form = true;
    submission.impact_report_hash = Some(hash.to_string());
    submission
}

fn beach_report() -> ImpactReport {
    ImpactReport {
        location_type: Some("Beach".to_string()),
        weight: Some(2000.0),
        weight_unit: Some("g".to_string()),
        area: Some(1.0),
        area_unit: Some("hectare".to_string()),
        hours: Some(1.0),
        minutes: Some(30.0),
        waste_types: vec![" Plastic ".to_string(), "Glass".to_string()],
        contributors: vec!["alice".to_string()],
        environmental_challenges: Some("Tides bring debris back".to_string()),
        rights_assignment: Some("attribution".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_all_gateways_failing_uses_placeholders() {
    let contracts = MockContracts::new().with_submissions(vec![
        with_report(1, "QmUnreachable"),
        with_report(2, "ipfs://QmAlsoUnreachable"),
    ]);
    let reports = MockReports::new();

    let data = aggregate_cleanup_data(&contracts, &reports, &user(), 1, 10).await;

    assert_eq!(data.cleanup_ids, vec![1, 2]);
    assert_eq!(reports.calls(), 2);
    assert_eq!(data.total_weight_kg, 2.0 * PLACEHOLDER_WEIGHT_KG);
    assert_eq!(data.total_area_sqm, 2.0 * PLACEHOLDER_AREA_SQM);
    assert_eq!(data.total_hours, 2.0 * PLACEHOLDER_HOURS);
    assert_eq!(data.waste_types, vec![PLACEHOLDER_WASTE_TYPE]);
    assert!(data
        .locations
        .iter()
        .all(|l| l.location_type == DEFAULT_LOCATION_TYPE));
}

#[tokio::test]
async fn test_reports_are_normalized_and_merged() {
    let mut pounds = beach_report();
    pounds.weight = Some(10.0);
    pounds.weight_unit = Some("lbs".to_string());
    pounds.area = Some(100.0);
    pounds.area_unit = Some("sqft".to_string());
    pounds.hours = None;
    pounds.minutes = Some(20.0);
    pounds.waste_types = vec!["Glass".to_string(), "Metal".to_string()];
    pounds.contributors = vec!["bob".to_string(), "alice ".to_string()];
    pounds.location_type = Some("Park".to_string());
    pounds.environmental_challenges = None;

    let contracts = MockContracts::new().with_submissions(vec![
        with_report(1, "QmBeach"),
        with_report(2, "QmPark"),
        submission(3, user(), SubmissionStatus::Pending),
        submission(4, other_user(), SubmissionStatus::Approved),
    ]);
    let reports = MockReports::new()
        .with_report("QmBeach", beach_report())
        .with_report("QmPark", pounds);

    let data = aggregate_cleanup_data(&contracts, &reports, &user(), 1, 10).await;

    assert_eq!(data.cleanup_ids, vec![1, 2]);
    // 2 kg + 4.53592 kg
    assert_eq!(data.total_weight_kg, 6.54);
    // 10000 m² + 9.2903 m²
    assert_eq!(data.total_area_sqm, 10009.29);
    // 1.5 h + 0.333 h
    assert_eq!(data.total_hours, 1.83);
    assert_eq!(data.waste_types, vec!["Plastic", "Glass", "Metal"]);
    assert_eq!(data.contributors, vec!["alice", "bob"]);
    assert_eq!(data.challenges, vec!["Tides bring debris back"]);
    assert_eq!(data.rights_assignment, "attribution");
    assert_eq!(data.locations[0].location_type, "Beach");
    assert_eq!(data.locations[1].location_type, "Park");
    assert_eq!(data.locations[0].latitude, 52.52);
    assert_eq!(data.before_photos, vec!["QmBefore1", "QmBefore2"]);
    assert!(data.start_date < data.end_date);
}

#[tokio::test]
async fn test_submission_without_form_uses_placeholders_without_fetch() {
    let contracts = MockContracts::new().with_submissions(vec![submission(
        1,
        user(),
        SubmissionStatus::Approved,
    )]);
    let reports = MockReports::new();

    let data = aggregate_cleanup_data(&contracts, &reports, &user(), 1, 10).await;

    assert_eq!(reports.calls(), 0);
    assert_eq!(data.total_weight_kg, PLACEHOLDER_WEIGHT_KG);
    assert_eq!(data.rights_assignment, "Public Display");
}

#[tokio::test]
async fn test_unreadable_ids_are_skipped() {
    let contracts = MockContracts::new()
        .with_submissions(vec![
            submission(1, user(), SubmissionStatus::Approved),
            submission(2, user(), SubmissionStatus::Approved),
        ])
        .with_failing_id(1);

    let data = aggregate_cleanup_data(&contracts, &MockReports::new(), &user(), 1, 10).await;

    assert_eq!(data.cleanup_ids, vec![2]);
    assert_eq!(contracts.fetched(), (1..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_prepare_hypercert_builds_metadata() {
    let contracts = MockContracts::new().with_submissions(
        (11..=20)
            .map(|id| submission(id, user(), SubmissionStatus::Approved))
            .collect(),
    );

    let draft = prepare_hypercert(&contracts, &MockReports::new(), &user(), 2, None)
        .await
        .unwrap();
    let metadata = draft.metadata;

    assert_eq!(draft.data.cleanup_ids, (11..=20).collect::<Vec<_>>());
    assert_eq!(metadata.name, "DeCleanup Impact Certificate #2");
    assert_eq!(metadata.image, "ipfs://QmAfter20");
    assert_eq!(metadata.external_url, "https://decleanup.network/hypercert/2");
    assert!(metadata.description.starts_with(
        "Environmental cleanup impact certificate representing 10 verified cleanups by 0x"
    ));
    assert!(metadata
        .description
        .ends_with("Total waste removed: 100kg across 1000m² in Environmental Cleanup locations."));
    assert_eq!(metadata.property("rights"), Some(&json!(["Public Display"])));
    assert_eq!(metadata.property("impact_timeframe"), Some(&json!(["indefinite"])));
    assert_eq!(metadata.property("cleanup_count"), Some(&json!(10)));
    assert_eq!(
        metadata.property("contributors"),
        Some(&json!([user().to_string()]))
    );
}

#[tokio::test]
async fn test_prepare_hypercert_without_verified_cleanups_fails() {
    let contracts = MockContracts::new().with_submissions(vec![
        submission(1, user(), SubmissionStatus::Pending),
        submission(2, other_user(), SubmissionStatus::Approved),
    ]);

    let err = prepare_hypercert(&contracts, &MockReports::new(), &user(), 1, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NoVerifiedCleanups { from: 1, to: 10 }));

    let err = prepare_hypercert(&contracts, &MockReports::new(), &user(), 0, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidHypercertNumber(0)));
}

#[tokio::test]
async fn test_generated_images_take_precedence() {
    let contracts = MockContracts::new().with_submissions(vec![with_report(1, "QmBeach")]);
    let reports = MockReports::new().with_report("QmBeach", beach_report());
    let data = aggregate_cleanup_data(&contracts, &reports, &user(), 1, 10).await;
    let images = HypercertImages {
        logo: "QmLogo".to_string(),
        banner: "QmBanner".to_string(),
        image: "QmImage".to_string(),
    };

    let metadata = build_hypercert_metadata(&user(), &data, 1, Some(&images));

    assert_eq!(metadata.image, "ipfs://QmImage");
    assert_eq!(metadata.logo.as_deref(), Some("ipfs://QmLogo"));
    assert_eq!(metadata.banner.as_deref(), Some("ipfs://QmBanner"));
    assert_eq!(
        metadata.property("rights"),
        Some(&json!(["Public Display", "Attribution Required"]))
    );
    assert_eq!(
        metadata.property("contributors"),
        Some(&json!([user().to_string(), "alice"]))
    );
    assert_eq!(
        metadata.property("work_scope"),
        Some(&json!([
            "Environmental cleanup in Beach locations",
            "Waste types: Plastic, Glass",
            "1 verified cleanup events"
        ]))
    );
}
