//! Aggregation of verified cleanups into hypercert totals

use super::ipfs::{ImpactReport, ReportSource};
use super::units::{area_to_sqm, round2, time_to_hours, weight_to_kg};
use alloy_primitives::Address;
use chrono::{DateTime, TimeZone, Utc};
use decleanup_contracts_trait::{CleanupContracts, Submission};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Per-cleanup values used when no impact report can be read
pub const PLACEHOLDER_WEIGHT_KG: f64 = 10.0;
pub const PLACEHOLDER_AREA_SQM: f64 = 100.0;
pub const PLACEHOLDER_HOURS: f64 = 2.0;
pub const PLACEHOLDER_WASTE_TYPE: &str = "Mixed Waste";

pub const DEFAULT_LOCATION_TYPE: &str = "Environmental Cleanup";
pub const DEFAULT_RIGHTS_ASSIGNMENT: &str = "Public Display";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanupLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub location_type: String,
}

/// Totals and evidence for one hypercert
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanupData {
    pub cleanup_ids: Vec<u64>,
    pub locations: Vec<CleanupLocation>,
    pub total_weight_kg: f64,
    pub total_area_sqm: f64,
    pub total_hours: f64,
    /// Distinct, in first-seen order
    pub waste_types: Vec<String>,
    /// Distinct, in first-seen order
    pub contributors: Vec<String>,
    pub before_photos: Vec<String>,
    pub after_photos: Vec<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub rights_assignment: String,
    pub challenges: Vec<String>,
    pub prevention_ideas: Vec<String>,
}

#[derive(Default)]
struct Accumulator {
    cleanup_ids: Vec<u64>,
    locations: Vec<CleanupLocation>,
    weight: f64,
    area: f64,
    hours: f64,
    waste_types: Vec<String>,
    contributors: Vec<String>,
    before_photos: Vec<String>,
    after_photos: Vec<String>,
    earliest: Option<DateTime<Utc>>,
    latest: Option<DateTime<Utc>>,
    rights_assignment: Option<String>,
    challenges: Vec<String>,
    prevention_ideas: Vec<String>,
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Accumulator {
    fn add_submission(&mut self, submission: &Submission) {
        self.cleanup_ids.push(submission.id);
        if !submission.before_photo_hash.is_empty() {
            self.before_photos.push(submission.before_photo_hash.clone());
        }
        if !submission.after_photo_hash.is_empty() {
            self.after_photos.push(submission.after_photo_hash.clone());
        }

        if let Some(date) = Utc.timestamp_opt(submission.created_at as i64, 0).single() {
            self.earliest = Some(self.earliest.map_or(date, |d| d.min(date)));
            self.latest = Some(self.latest.map_or(date, |d| d.max(date)));
        }
    }

    fn add_placeholder(&mut self) {
        self.weight += PLACEHOLDER_WEIGHT_KG;
        self.area += PLACEHOLDER_AREA_SQM;
        self.hours += PLACEHOLDER_HOURS;
        push_unique(&mut self.waste_types, PLACEHOLDER_WASTE_TYPE);
    }

    /// Fold a report in and return its location type, if it names one
    fn add_report(&mut self, id: u64, report: &ImpactReport) -> Option<String> {
        if let (Some(weight), Some(unit)) = (report.weight, non_empty(&report.weight_unit)) {
            let kg = weight_to_kg(weight, unit);
            debug!("Cleanup {}: weight {} {} ({:.2} kg)", id, weight, unit, kg);
            self.weight += kg;
        }

        if let (Some(area), Some(unit)) = (report.area, non_empty(&report.area_unit)) {
            let sqm = area_to_sqm(area, unit);
            debug!("Cleanup {}: area {} {} ({:.2} m²)", id, area, unit, sqm);
            self.area += sqm;
        }

        if report.hours.is_some() || report.minutes.is_some() {
            let hours = time_to_hours(report.hours.unwrap_or(0.0), report.minutes.unwrap_or(0.0));
            debug!("Cleanup {}: time {:.2} h", id, hours);
            self.hours += hours;
        }

        for waste_type in &report.waste_types {
            push_unique(&mut self.waste_types, waste_type);
        }
        for contributor in &report.contributors {
            push_unique(&mut self.contributors, contributor);
        }

        if let Some(challenge) = non_empty(&report.environmental_challenges) {
            self.challenges.push(challenge.to_string());
        }
        if let Some(idea) = non_empty(&report.prevention_ideas) {
            self.prevention_ideas.push(idea.to_string());
        }
        if let Some(rights) = non_empty(&report.rights_assignment) {
            self.rights_assignment = Some(rights.to_string());
        }

        non_empty(&report.location_type).map(str::to_string)
    }

    fn finish(self) -> CleanupData {
        let now = Utc::now();
        CleanupData {
            cleanup_ids: self.cleanup_ids,
            locations: self.locations,
            total_weight_kg: round2(self.weight),
            total_area_sqm: round2(self.area),
            total_hours: round2(self.hours),
            waste_types: self.waste_types,
            contributors: self.contributors,
            before_photos: self.before_photos,
            after_photos: self.after_photos,
            start_date: self.earliest.unwrap_or(now),
            end_date: self.latest.unwrap_or(now),
            rights_assignment: self
                .rights_assignment
                .unwrap_or_else(|| DEFAULT_RIGHTS_ASSIGNMENT.to_string()),
            challenges: self.challenges,
            prevention_ideas: self.prevention_ideas,
        }
    }
}

/// Aggregate the user's approved cleanups with ids in `from..=to`
///
/// Submissions that are not approved or belong to someone else are skipped,
/// as are ids that cannot be read. Missing or unreadable impact reports fall
/// back to the placeholder values.
pub async fn aggregate_cleanup_data(
    contracts: &dyn CleanupContracts,
    reports: &dyn ReportSource,
    user: &Address,
    from: u64,
    to: u64,
) -> CleanupData {
    info!("Aggregating cleanup data from {} to {} for {}", from, to, user);
    let mut acc = Accumulator::default();

    for id in from..=to {
        let submission = match contracts.get_submission(id).await {
            Ok(submission) => submission,
            Err(e) => {
                warn!("Error fetching cleanup {}: {}", id, e);
                continue;
            }
        };

        if !submission.is_approved() || !submission.belongs_to(user) {
            debug!("Skipping cleanup {}: not verified or different user", id);
            continue;
        }

        acc.add_submission(&submission);

        let report_hash = submission
            .impact_report_hash
            .as_deref()
            .filter(|hash| submission.has_impact_form && !hash.trim().is_empty());

        let location_type = match report_hash {
            Some(hash) => match reports.fetch_report(hash).await {
                Ok(report) => acc.add_report(id, &report),
                Err(e) => {
                    warn!(
                        "Could not fetch impact report for cleanup {}, using placeholder values: {}",
                        id, e
                    );
                    acc.add_placeholder();
                    None
                }
            },
            None => {
                debug!("No impact report for cleanup {}, using placeholder values", id);
                acc.add_placeholder();
                None
            }
        };

        acc.locations.push(CleanupLocation {
            latitude: submission.latitude(),
            longitude: submission.longitude(),
            location_type: location_type.unwrap_or_else(|| DEFAULT_LOCATION_TYPE.to_string()),
        });
    }

    let data = acc.finish();
    info!(
        "Aggregated {} cleanups: {:.2} kg, {:.2} m², {:.2} h, {} before / {} after photos",
        data.cleanup_ids.len(),
        data.total_weight_kg,
        data.total_area_sqm,
        data.total_hours,
        data.before_photos.len(),
        data.after_photos.len()
    );
    data
}
