//! Hypercert metadata document

use super::aggregate::CleanupData;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const EXTERNAL_URL_BASE: &str = "https://decleanup.network/hypercert";

/// IPFS hashes of generated certificate artwork
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HypercertImages {
    pub logo: String,
    pub banner: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HypercertProperty {
    pub trait_type: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HypercertMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    pub external_url: String,
    pub properties: Vec<HypercertProperty>,
}

impl HypercertMetadata {
    pub fn property(&self, trait_type: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|p| p.trait_type == trait_type)
            .map(|p| &p.value)
    }
}

fn ipfs_uri(hash: &str) -> String {
    format!("ipfs://{}", hash)
}

fn property(trait_type: &str, value: Value) -> HypercertProperty {
    HypercertProperty {
        trait_type: trait_type.to_string(),
        value,
    }
}

/// Hypercert rights for a DeCleanup rights-assignment key
pub fn map_rights_assignment(rights: &str) -> Vec<&'static str> {
    match rights {
        "attribution" => vec!["Public Display", "Attribution Required"],
        "non-commercial" => vec!["Public Display", "Non-Commercial Use Only"],
        "no-derivatives" => vec!["Public Display", "No Derivatives"],
        "share-alike" => vec!["Public Display", "Share Alike"],
        "all-rights-reserved" => vec!["All Rights Reserved"],
        _ => vec!["Public Display"],
    }
}

/// Build the metadata for hypercert `number` from aggregated data
pub fn build_hypercert_metadata(
    user: &Address,
    data: &CleanupData,
    number: u64,
    images: Option<&HypercertImages>,
) -> HypercertMetadata {
    let user = user.to_string();

    let mut location_types: Vec<&str> = Vec::new();
    for location in &data.locations {
        if !location_types.contains(&location.location_type.as_str()) {
            location_types.push(&location.location_type);
        }
    }
    let locations = location_types.join(", ");
    let cleanup_count = data.cleanup_ids.len();

    let image = match images {
        Some(images) => ipfs_uri(&images.image),
        None => data.after_photos.last().map(|h| ipfs_uri(h)).unwrap_or_default(),
    };

    let mut contributors = vec![user.clone()];
    contributors.extend(data.contributors.iter().cloned());

    HypercertMetadata {
        name: format!("DeCleanup Impact Certificate #{}", number),
        description: format!(
            "Environmental cleanup impact certificate representing {} verified cleanups by {}. \
             Total waste removed: {}kg across {}m² in {} locations.",
            cleanup_count, user, data.total_weight_kg, data.total_area_sqm, locations
        ),
        image,
        logo: images.map(|i| ipfs_uri(&i.logo)),
        banner: images.map(|i| ipfs_uri(&i.banner)),
        external_url: format!("{}/{}", EXTERNAL_URL_BASE, number),
        properties: vec![
            property(
                "work_scope",
                json!([
                    format!("Environmental cleanup in {} locations", locations),
                    format!("Waste types: {}", data.waste_types.join(", ")),
                    format!("{} verified cleanup events", cleanup_count),
                ]),
            ),
            property(
                "work_timeframe",
                json!([data.start_date.timestamp(), data.end_date.timestamp()]),
            ),
            property(
                "impact_scope",
                json!([
                    "Environmental restoration",
                    "Waste removal and proper disposal",
                    "Community environmental awareness",
                    format!("{}kg waste removed", data.total_weight_kg),
                    format!("{}m² area cleaned", data.total_area_sqm),
                ]),
            ),
            property("impact_timeframe", json!(["indefinite"])),
            property("contributors", json!(contributors)),
            property(
                "rights",
                json!(map_rights_assignment(&data.rights_assignment)),
            ),
            property("total_weight_kg", json!(data.total_weight_kg)),
            property("total_area_sqm", json!(data.total_area_sqm)),
            property("total_hours", json!(data.total_hours)),
            property("cleanup_count", json!(cleanup_count)),
            property("location_types", json!(location_types)),
            property("waste_types", json!(data.waste_types)),
            property(
                "before_photos",
                json!(data.before_photos.iter().map(|h| ipfs_uri(h)).collect::<Vec<_>>()),
            ),
            property(
                "after_photos",
                json!(data.after_photos.iter().map(|h| ipfs_uri(h)).collect::<Vec<_>>()),
            ),
            property("environmental_challenges", json!(data.challenges)),
            property("prevention_ideas", json!(data.prevention_ideas)),
        ],
    }
}
