//! Unit normalization for impact report measurements

use tracing::warn;

/// Convert a weight to kilograms; unknown units are taken as kilograms
pub fn weight_to_kg(weight: f64, unit: &str) -> f64 {
    match unit.trim().to_lowercase().as_str() {
        "" | "kg" | "kilogram" | "kilograms" => weight,
        "g" | "gram" | "grams" => weight / 1000.0,
        "lb" | "lbs" | "pound" | "pounds" => weight * 0.453592,
        "oz" | "ounce" | "ounces" => weight * 0.0283495,
        other => {
            warn!("Unknown weight unit: {}, assuming kg", other);
            weight
        }
    }
}

/// Convert an area to square meters; unknown units are taken as square meters
pub fn area_to_sqm(area: f64, unit: &str) -> f64 {
    match unit.trim().to_lowercase().as_str() {
        "" | "sqm" | "m²" | "square meter" | "square meters" => area,
        "sqft" | "ft²" | "square foot" | "square feet" => area * 0.092903,
        "acre" | "acres" => area * 4046.86,
        "hectare" | "hectares" => area * 10000.0,
        other => {
            warn!("Unknown area unit: {}, assuming sqm", other);
            area
        }
    }
}

pub fn time_to_hours(hours: f64, minutes: f64) -> f64 {
    hours + minutes / 60.0
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
