//! User location models.
//!
//! District lookup is a coarse, illustrative heuristic over a fixed table of
//! Lima district centres. It is not reverse geocoding.

use serde::{Deserialize, Serialize};

use super::Coordinates;
use crate::compare::distance_km;

/// A user-supplied point with optional descriptive labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationData {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl LocationData {
    /// Create a location from bare coordinates.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            district: None,
            city: None,
            address: None,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Approximate district centres (lat, lng).
const LIMA_DISTRICTS: &[(&str, f64, f64)] = &[
    ("San Isidro", -12.0954, -77.0397),
    ("Miraflores", -12.1215, -77.0298),
    ("San Borja", -12.0985, -76.9960),
    ("Surco", -12.1342, -77.0012),
    ("La Molina", -12.0799, -76.9419),
    ("Lima Centro", -12.0464, -77.0306),
    ("Breña", -12.0598, -77.0522),
    ("Jesús María", -12.0730, -77.0420),
    ("Lince", -12.0823, -77.0375),
    ("Pueblo Libre", -12.0745, -77.0649),
    ("San Miguel", -12.0761, -77.0872),
    ("Magdalena", -12.0908, -77.0745),
    ("Barranco", -12.1465, -77.0204),
    ("Chorrillos", -12.1681, -77.0157),
    ("San Juan de Miraflores", -12.1565, -76.9736),
];

/// Names of the known districts, in table order.
pub fn known_districts() -> impl Iterator<Item = &'static str> {
    LIMA_DISTRICTS.iter().map(|(name, _, _)| *name)
}

/// Location at the centre of a known district (case-insensitive name).
pub fn district_location(name: &str) -> Option<LocationData> {
    let wanted = name.trim().to_lowercase();
    LIMA_DISTRICTS
        .iter()
        .find(|(district, _, _)| district.to_lowercase() == wanted)
        .map(|(district, lat, lng)| LocationData {
            lat: *lat,
            lng: *lng,
            district: Some((*district).to_string()),
            city: Some("Lima".to_string()),
            address: None,
        })
}

/// Closest known district centre. Ties keep the earlier table entry.
pub fn nearest_district(lat: f64, lng: f64) -> &'static str {
    let mut best = LIMA_DISTRICTS[0];
    let mut best_distance = distance_km(lat, lng, best.1, best.2);
    for entry in &LIMA_DISTRICTS[1..] {
        let d = distance_km(lat, lng, entry.1, entry.2);
        if d < best_distance {
            best = *entry;
            best_distance = d;
        }
    }
    best.0
}
