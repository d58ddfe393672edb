//! Pharmacy and branch models.

use serde::{Deserialize, Serialize};

/// A pharmacy chain or independent pharmacy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pharmacy {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside the ±90 / ±180 degree ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A single physical pharmacy location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyBranch {
    /// Unique identifier
    pub id: String,
    /// Owning pharmacy
    pub pharmacy_id: String,
    /// Owning pharmacy name, denormalized for display
    pub pharmacy_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    /// Location; `None` keeps the branch out of any distance ranking
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    pub is_open_24_hours: bool,
    #[serde(default)]
    pub rating: f64,
}

impl PharmacyBranch {
    /// Create a new branch with required fields.
    pub fn new(id: String, pharmacy_id: String, pharmacy_name: String) -> Self {
        Self {
            id,
            pharmacy_id,
            pharmacy_name,
            address: String::new(),
            district: String::new(),
            city: String::new(),
            region: String::new(),
            coordinates: None,
            phone: String::new(),
            hours: String::new(),
            is_open_24_hours: false,
            rating: 0.0,
        }
    }

    /// Builder-style helper to set coordinates.
    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Some(Coordinates::new(lat, lng));
        self
    }

    /// Coordinates usable for distance math, if any.
    pub fn valid_coordinates(&self) -> Option<Coordinates> {
        self.coordinates.filter(Coordinates::is_valid)
    }
}
