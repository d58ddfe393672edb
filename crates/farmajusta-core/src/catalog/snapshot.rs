//! Serializable catalog snapshot.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CatalogError, CatalogResult};
use crate::models::{Drug, DrugPrice, Pharmacy, PharmacyBranch};

/// Bundled Lima sample catalog.
const SEED_CATALOG_JSON: &str = include_str!("../../data/seed_catalog.json");

/// All catalog records, in catalog iteration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub pharmacies: Vec<Pharmacy>,
    #[serde(default)]
    pub drugs: Vec<Drug>,
    #[serde(default)]
    pub branches: Vec<PharmacyBranch>,
    #[serde(default)]
    pub prices: Vec<DrugPrice>,
}

impl CatalogSnapshot {
    /// Parse, validate and sanitize a JSON snapshot.
    pub fn from_json_str(s: &str) -> CatalogResult<Self> {
        let mut snapshot: CatalogSnapshot = serde_json::from_str(s)?;
        snapshot.validate()?;
        snapshot.sanitize();
        debug!(
            drugs = snapshot.drugs.len(),
            branches = snapshot.branches.len(),
            prices = snapshot.prices.len(),
            "catalog snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Read a JSON snapshot from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// The bundled sample catalog.
    pub fn seed() -> CatalogResult<Self> {
        Self::from_json_str(SEED_CATALOG_JSON)
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reject snapshots no lookup could make sense of.
    ///
    /// Dangling references are allowed; the comparator drops them per row.
    pub fn validate(&self) -> CatalogResult<()> {
        let mut seen = HashSet::new();
        for drug in &self.drugs {
            if !seen.insert(drug.id.as_str()) {
                return Err(CatalogError::Corrupt(format!("duplicate drug id '{}'", drug.id)));
            }
        }

        seen.clear();
        for branch in &self.branches {
            if !seen.insert(branch.id.as_str()) {
                return Err(CatalogError::Corrupt(format!(
                    "duplicate branch id '{}'",
                    branch.id
                )));
            }
        }

        for price in &self.prices {
            if !price.price.is_finite() || price.price < 0.0 {
                return Err(CatalogError::Corrupt(format!(
                    "price row '{}' has invalid amount {}",
                    price.id, price.price
                )));
            }
        }

        Ok(())
    }

    /// Drop malformed coordinates so those branches never reach distance math.
    pub fn sanitize(&mut self) {
        for branch in &mut self.branches {
            if let Some(coords) = branch.coordinates {
                if !coords.is_valid() {
                    warn!(
                        branch_id = %branch.id,
                        lat = coords.lat,
                        lng = coords.lng,
                        "dropping malformed branch coordinates"
                    );
                    branch.coordinates = None;
                }
            }
        }

        for drug in &self.drugs {
            if drug.commercial_names.is_empty() {
                warn!(drug_id = %drug.id, "drug has no commercial names");
            }
        }
    }
}
