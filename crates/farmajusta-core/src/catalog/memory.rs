//! In-memory catalog over an immutable snapshot.

use std::collections::HashMap;
use std::path::Path;

use super::{CatalogResult, CatalogSnapshot, CatalogSource};
use crate::models::{Drug, DrugPrice, PharmacyBranch};

/// Immutable, indexed catalog. Safe to share across threads once built.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    snapshot: CatalogSnapshot,
    drug_index: HashMap<String, usize>,
    branch_index: HashMap<String, usize>,
}

impl InMemoryCatalog {
    /// Build from an already-validated snapshot.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        let drug_index = snapshot
            .drugs
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.clone(), i))
            .collect();
        let branch_index = snapshot
            .branches
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id.clone(), i))
            .collect();

        Self {
            snapshot,
            drug_index,
            branch_index,
        }
    }

    /// Parse a JSON snapshot.
    pub fn from_json_str(s: &str) -> CatalogResult<Self> {
        Ok(Self::from_snapshot(CatalogSnapshot::from_json_str(s)?))
    }

    /// Load a JSON snapshot from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        Ok(Self::from_snapshot(CatalogSnapshot::from_path(path)?))
    }

    /// The bundled sample catalog.
    pub fn seed() -> CatalogResult<Self> {
        Ok(Self::from_snapshot(CatalogSnapshot::seed()?))
    }

    /// Underlying snapshot.
    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }
}

impl CatalogSource for InMemoryCatalog {
    fn drug_by_id(&self, id: &str) -> CatalogResult<Option<Drug>> {
        Ok(self
            .drug_index
            .get(id)
            .map(|&i| self.snapshot.drugs[i].clone()))
    }

    fn branch_by_id(&self, id: &str) -> CatalogResult<Option<PharmacyBranch>> {
        Ok(self
            .branch_index
            .get(id)
            .map(|&i| self.snapshot.branches[i].clone()))
    }

    fn prices_for_drug(&self, drug_id: &str) -> CatalogResult<Vec<DrugPrice>> {
        Ok(self
            .snapshot
            .prices
            .iter()
            .filter(|p| p.drug_id == drug_id)
            .cloned()
            .collect())
    }

    fn list_drugs(&self) -> CatalogResult<Vec<Drug>> {
        Ok(self.snapshot.drugs.clone())
    }

    fn list_branches(&self) -> CatalogResult<Vec<PharmacyBranch>> {
        Ok(self.snapshot.branches.clone())
    }
}
