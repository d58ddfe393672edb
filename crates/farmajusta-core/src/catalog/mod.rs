//! Read-only catalog access.
//!
//! The comparator only ever sees a [`CatalogSource`]. Lookups return
//! `Ok(None)` for absent records; `Err` is reserved for faults of the
//! backing store (I/O, SQLite, corrupt JSON).

mod memory;
mod snapshot;

pub use memory::*;
pub use snapshot::*;

use thiserror::Error;

use crate::models::{Drug, DrugPrice, PharmacyBranch};

/// Catalog errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt catalog: {0}")]
    Corrupt(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Query contract of the data access layer.
///
/// Every list is returned in catalog iteration order, which the comparator
/// relies on as its tie-break.
pub trait CatalogSource {
    /// Look up a drug by id (active or not).
    fn drug_by_id(&self, id: &str) -> CatalogResult<Option<Drug>>;

    /// Look up a branch by id.
    fn branch_by_id(&self, id: &str) -> CatalogResult<Option<PharmacyBranch>>;

    /// All price rows for a drug.
    fn prices_for_drug(&self, drug_id: &str) -> CatalogResult<Vec<DrugPrice>>;

    /// All drugs, including inactive ones.
    fn list_drugs(&self) -> CatalogResult<Vec<Drug>>;

    /// All branches.
    fn list_branches(&self) -> CatalogResult<Vec<PharmacyBranch>>;
}
