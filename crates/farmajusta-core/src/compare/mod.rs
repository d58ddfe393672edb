//! Price comparison engine.
//!
//! Pipeline: Equivalence Resolution → Price Join (+ distance) → Radius Filter
//! → Price Ranking → optional Facet Filters. Savings are derived separately
//! from the same equivalence class.
//!
//! Every operation is a pure read over a [`CatalogSource`]. Unknown ids and
//! dangling references produce empty results, never errors; only faults of
//! the catalog itself surface as [`CompareError`].

mod equivalence;
mod filters;
mod geo;
mod prices;
mod savings;

pub use filters::*;
pub use geo::*;
pub use prices::*;

use thiserror::Error;

use crate::catalog::{CatalogError, CatalogSource};

/// Default search radius around the user, in kilometres.
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Comparator errors.
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

pub type CompareResult<T> = Result<T, CompareError>;

/// Stateless comparator over a borrowed catalog.
pub struct Comparator<'a, C: CatalogSource + ?Sized> {
    catalog: &'a C,
}

impl<'a, C: CatalogSource + ?Sized> Comparator<'a, C> {
    /// Create a comparator reading from `catalog`.
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// The catalog this comparator reads from.
    pub fn catalog(&self) -> &'a C {
        self.catalog
    }
}
