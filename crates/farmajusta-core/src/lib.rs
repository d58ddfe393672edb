//! FarmaJusta Core Library
//!
//! Medication price comparison and geolocation ranking over a catalog of
//! drugs, pharmacy branches and per-branch prices.
//!
//! # Architecture
//!
//! ```text
//! Query → Normalization → Drug Search ──(no hits)──► Suggestions
//!                              │
//!                           drug id
//!                              │
//!                   Equivalence Resolution
//!                              │
//!              ┌───────────────▼───────────────┐
//!              │          Price Join           │
//!              │  price ⋈ branch ⋈ drug        │
//!              │  + haversine distance         │
//!              └───────────────┬───────────────┘
//!                              │
//!               Radius Filter → Price Ranking
//!                              │
//!             ┌────────────────┼────────────────┐
//!             ▼                ▼                ▼
//!       Facet Filters       Savings        Diagnostics
//! ```
//!
//! # Core Principle
//!
//! **Absence is data, not failure.** Unknown ids, dangling references and
//! branches without coordinates shrink the result; only faults of the
//! backing store are errors.
//!
//! # Modules
//!
//! - [`catalog`]: `CatalogSource` contract, JSON snapshots, in-memory catalog
//! - [`db`]: SQLite catalog
//! - [`models`]: Domain types (Drug, PharmacyBranch, DrugPrice, etc.)
//! - [`compare`]: Distance, equivalents, price ranking, filters, savings
//! - [`search`]: Free-text drug search and suggestions
//! - [`config`]: TOML engine configuration

pub mod catalog;
pub mod compare;
pub mod config;
pub mod db;
pub mod models;
pub mod search;

// Re-export commonly used types
pub use catalog::{CatalogError, CatalogSnapshot, CatalogSource, InMemoryCatalog};
pub use compare::{apply_filters, distance_km, sort_results, Comparator, CompareError};
pub use config::EngineConfig;
pub use db::Database;
pub use models::{
    ComparisonResult, Drug, DrugPrice, EmptyReason, LocationData, PharmacyBranch, ProductType,
    SavingsSummary, SearchFilters, SortKey, StockStatus,
};
pub use search::{DrugSearch, QueryNormalizer, Suggestion};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex, RwLock};

type SharedCatalog = Arc<Mutex<Box<dyn CatalogSource + Send>>>;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FarmaJustaError {
    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<CatalogError> for FarmaJustaError {
    fn from(e: CatalogError) -> Self {
        FarmaJustaError::CatalogError(e.to_string())
    }
}

impl From<db::DbError> for FarmaJustaError {
    fn from(e: db::DbError) -> Self {
        FarmaJustaError::CatalogError(e.to_string())
    }
}

impl From<CompareError> for FarmaJustaError {
    fn from(e: CompareError) -> Self {
        FarmaJustaError::CatalogError(e.to_string())
    }
}

impl From<config::ConfigError> for FarmaJustaError {
    fn from(e: config::ConfigError) -> Self {
        FarmaJustaError::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for FarmaJustaError {
    fn from(e: serde_json::Error) -> Self {
        FarmaJustaError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for FarmaJustaError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        FarmaJustaError::CatalogError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open the bundled Lima sample catalog.
#[uniffi::export]
pub fn open_seed_catalog() -> Result<Arc<FarmaJustaCore>, FarmaJustaError> {
    Ok(FarmaJustaCore::wrap(Box::new(InMemoryCatalog::seed()?)))
}

/// Open a JSON catalog snapshot.
#[uniffi::export]
pub fn open_json_catalog(path: String) -> Result<Arc<FarmaJustaCore>, FarmaJustaError> {
    Ok(FarmaJustaCore::wrap(Box::new(InMemoryCatalog::from_path(&path)?)))
}

/// Open or create a SQLite catalog at the given path.
#[uniffi::export]
pub fn open_sqlite_catalog(path: String) -> Result<Arc<FarmaJustaCore>, FarmaJustaError> {
    Ok(FarmaJustaCore::wrap(Box::new(Database::open(&path)?)))
}

/// Great-circle distance in km, rounded to one decimal.
#[uniffi::export]
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    distance_km(lat1, lng1, lat2, lng2)
}

/// Centre of a known Lima district.
#[uniffi::export]
pub fn district_location(name: String) -> Option<FfiLocation> {
    models::district_location(&name).map(Into::into)
}

/// Closest known Lima district to a point.
#[uniffi::export]
pub fn nearest_district(lat: f64, lng: f64) -> String {
    models::nearest_district(lat, lng).to_string()
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe engine wrapper for FFI.
///
/// The catalog can be swapped while calls are in flight; each call works
/// against the catalog that was current when it started.
#[derive(uniffi::Object)]
pub struct FarmaJustaCore {
    catalog: RwLock<SharedCatalog>,
    config: RwLock<EngineConfig>,
}

impl FarmaJustaCore {
    fn wrap(catalog: Box<dyn CatalogSource + Send>) -> Arc<Self> {
        Arc::new(Self {
            catalog: RwLock::new(Arc::new(Mutex::new(catalog))),
            config: RwLock::new(EngineConfig::default()),
        })
    }

    fn current(&self) -> Result<SharedCatalog, FarmaJustaError> {
        Ok(Arc::clone(&*self.catalog.read()?))
    }

    fn swap(&self, catalog: Box<dyn CatalogSource + Send>) -> Result<(), FarmaJustaError> {
        *self.catalog.write()? = Arc::new(Mutex::new(catalog));
        Ok(())
    }

    fn radius(&self, max_distance_km: Option<f64>) -> Result<f64, FarmaJustaError> {
        match max_distance_km {
            Some(r) if r.is_nan() || r < 0.0 => Err(FarmaJustaError::InvalidInput(format!(
                "radius must be a non-negative number, got {}",
                r
            ))),
            Some(r) => Ok(r),
            None => Ok(self.config.read()?.default_radius_km),
        }
    }

    fn sort_key(&self, sort: Option<String>) -> Result<SortKey, FarmaJustaError> {
        match sort {
            Some(s) => SortKey::parse(&s)
                .ok_or_else(|| FarmaJustaError::InvalidInput(format!("unknown sort key '{}'", s))),
            None => Ok(self.config.read()?.default_sort),
        }
    }

    fn finish(
        &self,
        mut rows: Vec<ComparisonResult>,
        filters: Option<FfiSearchFilters>,
        sort: Option<String>,
    ) -> Result<Vec<FfiComparisonRow>, FarmaJustaError> {
        if let Some(filters) = filters {
            let filters = SearchFilters::try_from(filters)?;
            rows = apply_filters(&rows, &filters);
        }
        sort_results(&mut rows, self.sort_key(sort)?);
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[uniffi::export]
impl FarmaJustaCore {
    // =========================================================================
    // Catalog Management
    // =========================================================================

    /// Replace the engine configuration with a TOML document.
    pub fn configure(&self, toml: String) -> Result<(), FarmaJustaError> {
        let config = EngineConfig::from_toml_str(&toml)?;
        *self.config.write()? = config;
        Ok(())
    }

    /// Swap in a JSON catalog snapshot.
    pub fn reload_json(&self, path: String) -> Result<(), FarmaJustaError> {
        self.swap(Box::new(InMemoryCatalog::from_path(&path)?))
    }

    /// Swap in a SQLite catalog.
    pub fn reload_sqlite(&self, path: String) -> Result<(), FarmaJustaError> {
        self.swap(Box::new(Database::open(&path)?))
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Active drugs matching a free-text query.
    pub fn search(&self, query: String) -> Result<Vec<FfiDrug>, FarmaJustaError> {
        let catalog = self.current()?;
        let catalog = catalog.lock()?;
        let drugs = DrugSearch::new(&**catalog).search(&query)?;
        Ok(drugs.into_iter().map(Into::into).collect())
    }

    /// "Did you mean" candidates for a query.
    pub fn suggest(&self, query: String) -> Result<Vec<FfiSuggestion>, FarmaJustaError> {
        let search_config = self.config.read()?.search.clone();
        let catalog = self.current()?;
        let catalog = catalog.lock()?;
        let suggestions = DrugSearch::new(&**catalog).suggest(
            &query,
            search_config.suggestion_limit,
            search_config.min_similarity,
        )?;
        Ok(suggestions.into_iter().map(Into::into).collect())
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    /// Active drugs interchangeable with the given one.
    pub fn equivalents(&self, drug_id: String) -> Result<Vec<FfiDrug>, FarmaJustaError> {
        let catalog = self.current()?;
        let catalog = catalog.lock()?;
        let drugs = Comparator::new(&**catalog).find_equivalents(&drug_id)?;
        Ok(drugs.into_iter().map(Into::into).collect())
    }

    /// Offers for a single drug.
    pub fn compare_prices(
        &self,
        drug_id: String,
        location: Option<FfiLocation>,
        max_distance_km: Option<f64>,
        filters: Option<FfiSearchFilters>,
        sort: Option<String>,
    ) -> Result<Vec<FfiComparisonRow>, FarmaJustaError> {
        let radius = self.radius(max_distance_km)?;
        let location = location.map(LocationData::from);
        let catalog = self.current()?;
        let guard = catalog.lock()?;
        let rows = Comparator::new(&**guard).compare_prices(&drug_id, location.as_ref(), radius)?;
        drop(guard);
        self.finish(rows, filters, sort)
    }

    /// Offers for a drug and all of its equivalents.
    pub fn compare_equivalents(
        &self,
        drug_id: String,
        location: Option<FfiLocation>,
        max_distance_km: Option<f64>,
        filters: Option<FfiSearchFilters>,
        sort: Option<String>,
    ) -> Result<Vec<FfiComparisonRow>, FarmaJustaError> {
        let radius = self.radius(max_distance_km)?;
        let location = location.map(LocationData::from);
        let catalog = self.current()?;
        let guard = catalog.lock()?;
        let rows = Comparator::new(&**guard).compare_equivalents(&drug_id, location.as_ref(), radius)?;
        drop(guard);
        self.finish(rows, filters, sort)
    }

    /// Generic-versus-brand savings for a drug's equivalence class.
    pub fn savings(&self, drug_id: String) -> Result<FfiSavings, FarmaJustaError> {
        let catalog = self.current()?;
        let catalog = catalog.lock()?;
        let summary = Comparator::new(&**catalog).calculate_savings(&drug_id)?;
        Ok(summary.into())
    }

    /// Branches within a radius of a location.
    pub fn nearby_branches(
        &self,
        location: FfiLocation,
        max_distance_km: Option<f64>,
    ) -> Result<Vec<FfiBranch>, FarmaJustaError> {
        let radius = self.radius(max_distance_km)?;
        let location = LocationData::from(location);
        let catalog = self.current()?;
        let catalog = catalog.lock()?;
        let branches = Comparator::new(&**catalog).branches_in_radius(&location, radius)?;
        Ok(branches.into_iter().map(Into::into).collect())
    }

    /// Why a comparison is empty, as a snake_case reason.
    ///
    /// `include_equivalents` and `filters` must match the call that came
    /// back empty: `compare_equivalents` when set, `compare_prices` otherwise.
    pub fn diagnose(
        &self,
        drug_id: String,
        location: Option<FfiLocation>,
        max_distance_km: Option<f64>,
        include_equivalents: bool,
        filters: Option<FfiSearchFilters>,
    ) -> Result<Option<String>, FarmaJustaError> {
        let radius = self.radius(max_distance_km)?;
        let location = location.map(LocationData::from);
        let filters = match filters {
            Some(f) => SearchFilters::try_from(f)?,
            None => SearchFilters::default(),
        };
        let catalog = self.current()?;
        let catalog = catalog.lock()?;
        let reason = Comparator::new(&**catalog).diagnose_comparison(
            &drug_id,
            location.as_ref(),
            radius,
            include_equivalents,
            &filters,
        )?;
        Ok(reason.map(|r| empty_reason_str(r).to_string()))
    }
}

fn empty_reason_str(reason: EmptyReason) -> &'static str {
    match reason {
        EmptyReason::UnknownDrug => "unknown_drug",
        EmptyReason::NoOffers => "no_offers",
        EmptyReason::NoneWithinRadius => "none_within_radius",
        EmptyReason::FilteredOut => "filtered_out",
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe user location.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLocation {
    pub lat: f64,
    pub lng: f64,
    pub district: Option<String>,
}

impl From<FfiLocation> for LocationData {
    fn from(loc: FfiLocation) -> Self {
        let mut data = LocationData::new(loc.lat, loc.lng);
        data.district = loc.district;
        data
    }
}

impl From<LocationData> for FfiLocation {
    fn from(loc: LocationData) -> Self {
        Self {
            lat: loc.lat,
            lng: loc.lng,
            district: loc.district,
        }
    }
}

/// FFI-safe drug (display-only medical info omitted).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrug {
    pub id: String,
    pub dci: String,
    pub display_name: String,
    pub commercial_names: Vec<String>,
    pub pharmaceutical_form: String,
    pub concentration: String,
    pub is_generic: bool,
    pub laboratory: String,
    pub requires_prescription: bool,
}

impl From<Drug> for FfiDrug {
    fn from(drug: Drug) -> Self {
        Self {
            display_name: drug.display_name().to_string(),
            id: drug.id,
            dci: drug.dci,
            commercial_names: drug.commercial_names,
            pharmaceutical_form: drug.pharmaceutical_form,
            concentration: drug.concentration,
            is_generic: drug.is_generic,
            laboratory: drug.laboratory,
            requires_prescription: drug.requires_prescription,
        }
    }
}

/// FFI-safe pharmacy branch.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBranch {
    pub id: String,
    pub pharmacy_id: String,
    pub pharmacy_name: String,
    pub address: String,
    pub district: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub phone: String,
    pub is_open_24_hours: bool,
    pub rating: f64,
}

impl From<PharmacyBranch> for FfiBranch {
    fn from(branch: PharmacyBranch) -> Self {
        Self {
            lat: branch.coordinates.map(|c| c.lat),
            lng: branch.coordinates.map(|c| c.lng),
            id: branch.id,
            pharmacy_id: branch.pharmacy_id,
            pharmacy_name: branch.pharmacy_name,
            address: branch.address,
            district: branch.district,
            phone: branch.phone,
            is_open_24_hours: branch.is_open_24_hours,
            rating: branch.rating,
        }
    }
}

/// FFI-safe comparison row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiComparisonRow {
    pub price_id: String,
    pub drug: FfiDrug,
    pub branch: FfiBranch,
    pub price: f64,
    pub currency: String,
    pub stock_status: String,
    pub distance_km: Option<f64>,
    pub last_updated: String,
}

impl From<ComparisonResult> for FfiComparisonRow {
    fn from(row: ComparisonResult) -> Self {
        Self {
            price_id: row.price.id,
            drug: row.drug.into(),
            branch: row.branch.into(),
            price: row.price.price,
            currency: row.price.currency,
            stock_status: row.price.stock_status.as_str().to_string(),
            distance_km: row.distance,
            last_updated: row.price.last_updated.to_rfc3339(),
        }
    }
}

/// FFI-safe facet filters.
///
/// `product_type` accepts `generico`/`marca`/`todos` (or English). A single
/// price bound leaves the other side open.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSearchFilters {
    pub product_type: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub only_in_stock: bool,
    pub requires_prescription: Option<bool>,
}

impl TryFrom<FfiSearchFilters> for SearchFilters {
    type Error = FarmaJustaError;

    fn try_from(filters: FfiSearchFilters) -> Result<Self, Self::Error> {
        let product_type = ProductType::parse(&filters.product_type).ok_or_else(|| {
            FarmaJustaError::InvalidInput(format!(
                "unknown product type '{}'",
                filters.product_type
            ))
        })?;

        let price_range = match (filters.min_price, filters.max_price) {
            (None, None) => None,
            (min, max) => Some((min.unwrap_or(0.0), max.unwrap_or(f64::INFINITY))),
        };

        Ok(SearchFilters {
            product_type,
            price_range,
            only_in_stock: filters.only_in_stock,
            requires_prescription: filters.requires_prescription,
        })
    }
}

/// FFI-safe savings summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSavings {
    pub generic_price: Option<f64>,
    pub brand_price: Option<f64>,
    pub savings: Option<f64>,
    pub savings_percentage: Option<i64>,
}

impl From<SavingsSummary> for FfiSavings {
    fn from(summary: SavingsSummary) -> Self {
        Self {
            generic_price: summary.generic_price,
            brand_price: summary.brand_price,
            savings: summary.savings,
            savings_percentage: summary.savings_percentage,
        }
    }
}

/// FFI-safe search suggestion.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSuggestion {
    pub drug_id: String,
    pub display_name: String,
    pub matched_name: String,
    pub score: f64,
}

impl From<Suggestion> for FfiSuggestion {
    fn from(s: Suggestion) -> Self {
        Self {
            display_name: s.drug.display_name().to_string(),
            drug_id: s.drug.id,
            matched_name: s.matched_name,
            score: s.score,
        }
    }
}
