//! Comparison view models derived from the catalog.

use serde::{Deserialize, Serialize};

use super::{Drug, DrugPrice, PharmacyBranch};

/// One comparison row: a drug offered at a branch at a price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub drug: Drug,
    pub branch: PharmacyBranch,
    pub price: DrugPrice,
    /// Kilometres from the user, when a location was supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl ComparisonResult {
    pub fn amount(&self) -> f64 {
        self.price.price
    }
}

/// Generic/brand facet.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProductType {
    #[serde(rename = "generico")]
    Generic,
    #[serde(rename = "marca")]
    Brand,
    #[default]
    #[serde(rename = "todos")]
    All,
}

impl ProductType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "generico" | "generic" => Some(ProductType::Generic),
            "marca" | "brand" => Some(ProductType::Brand),
            "todos" | "all" | "" => Some(ProductType::All),
            _ => None,
        }
    }

    pub fn matches(&self, drug: &Drug) -> bool {
        match self {
            ProductType::Generic => drug.is_generic,
            ProductType::Brand => !drug.is_generic,
            ProductType::All => true,
        }
    }
}

/// Post-hoc facet filters over a comparison result set.
///
/// The default value filters nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, rename = "type")]
    pub product_type: ProductType,
    /// Inclusive `[min, max]`
    #[serde(default)]
    pub price_range: Option<(f64, f64)>,
    #[serde(default)]
    pub only_in_stock: bool,
    #[serde(default)]
    pub requires_prescription: Option<bool>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.product_type == ProductType::All
            && self.price_range.is_none()
            && !self.only_in_stock
            && self.requires_prescription.is_none()
    }
}

/// Ordering applied to comparison rows.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Cheapest first (the neutral default)
    #[default]
    Price,
    /// Nearest first; rows without a distance go last
    Distance,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "price" | "precio" => Some(SortKey::Price),
            "distance" | "distancia" => Some(SortKey::Distance),
            _ => None,
        }
    }
}

/// Generic-versus-brand savings for an equivalence class.
///
/// `savings` and `savings_percentage` are only present when both prices are.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSummary {
    pub generic_price: Option<f64>,
    pub brand_price: Option<f64>,
    /// `brand - generic`; negative when the generic costs more
    pub savings: Option<f64>,
    pub savings_percentage: Option<i64>,
}

impl SavingsSummary {
    /// Whether a "you save" banner makes sense.
    pub fn has_positive_savings(&self) -> bool {
        self.savings.is_some_and(|s| s > 0.0)
    }
}

/// Why a comparison came back empty.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// The drug id is not in the catalog
    UnknownDrug,
    /// No branch carries the drug or any equivalent
    NoOffers,
    /// Offers exist, but none inside the search radius
    NoneWithinRadius,
    /// Offers inside the radius exist, but the facet filters removed them all
    FilteredOut,
}
