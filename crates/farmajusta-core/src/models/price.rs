//! Price models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default currency for catalog prices (Peruvian sol).
pub const DEFAULT_CURRENCY: &str = "PEN";

/// Stock status of a drug at one branch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    InStock,
    Low,
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "IN_STOCK",
            StockStatus::Low => "LOW",
            StockStatus::OutOfStock => "OUT_OF_STOCK",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IN_STOCK" => Some(StockStatus::InStock),
            "LOW" => Some(StockStatus::Low),
            "OUT_OF_STOCK" => Some(StockStatus::OutOfStock),
            _ => None,
        }
    }
}

/// Where a price observation came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PriceSource {
    /// Field survey (SNIP observatory)
    #[serde(rename = "SNIP")]
    Survey,
    #[serde(rename = "PHARMACY_API")]
    PharmacyApi,
    #[serde(rename = "MANUAL")]
    Manual,
}

impl PriceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceSource::Survey => "SNIP",
            PriceSource::PharmacyApi => "PHARMACY_API",
            PriceSource::Manual => "MANUAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SNIP" => Some(PriceSource::Survey),
            "PHARMACY_API" => Some(PriceSource::PharmacyApi),
            "MANUAL" => Some(PriceSource::Manual),
            _ => None,
        }
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// The price of one drug at one branch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrugPrice {
    pub id: String,
    pub drug_id: String,
    pub branch_id: String,
    /// Non-negative amount in `currency`
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub stock_status: StockStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<u32>,
    pub source: PriceSource,
    pub last_updated: DateTime<Utc>,
}

impl DrugPrice {
    /// Create a new in-stock, manually entered price with a generated id.
    pub fn new(drug_id: String, branch_id: String, price: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            drug_id,
            branch_id,
            price,
            currency: default_currency(),
            stock_status: StockStatus::InStock,
            stock_quantity: None,
            source: PriceSource::Manual,
            last_updated: Utc::now(),
        }
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock_status == StockStatus::InStock
    }
}
