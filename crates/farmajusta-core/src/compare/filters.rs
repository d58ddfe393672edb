//! Facet filters over comparison results.

use crate::models::{ComparisonResult, SearchFilters};

/// Keep rows matching every active filter, preserving their order.
///
/// - `product_type`: generic-only, brand-only, or all
/// - `price_range`: inclusive on both ends
/// - `only_in_stock`: `IN_STOCK` only; `LOW` does not count
/// - `requires_prescription`: exact match when set
///
/// Always returns a fresh vector, even when no filter is active.
pub fn apply_filters(
    results: &[ComparisonResult],
    filters: &SearchFilters,
) -> Vec<ComparisonResult> {
    results
        .iter()
        .filter(|r| matches_filters(r, filters))
        .cloned()
        .collect()
}

/// Whether a single row passes all filters.
pub fn matches_filters(result: &ComparisonResult, filters: &SearchFilters) -> bool {
    if !filters.product_type.matches(&result.drug) {
        return false;
    }

    if let Some((min, max)) = filters.price_range {
        let amount = result.amount();
        if amount < min || amount > max {
            return false;
        }
    }

    if filters.only_in_stock && !result.price.is_in_stock() {
        return false;
    }

    if let Some(required) = filters.requires_prescription {
        if result.drug.requires_prescription != required {
            return false;
        }
    }

    true
}
