//! Price join, radius filtering and ranking.

use std::cmp::Ordering;

use tracing::debug;

use super::{apply_filters, distance_km, Comparator, CompareResult};
use crate::catalog::CatalogSource;
use crate::models::{
    ComparisonResult, DrugPrice, EmptyReason, LocationData, PharmacyBranch, SearchFilters,
    SortKey,
};

impl<'a, C: CatalogSource + ?Sized> Comparator<'a, C> {
    /// Offers for a single drug, cheapest first.
    ///
    /// With a `location`, each row carries its distance and rows farther
    /// than `max_distance_km` (or at branches without coordinates) are
    /// dropped. Without one, distance is left unset and nothing is filtered.
    /// Rows whose branch or drug cannot be resolved are skipped. Equal prices
    /// keep catalog order.
    pub fn compare_prices(
        &self,
        drug_id: &str,
        location: Option<&LocationData>,
        max_distance_km: f64,
    ) -> CompareResult<Vec<ComparisonResult>> {
        let prices = self.catalog.prices_for_drug(drug_id)?;
        let total = prices.len();

        // Every row shares the same drug id, so a missing drug drops them all.
        let Some(drug) = self.catalog.drug_by_id(drug_id)? else {
            debug!(drug_id, rows = total, "drug not in catalog, skipping price rows");
            return Ok(Vec::new());
        };

        let mut results = Vec::with_capacity(total);
        for price in prices {
            let Some(branch) = self.catalog.branch_by_id(&price.branch_id)? else {
                debug!(
                    price_id = %price.id,
                    branch_id = %price.branch_id,
                    "dangling branch reference, skipping row"
                );
                continue;
            };

            let Some(distance) = locate(&branch, location, max_distance_km) else {
                continue;
            };

            results.push(ComparisonResult {
                drug: drug.clone(),
                branch,
                price,
                distance,
            });
        }

        sort_results(&mut results, SortKey::Price);

        debug!(
            drug_id,
            located = location.is_some(),
            max_distance_km,
            rows = total,
            kept = results.len(),
            "compared prices"
        );
        Ok(results)
    }

    /// Offers for every equivalent of a drug, merged and cheapest first.
    pub fn compare_equivalents(
        &self,
        drug_id: &str,
        location: Option<&LocationData>,
        max_distance_km: f64,
    ) -> CompareResult<Vec<ComparisonResult>> {
        let mut results = Vec::new();
        for equivalent in self.find_equivalents(drug_id)? {
            results.extend(self.compare_prices(&equivalent.id, location, max_distance_km)?);
        }

        sort_results(&mut results, SortKey::Price);
        Ok(results)
    }

    /// Branches within `radius_km` of `location`, in catalog order.
    pub fn branches_in_radius(
        &self,
        location: &LocationData,
        radius_km: f64,
    ) -> CompareResult<Vec<PharmacyBranch>> {
        Ok(self
            .catalog
            .list_branches()?
            .into_iter()
            .filter(|b| matches!(locate(b, Some(location), radius_km), Some(Some(_))))
            .collect())
    }

    /// Explain why [`compare_equivalents`](Self::compare_equivalents) with
    /// the same arguments is empty. `None` when it is not.
    pub fn diagnose_empty(
        &self,
        drug_id: &str,
        location: Option<&LocationData>,
        max_distance_km: f64,
    ) -> CompareResult<Option<EmptyReason>> {
        self.diagnose_comparison(
            drug_id,
            location,
            max_distance_km,
            true,
            &SearchFilters::default(),
        )
    }

    /// Explain why a comparison came back empty.
    ///
    /// `include_equivalents` picks the comparison that ran:
    /// [`compare_equivalents`](Self::compare_equivalents) when set,
    /// [`compare_prices`](Self::compare_prices) otherwise. `filters` are the
    /// facet filters applied afterwards. `None` when the filtered rows are
    /// not empty.
    pub fn diagnose_comparison(
        &self,
        drug_id: &str,
        location: Option<&LocationData>,
        max_distance_km: f64,
        include_equivalents: bool,
        filters: &SearchFilters,
    ) -> CompareResult<Option<EmptyReason>> {
        if self.catalog.drug_by_id(drug_id)?.is_none() {
            return Ok(Some(EmptyReason::UnknownDrug));
        }

        let run = |location: Option<&LocationData>| {
            if include_equivalents {
                self.compare_equivalents(drug_id, location, max_distance_km)
            } else {
                self.compare_prices(drug_id, location, max_distance_km)
            }
        };

        let unlocated = run(None)?;
        if unlocated.is_empty() {
            return Ok(Some(EmptyReason::NoOffers));
        }

        let rows = match location {
            Some(_) => run(location)?,
            None => unlocated,
        };
        if rows.is_empty() {
            return Ok(Some(EmptyReason::NoneWithinRadius));
        }

        if !filters.is_empty() && apply_filters(&rows, filters).is_empty() {
            return Ok(Some(EmptyReason::FilteredOut));
        }

        Ok(None)
    }
}

/// Distance decision for one branch.
///
/// `None` drops the row; `Some(None)` keeps it without a distance.
fn locate(
    branch: &PharmacyBranch,
    location: Option<&LocationData>,
    max_distance_km: f64,
) -> Option<Option<f64>> {
    let Some(location) = location else {
        return Some(None);
    };

    let Some(coords) = branch.valid_coordinates() else {
        debug!(branch_id = %branch.id, "branch has no coordinates, excluded from radius search");
        return None;
    };

    let distance = distance_km(location.lat, location.lng, coords.lat, coords.lng);
    if distance > max_distance_km || distance.is_nan() {
        return None;
    }
    Some(Some(distance))
}

/// Stable in-place sort of comparison rows.
pub fn sort_results(results: &mut [ComparisonResult], key: SortKey) {
    match key {
        SortKey::Price => results.sort_by(|a, b| compare_price(&a.price, &b.price)),
        SortKey::Distance => results.sort_by(|a, b| match (a.distance, b.distance) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
    }
}

// Amounts are finite, so only NaN could be unordered. -0.0 ties with 0.0.
fn compare_price(a: &DrugPrice, b: &DrugPrice) -> Ordering {
    a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal)
}
