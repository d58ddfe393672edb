//! Free-text drug search.
//!
//! Pipeline: Query Normalization → Substring Match → (no hits) Fuzzy Suggestions
//!
//! Search sits upstream of the comparator: it turns what the user typed into
//! drug ids, which the comparator then resolves exactly.

mod normalizer;

pub use normalizer::*;

use serde::{Deserialize, Serialize};
use strsim::{jaro_winkler, normalized_levenshtein};
use tracing::debug;

use crate::catalog::{CatalogResult, CatalogSource};
use crate::models::Drug;

/// Default number of suggestions returned.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Minimum similarity to be offered as a suggestion.
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.75;

/// A "did you mean" candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    pub drug: Drug,
    /// The name that matched best (DCI or a commercial name)
    pub matched_name: String,
    /// Similarity in `0.0..=1.0`
    pub score: f64,
}

/// Drug search over a catalog.
pub struct DrugSearch<'a, C: CatalogSource + ?Sized> {
    catalog: &'a C,
    normalizer: QueryNormalizer,
}

impl<'a, C: CatalogSource + ?Sized> DrugSearch<'a, C> {
    /// Create a search with the default normalizer.
    pub fn new(catalog: &'a C) -> Self {
        Self::with_normalizer(catalog, QueryNormalizer::new())
    }

    /// Create a search with a custom normalizer.
    pub fn with_normalizer(catalog: &'a C, normalizer: QueryNormalizer) -> Self {
        Self {
            catalog,
            normalizer,
        }
    }

    /// Active drugs whose DCI, a commercial name, laboratory or active
    /// ingredient contains the query. Blank queries return every active drug.
    ///
    /// Case- and accent-insensitive; known aliases also match their DCI.
    pub fn search(&self, query: &str) -> CatalogResult<Vec<Drug>> {
        let active = self.catalog.list_drugs()?.into_iter().filter(|d| d.is_active);

        let literal = self.normalizer.fold(query);
        if literal.is_empty() {
            return Ok(active.collect());
        }
        let expanded = self.normalizer.normalize(query);

        let results: Vec<Drug> = active
            .filter(|d| self.matches(d, &literal) || self.matches(d, &expanded))
            .collect();

        debug!(query, expanded = %expanded, hits = results.len(), "searched drugs");
        Ok(results)
    }

    /// Closest active drugs by name similarity, best first.
    ///
    /// Intended for queries where [`search`](Self::search) found nothing.
    pub fn suggest(
        &self,
        query: &str,
        limit: usize,
        min_similarity: f64,
    ) -> CatalogResult<Vec<Suggestion>> {
        let wanted = self.normalizer.normalize(query);
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let mut suggestions: Vec<Suggestion> = self
            .catalog
            .list_drugs()?
            .into_iter()
            .filter(|d| d.is_active)
            .filter_map(|drug| {
                let (matched_name, score) = self.best_name_match(&drug, &wanted)?;
                (score >= min_similarity).then_some(Suggestion {
                    drug,
                    matched_name,
                    score,
                })
            })
            .collect();

        // Sort by score descending; ties keep catalog order.
        suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
        suggestions.truncate(limit);
        Ok(suggestions)
    }

    fn matches(&self, drug: &Drug, needle: &str) -> bool {
        let contains = |field: &str| self.normalizer.fold(field).contains(needle);

        contains(drug.dci.as_str())
            || drug.commercial_names.iter().any(|n| contains(n.as_str()))
            || contains(drug.laboratory.as_str())
            || contains(drug.active_ingredient.as_str())
    }

    fn best_name_match(&self, drug: &Drug, wanted: &str) -> Option<(String, f64)> {
        std::iter::once(&drug.dci)
            .chain(drug.commercial_names.iter())
            .map(|name| (name.clone(), fuzzy_match(wanted, &self.normalizer.fold(name))))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Compute fuzzy string similarity using combined metrics.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    // Jaro-Winkler rewards shared prefixes, Levenshtein overall edit distance
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);
    jw * 0.6 + lev * 0.4
}
