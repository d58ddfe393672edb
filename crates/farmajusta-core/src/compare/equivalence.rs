//! Equivalence class resolution.

use tracing::debug;

use super::{Comparator, CompareResult};
use crate::catalog::CatalogSource;
use crate::models::Drug;

impl<'a, C: CatalogSource + ?Sized> Comparator<'a, C> {
    /// Active drugs sharing DCI, pharmaceutical form and concentration with
    /// `drug_id`, in catalog order. Includes the drug itself when active.
    ///
    /// Unknown ids yield an empty list.
    pub fn find_equivalents(&self, drug_id: &str) -> CompareResult<Vec<Drug>> {
        let Some(source) = self.catalog.drug_by_id(drug_id)? else {
            debug!(drug_id, "unknown drug, no equivalents");
            return Ok(Vec::new());
        };

        let equivalents: Vec<Drug> = self
            .catalog
            .list_drugs()?
            .into_iter()
            .filter(|d| d.is_active && d.is_equivalent_to(&source))
            .collect();

        debug!(drug_id, count = equivalents.len(), "resolved equivalence class");
        Ok(equivalents)
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::{CatalogSnapshot, InMemoryCatalog};
    use crate::compare::Comparator;
    use crate::models::Drug;

    fn tablet(id: &str, dci: &str, concentration: &str, is_generic: bool) -> Drug {
        Drug::new(
            id.into(),
            dci.into(),
            format!("{} {}", dci, id),
            "Tableta".into(),
            concentration.into(),
            is_generic,
        )
    }

    fn setup_catalog() -> InMemoryCatalog {
        let mut inactive = tablet("G0", "Paracetamol", "500mg", true);
        inactive.is_active = false;

        let mut syrup = tablet("S1", "Paracetamol", "500mg", true);
        syrup.pharmaceutical_form = "Jarabe".into();

        let snapshot = CatalogSnapshot {
            drugs: vec![
                inactive,
                tablet("G1", "Paracetamol", "500mg", true),
                tablet("I1", "Ibuprofeno", "400mg", true),
                tablet("B1", "Paracetamol", "500mg", false),
                syrup,
                tablet("G2", "Paracetamol", "1g", true),
            ],
            ..Default::default()
        };
        InMemoryCatalog::from_snapshot(snapshot)
    }

    fn ids(drugs: &[Drug]) -> Vec<&str> {
        drugs.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_equivalents_in_catalog_order() {
        let catalog = setup_catalog();
        let comparator = Comparator::new(&catalog);

        let equivalents = comparator.find_equivalents("G1").unwrap();
        assert_eq!(ids(&equivalents), vec!["G1", "B1"]);

        let from_brand = comparator.find_equivalents("B1").unwrap();
        assert_eq!(ids(&from_brand), vec!["G1", "B1"]);
    }

    #[test]
    fn test_inactive_source_is_excluded_from_its_own_class() {
        let catalog = setup_catalog();
        let comparator = Comparator::new(&catalog);

        let equivalents = comparator.find_equivalents("G0").unwrap();
        assert_eq!(ids(&equivalents), vec!["G1", "B1"]);
    }

    #[test]
    fn test_singleton_class() {
        let catalog = setup_catalog();
        let comparator = Comparator::new(&catalog);

        assert_eq!(ids(&comparator.find_equivalents("S1").unwrap()), vec!["S1"]);
        assert_eq!(ids(&comparator.find_equivalents("G2").unwrap()), vec!["G2"]);
    }

    #[test]
    fn test_unknown_drug_has_no_equivalents() {
        let catalog = setup_catalog();
        let comparator = Comparator::new(&catalog);

        assert!(comparator.find_equivalents("unknown-id").unwrap().is_empty());
    }
}
