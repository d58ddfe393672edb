//! Generic-versus-brand savings.

use tracing::debug;

use super::{round_half_up, Comparator, CompareResult};
use crate::catalog::CatalogSource;
use crate::models::SavingsSummary;

impl<'a, C: CatalogSource + ?Sized> Comparator<'a, C> {
    /// Cheapest generic and cheapest brand price across the equivalence
    /// class of `drug_id`, and the difference between them.
    ///
    /// Savings are only reported when both sides have a price. They are not
    /// clamped: a generic costlier than the brand yields negative savings.
    /// The percentage is relative to the brand price and left unset when
    /// that price is zero.
    pub fn calculate_savings(&self, drug_id: &str) -> CompareResult<SavingsSummary> {
        let mut generic_price: Option<f64> = None;
        let mut brand_price: Option<f64> = None;

        for equivalent in self.find_equivalents(drug_id)? {
            let side = if equivalent.is_generic {
                &mut generic_price
            } else {
                &mut brand_price
            };
            for price in self.catalog.prices_for_drug(&equivalent.id)? {
                *side = Some(side.map_or(price.price, |current| current.min(price.price)));
            }
        }

        let (savings, savings_percentage) = match (generic_price, brand_price) {
            (Some(generic), Some(brand)) => {
                let savings = brand - generic;
                let percentage = (brand != 0.0).then(|| round_half_up(savings / brand * 100.0));
                (Some(savings), percentage)
            }
            _ => (None, None),
        };

        debug!(
            drug_id,
            ?generic_price,
            ?brand_price,
            ?savings,
            "calculated savings"
        );

        Ok(SavingsSummary {
            generic_price,
            brand_price,
            savings,
            savings_percentage,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::{CatalogSnapshot, InMemoryCatalog};
    use crate::compare::Comparator;
    use crate::models::{Drug, DrugPrice, SavingsSummary};

    fn tablet(id: &str, is_generic: bool) -> Drug {
        Drug::new(
            id.into(),
            "Paracetamol".into(),
            id.into(),
            "Tableta".into(),
            "500mg".into(),
            is_generic,
        )
    }

    fn catalog_with(drugs: Vec<Drug>, prices: &[(&str, f64)]) -> InMemoryCatalog {
        let snapshot = CatalogSnapshot {
            drugs,
            prices: prices
                .iter()
                .map(|(drug_id, amount)| DrugPrice::new((*drug_id).into(), "b1".into(), *amount))
                .collect(),
            ..Default::default()
        };
        InMemoryCatalog::from_snapshot(snapshot)
    }

    #[test]
    fn test_generic_versus_brand() {
        let catalog = catalog_with(
            vec![tablet("G1", true), tablet("B1", false), tablet("B2", false)],
            &[("G1", 9.20), ("G1", 8.50), ("B1", 16.50), ("B1", 15.90), ("B2", 18.00)],
        );
        let comparator = Comparator::new(&catalog);

        let summary = comparator.calculate_savings("G1").unwrap();
        assert_eq!(summary.generic_price, Some(8.50));
        assert_eq!(summary.brand_price, Some(15.90));
        assert!((summary.savings.unwrap() - 7.40).abs() < 1e-9);
        assert_eq!(summary.savings_percentage, Some(47));

        // Same class, same answer from the brand side.
        assert_eq!(comparator.calculate_savings("B2").unwrap(), summary);
    }

    #[test]
    fn test_negative_savings_are_not_clamped() {
        let catalog = catalog_with(
            vec![tablet("G1", true), tablet("B1", false)],
            &[("G1", 12.0), ("B1", 10.0)],
        );
        let comparator = Comparator::new(&catalog);

        let summary = comparator.calculate_savings("G1").unwrap();
        assert_eq!(summary.savings, Some(-2.0));
        assert_eq!(summary.savings_percentage, Some(-20));
        assert!(!summary.has_positive_savings());
    }

    #[test]
    fn test_one_sided_class_has_no_savings() {
        let catalog = catalog_with(
            vec![tablet("G1", true), tablet("B1", false)],
            &[("G1", 8.50)],
        );
        let comparator = Comparator::new(&catalog);

        let summary = comparator.calculate_savings("G1").unwrap();
        assert_eq!(summary.generic_price, Some(8.50));
        assert_eq!(summary.brand_price, None);
        assert_eq!(summary.savings, None);
        assert_eq!(summary.savings_percentage, None);
    }

    #[test]
    fn test_free_brand_has_no_percentage() {
        let catalog = catalog_with(
            vec![tablet("G1", true), tablet("B1", false)],
            &[("G1", 1.0), ("B1", 0.0)],
        );
        let comparator = Comparator::new(&catalog);

        let summary = comparator.calculate_savings("G1").unwrap();
        assert_eq!(summary.savings, Some(-1.0));
        assert_eq!(summary.savings_percentage, None);
    }

    #[test]
    fn test_unknown_drug() {
        let catalog = catalog_with(vec![tablet("G1", true)], &[("G1", 8.50)]);
        let comparator = Comparator::new(&catalog);

        assert_eq!(
            comparator.calculate_savings("unknown-id").unwrap(),
            SavingsSummary::default()
        );
    }
}
