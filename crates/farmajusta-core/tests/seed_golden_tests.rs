//! Golden tests against the bundled Lima seed catalog.

use farmajusta_core::catalog::InMemoryCatalog;
use farmajusta_core::compare::{apply_filters, sort_results, Comparator, DEFAULT_RADIUS_KM};
use farmajusta_core::models::{
    district_location, EmptyReason, LocationData, ProductType, SearchFilters, SortKey, StockStatus,
};
use farmajusta_core::search::DrugSearch;
use farmajusta_core::ComparisonResult;

fn san_isidro() -> LocationData {
    LocationData::new(-12.0954, -77.0397)
}

fn price_ids(rows: &[ComparisonResult]) -> Vec<&str> {
    rows.iter().map(|r| r.price.id.as_str()).collect()
}

#[test]
fn test_equivalents_of_paracetamol_tablet() {
    let catalog = InMemoryCatalog::seed().unwrap();
    let comparator = Comparator::new(&catalog);

    let ids: Vec<String> = comparator
        .find_equivalents("G1")
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();

    // Syrup shares the DCI but not the form.
    assert_eq!(ids, vec!["G1", "B1", "B2"]);
}

#[test]
fn test_paracetamol_savings() {
    let catalog = InMemoryCatalog::seed().unwrap();
    let summary = Comparator::new(&catalog).calculate_savings("G1").unwrap();

    assert_eq!(summary.generic_price, Some(8.50));
    assert_eq!(summary.brand_price, Some(15.90));
    assert!((summary.savings.unwrap() - 7.40).abs() < 1e-9);
    assert_eq!(summary.savings_percentage, Some(47));

    // Same class, same answer from the brand side.
    assert_eq!(Comparator::new(&catalog).calculate_savings("B1").unwrap(), summary);
}

#[test]
fn test_compare_prices_within_radius() {
    let catalog = InMemoryCatalog::seed().unwrap();
    let rows = Comparator::new(&catalog)
        .compare_prices("G1", Some(&san_isidro()), DEFAULT_RADIUS_KM)
        .unwrap();

    // Lima Centro (5.5 km) is outside the radius.
    assert_eq!(price_ids(&rows), vec!["p-001", "p-002", "p-004", "p-005"]);

    let miraflores = rows.iter().find(|r| r.price.id == "p-002").unwrap();
    assert_eq!(miraflores.distance, Some(3.1));
    assert!(rows.iter().all(|r| r.distance.unwrap() <= DEFAULT_RADIUS_KM));
}

#[test]
fn test_compare_prices_without_location() {
    let catalog = InMemoryCatalog::seed().unwrap();
    let rows = Comparator::new(&catalog)
        .compare_prices("G1", None, DEFAULT_RADIUS_KM)
        .unwrap();

    assert_eq!(price_ids(&rows), vec!["p-001", "p-003", "p-002", "p-004", "p-005"]);
    assert!(rows.iter().all(|r| r.distance.is_none()));
}

#[test]
fn test_unknown_drug_is_empty_not_error() {
    let catalog = InMemoryCatalog::seed().unwrap();
    let comparator = Comparator::new(&catalog);

    assert!(comparator
        .compare_prices("unknown-id", Some(&san_isidro()), DEFAULT_RADIUS_KM)
        .unwrap()
        .is_empty());
    assert!(comparator.find_equivalents("unknown-id").unwrap().is_empty());
    assert_eq!(
        comparator.diagnose_empty("unknown-id", None, DEFAULT_RADIUS_KM).unwrap(),
        Some(EmptyReason::UnknownDrug)
    );
}

#[test]
fn test_only_in_stock_drops_low_rows() {
    let catalog = InMemoryCatalog::seed().unwrap();
    let rows = Comparator::new(&catalog)
        .compare_prices("G1", Some(&san_isidro()), DEFAULT_RADIUS_KM)
        .unwrap();
    assert!(rows.iter().any(|r| r.price.stock_status == StockStatus::Low));

    let filters = SearchFilters {
        only_in_stock: true,
        ..Default::default()
    };
    let filtered = apply_filters(&rows, &filters);

    assert_eq!(price_ids(&filtered), vec!["p-001", "p-002", "p-004"]);
}

#[test]
fn test_equal_prices_keep_catalog_order() {
    let catalog = InMemoryCatalog::seed().unwrap();
    let rows = Comparator::new(&catalog)
        .compare_prices("G1", None, DEFAULT_RADIUS_KM)
        .unwrap();

    let tied: Vec<&str> = rows
        .iter()
        .filter(|r| r.amount() == 12.30)
        .map(|r| r.branch.id.as_str())
        .collect();
    assert_eq!(tied, vec!["b-salud-brena", "b-arcangel-miraflores"]);
}

#[test]
fn test_compare_equivalents_merges_class() {
    let catalog = InMemoryCatalog::seed().unwrap();
    let rows = Comparator::new(&catalog)
        .compare_equivalents("G1", Some(&san_isidro()), DEFAULT_RADIUS_KM)
        .unwrap();

    assert_eq!(
        price_ids(&rows),
        vec!["p-001", "p-002", "p-004", "p-005", "p-007", "p-006", "p-009"]
    );

    let brands = apply_filters(
        &rows,
        &SearchFilters {
            product_type: ProductType::Brand,
            ..Default::default()
        },
    );
    assert_eq!(price_ids(&brands), vec!["p-007", "p-006", "p-009"]);
}

#[test]
fn test_sort_by_distance() {
    let catalog = InMemoryCatalog::seed().unwrap();
    let mut rows = Comparator::new(&catalog)
        .compare_equivalents("G1", Some(&san_isidro()), DEFAULT_RADIUS_KM)
        .unwrap();

    sort_results(&mut rows, SortKey::Distance);

    // San Isidro first (generic before brand, both 0.4 km), then Arcángel.
    assert_eq!(&price_ids(&rows)[..4], &["p-001", "p-006", "p-005", "p-009"]);
}

#[test]
fn test_radius_diagnostics() {
    let catalog = InMemoryCatalog::seed().unwrap();
    let comparator = Comparator::new(&catalog);
    let la_molina = district_location("La Molina").unwrap();

    // The La Molina branch sits on the district centre; its Tylenol row
    // counts even though it is out of stock.
    assert_eq!(comparator.diagnose_empty("G1", Some(&la_molina), 1.0).unwrap(), None);

    let miraflores = district_location("Miraflores").unwrap();
    assert_eq!(
        comparator.diagnose_empty("LOS-G", Some(&miraflores), 2.0).unwrap(),
        Some(EmptyReason::NoneWithinRadius)
    );
    assert_eq!(comparator.diagnose_empty("LOS-G", None, 2.0).unwrap(), None);
}

#[test]
fn test_inactive_drug_has_no_offers() {
    let catalog = InMemoryCatalog::seed().unwrap();
    let comparator = Comparator::new(&catalog);

    // Omeprazol is inactive: it is its own lookup target but no equivalent.
    assert!(comparator.find_equivalents("OME-G").unwrap().is_empty());
    assert_eq!(
        comparator.diagnose_empty("OME-G", None, DEFAULT_RADIUS_KM).unwrap(),
        Some(EmptyReason::NoOffers)
    );
}

#[test]
fn test_nearby_branches() {
    let catalog = InMemoryCatalog::seed().unwrap();
    let ids: Vec<String> = Comparator::new(&catalog)
        .branches_in_radius(&san_isidro(), 3.05)
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();

    assert_eq!(ids, vec!["b-inka-sanisidro", "b-arcangel-miraflores"]);
}

#[test]
fn test_search_to_compare() {
    let catalog = InMemoryCatalog::seed().unwrap();
    let search = DrugSearch::new(&catalog);

    let hits = search.search("Tylenol").unwrap();
    assert!(hits.iter().any(|d| d.id == "B1"));

    let rows = Comparator::new(&catalog)
        .compare_equivalents(&hits[0].id, Some(&san_isidro()), DEFAULT_RADIUS_KM)
        .unwrap();
    assert_eq!(rows[0].price.id, "p-001");
}
