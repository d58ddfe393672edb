//! Property tests for distance, ranking, filtering and savings.

use farmajusta_core::catalog::{CatalogSnapshot, InMemoryCatalog};
use farmajusta_core::compare::{apply_filters, distance_km, matches_filters, Comparator};
use farmajusta_core::models::{
    Drug, DrugPrice, LocationData, PharmacyBranch, ProductType, SearchFilters, StockStatus,
};
use proptest::prelude::*;
use proptest::test_runner::Config;

const STOCK: [StockStatus; 3] = [StockStatus::InStock, StockStatus::Low, StockStatus::OutOfStock];

fn coord() -> impl Strategy<Value = (f64, f64)> {
    (-89.9_f64..89.9, -179.9_f64..179.9)
}

/// Offsets around central Lima, roughly ±15 km.
fn lima_offset() -> impl Strategy<Value = (f64, f64)> {
    (-0.15_f64..0.15, -0.15_f64..0.15)
}

fn drugs() -> Vec<Drug> {
    ["D0", "D1", "D2", "D3"]
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let mut drug = Drug::new(
                (*id).into(),
                "Paracetamol".into(),
                format!("Marca {}", i),
                "Tableta".into(),
                "500mg".into(),
                i % 2 == 0,
            );
            drug.requires_prescription = i >= 2;
            drug
        })
        .collect()
}

/// Price rows as (drug index, branch index, amount, stock index). Branch
/// index 5 points at a branch that is not in the catalog.
fn catalog(
    branch_offsets: &[(f64, f64)],
    rows: &[(usize, usize, f64, usize)],
) -> InMemoryCatalog {
    let branches = branch_offsets
        .iter()
        .enumerate()
        .map(|(i, (dlat, dlng))| {
            PharmacyBranch::new(format!("b{}", i), "p".into(), "Botica".into())
                .with_coordinates(-12.0954 + dlat, -77.0397 + dlng)
        })
        .collect();

    let prices = rows
        .iter()
        .enumerate()
        .map(|(i, (drug, branch, amount, stock))| {
            let mut price = DrugPrice::new(format!("D{}", drug), format!("b{}", branch), *amount);
            price.id = format!("p{}", i);
            price.stock_status = STOCK[*stock];
            price
        })
        .collect();

    InMemoryCatalog::from_snapshot(CatalogSnapshot {
        drugs: drugs(),
        branches,
        prices,
        ..Default::default()
    })
}

fn price_rows() -> impl Strategy<Value = Vec<(usize, usize, f64, usize)>> {
    prop::collection::vec((0usize..4, 0usize..6, 0.0_f64..60.0, 0usize..3), 0..30)
}

fn filters() -> impl Strategy<Value = SearchFilters> {
    (
        prop_oneof![
            Just(ProductType::All),
            Just(ProductType::Generic),
            Just(ProductType::Brand)
        ],
        prop::option::of((0.0_f64..30.0, 0.0_f64..30.0)),
        any::<bool>(),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(product_type, range, only_in_stock, requires_prescription)| SearchFilters {
            product_type,
            price_range: range.map(|(a, b)| (a.min(b), a.max(b))),
            only_in_stock,
            requires_prescription,
        })
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn distance_is_symmetric((lat1, lng1) in coord(), (lat2, lng2) in coord()) {
        prop_assert_eq!(
            distance_km(lat1, lng1, lat2, lng2),
            distance_km(lat2, lng2, lat1, lng1)
        );
    }

    #[test]
    fn distance_to_self_is_zero((lat, lng) in coord()) {
        prop_assert_eq!(distance_km(lat, lng, lat, lng), 0.0);
    }

    #[test]
    fn distance_is_bounded((lat1, lng1) in coord(), (lat2, lng2) in coord()) {
        let d = distance_km(lat1, lng1, lat2, lng2);
        prop_assert!(d >= 0.0);
        prop_assert!(d <= 20015.1);
    }

    #[test]
    fn distance_obeys_triangle_inequality(a in coord(), b in coord(), c in coord()) {
        let ac = distance_km(a.0, a.1, c.0, c.1);
        let ab = distance_km(a.0, a.1, b.0, b.1);
        let bc = distance_km(b.0, b.1, c.0, c.1);
        // Each distance is rounded to 0.1 km.
        prop_assert!(ac <= ab + bc + 0.15);
    }

    #[test]
    fn comparison_is_sorted_and_within_radius(
        offsets in prop::collection::vec(lima_offset(), 5),
        rows in price_rows(),
        radius in 0.0_f64..20.0,
    ) {
        let catalog = catalog(&offsets, &rows);
        let location = LocationData::new(-12.0954, -77.0397);
        let results = Comparator::new(&catalog)
            .compare_equivalents("D0", Some(&location), radius)
            .unwrap();

        for pair in results.windows(2) {
            prop_assert!(pair[0].amount() <= pair[1].amount());
        }
        for row in &results {
            let distance = row.distance.unwrap();
            prop_assert!(distance <= radius);
            prop_assert_ne!(row.branch.id.as_str(), "b5");
        }

        // Every in-radius row at a known branch is present.
        let expected = rows
            .iter()
            .filter(|(_, branch, _, _)| *branch < 5)
            .filter(|(_, branch, _, _)| {
                let (dlat, dlng) = offsets[*branch];
                distance_km(location.lat, location.lng, -12.0954 + dlat, -77.0397 + dlng) <= radius
            })
            .count();
        prop_assert_eq!(results.len(), expected);
    }

    #[test]
    fn ties_keep_catalog_order(
        offsets in prop::collection::vec(lima_offset(), 5),
        rows in prop::collection::vec((Just(0usize), 0usize..5, Just(12.3_f64), 0usize..3), 0..10),
    ) {
        let catalog = catalog(&offsets, &rows);
        let results = Comparator::new(&catalog).compare_prices("D0", None, 0.0).unwrap();

        let ids: Vec<String> = results.iter().map(|r| r.price.id.clone()).collect();
        let expected: Vec<String> = (0..rows.len()).map(|i| format!("p{}", i)).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn filters_return_ordered_subset(
        offsets in prop::collection::vec(lima_offset(), 5),
        rows in price_rows(),
        filters in filters(),
    ) {
        let catalog = catalog(&offsets, &rows);
        let results = Comparator::new(&catalog).compare_equivalents("D1", None, 0.0).unwrap();
        let filtered = apply_filters(&results, &filters);

        let expected: Vec<_> = results.iter().filter(|r| matches_filters(r, &filters)).collect();
        prop_assert_eq!(filtered.len(), expected.len());
        for (got, want) in filtered.iter().zip(expected) {
            prop_assert_eq!(got, want);
        }

        for row in &filtered {
            if filters.only_in_stock {
                prop_assert_eq!(row.price.stock_status, StockStatus::InStock);
            }
            if let Some((min, max)) = filters.price_range {
                prop_assert!(row.amount() >= min && row.amount() <= max);
            }
            if let Some(rx) = filters.requires_prescription {
                prop_assert_eq!(row.drug.requires_prescription, rx);
            }
        }
    }

    #[test]
    fn savings_come_from_real_prices(
        offsets in prop::collection::vec(lima_offset(), 5),
        rows in price_rows(),
    ) {
        let catalog = catalog(&offsets, &rows);
        let summary = Comparator::new(&catalog).calculate_savings("D2").unwrap();

        let cheapest = |generic: bool| {
            rows.iter()
                .filter(|(drug, _, _, _)| (drug % 2 == 0) == generic)
                .map(|(_, _, amount, _)| *amount)
                .min_by(f64::total_cmp)
        };

        prop_assert_eq!(summary.generic_price, cheapest(true));
        prop_assert_eq!(summary.brand_price, cheapest(false));
        prop_assert_eq!(
            summary.savings.is_some(),
            summary.generic_price.is_some() && summary.brand_price.is_some()
        );
        if let (Some(g), Some(b), Some(s)) = (summary.generic_price, summary.brand_price, summary.savings) {
            prop_assert!((s - (b - g)).abs() < 1e-9);
        }
    }
}
