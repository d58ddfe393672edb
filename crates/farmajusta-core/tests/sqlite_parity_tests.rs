//! The SQLite catalog must answer exactly like the in-memory one.

use farmajusta_core::catalog::{CatalogSnapshot, CatalogSource, InMemoryCatalog};
use farmajusta_core::compare::{Comparator, DEFAULT_RADIUS_KM};
use farmajusta_core::db::Database;
use farmajusta_core::models::{district_location, known_districts, LocationData, SearchFilters};
use farmajusta_core::search::DrugSearch;

fn file_backed_seed() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open(dir.path().join("catalog.db")).unwrap();
    db.import_snapshot(&CatalogSnapshot::seed().unwrap()).unwrap();
    (dir, db)
}

fn assert_same_answers<A, B>(a: &A, b: &B, location: Option<&LocationData>, radius: f64)
where
    A: CatalogSource + ?Sized,
    B: CatalogSource + ?Sized,
{
    let left = Comparator::new(a);
    let right = Comparator::new(b);

    for drug in a.list_drugs().unwrap() {
        let id = drug.id.as_str();
        assert_eq!(
            left.find_equivalents(id).unwrap(),
            right.find_equivalents(id).unwrap(),
            "equivalents of {}",
            id
        );
        assert_eq!(
            left.compare_prices(id, location, radius).unwrap(),
            right.compare_prices(id, location, radius).unwrap(),
            "prices of {}",
            id
        );
        assert_eq!(
            left.compare_equivalents(id, location, radius).unwrap(),
            right.compare_equivalents(id, location, radius).unwrap(),
            "equivalent prices of {}",
            id
        );
        assert_eq!(
            left.calculate_savings(id).unwrap(),
            right.calculate_savings(id).unwrap(),
            "savings of {}",
            id
        );
        assert_eq!(
            left.diagnose_empty(id, location, radius).unwrap(),
            right.diagnose_empty(id, location, radius).unwrap(),
            "diagnosis of {}",
            id
        );
        assert_eq!(
            left.diagnose_comparison(id, location, radius, false, &SearchFilters::default())
                .unwrap(),
            right
                .diagnose_comparison(id, location, radius, false, &SearchFilters::default())
                .unwrap(),
            "single-drug diagnosis of {}",
            id
        );
    }

    if let Some(location) = location {
        assert_eq!(
            left.branches_in_radius(location, radius).unwrap(),
            right.branches_in_radius(location, radius).unwrap()
        );
    }
}

#[test]
fn test_seed_parity_without_location() {
    let memory = InMemoryCatalog::seed().unwrap();
    let (_dir, db) = file_backed_seed();

    assert_same_answers(&memory, &db, None, DEFAULT_RADIUS_KM);
}

#[test]
fn test_seed_parity_across_districts() {
    let memory = InMemoryCatalog::seed().unwrap();
    let (_dir, db) = file_backed_seed();

    for name in known_districts() {
        let location = district_location(name).unwrap();
        for radius in [1.0, DEFAULT_RADIUS_KM, 12.0] {
            assert_same_answers(&memory, &db, Some(&location), radius);
        }
    }
}

#[test]
fn test_search_parity() {
    let memory = InMemoryCatalog::seed().unwrap();
    let (_dir, db) = file_backed_seed();

    for query in ["", "paracetamol", "acetaminofén", "genfar", "advil", "losartan", "zzz"] {
        assert_eq!(
            DrugSearch::new(&memory).search(query).unwrap(),
            DrugSearch::new(&db).search(query).unwrap(),
            "query {:?}",
            query
        );
    }
}

#[test]
fn test_reopened_database_keeps_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    {
        let mut db = Database::open(&path).unwrap();
        db.import_snapshot(&CatalogSnapshot::seed().unwrap()).unwrap();
    }

    let db = Database::open(&path).unwrap();
    let rows = Comparator::new(&db)
        .compare_prices("G1", None, DEFAULT_RADIUS_KM)
        .unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].price.id, "p-001");
}

#[test]
fn test_dangling_rows_are_skipped_by_both() {
    let mut snapshot = CatalogSnapshot::seed().unwrap();
    let mut ghost = snapshot.prices[0].clone();
    ghost.id = "p-ghost".into();
    ghost.branch_id = "b-closed".into();
    snapshot.prices.push(ghost);

    let memory = InMemoryCatalog::from_snapshot(snapshot.clone());
    let mut db = Database::open_in_memory().unwrap();
    db.import_snapshot(&snapshot).unwrap();

    let location = LocationData::new(-12.0954, -77.0397);
    assert_same_answers(&memory, &db, Some(&location), DEFAULT_RADIUS_KM);
    assert!(Comparator::new(&db)
        .compare_prices("G1", None, DEFAULT_RADIUS_KM)
        .unwrap()
        .iter()
        .all(|r| r.price.id != "p-ghost"));
}
