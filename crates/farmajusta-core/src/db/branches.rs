//! Pharmacy and branch table operations.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::warn;

use super::{Database, DbResult};
use crate::models::{Coordinates, Pharmacy, PharmacyBranch};

const BRANCH_COLUMNS: &str = "id, pharmacy_id, pharmacy_name, address, district, city, region, \
     lat, lng, phone, hours, is_open_24_hours, rating";

impl Database {
    /// Insert or update a pharmacy.
    pub fn upsert_pharmacy(&self, pharmacy: &Pharmacy) -> DbResult<()> {
        upsert_pharmacy(&self.conn, pharmacy)
    }

    /// All pharmacies in insertion order.
    pub fn list_pharmacies(&self) -> DbResult<Vec<Pharmacy>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, chain_name, logo FROM pharmacies ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(Pharmacy {
                id: row.get(0)?,
                name: row.get(1)?,
                chain_name: row.get(2)?,
                logo: row.get(3)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Insert or update a branch.
    pub fn upsert_branch(&self, branch: &PharmacyBranch) -> DbResult<()> {
        upsert_branch(&self.conn, branch)
    }

    /// Get a branch by id.
    pub fn get_branch(&self, id: &str) -> DbResult<Option<PharmacyBranch>> {
        let sql = format!("SELECT {BRANCH_COLUMNS} FROM pharmacy_branches WHERE id = ?");
        let row = self
            .conn
            .query_row(&sql, [id], BranchRow::from_row)
            .optional()?;

        Ok(row.map(PharmacyBranch::from))
    }

    /// All branches in insertion order.
    pub fn list_branch_rows(&self) -> DbResult<Vec<PharmacyBranch>> {
        let sql = format!("SELECT {BRANCH_COLUMNS} FROM pharmacy_branches ORDER BY rowid");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], BranchRow::from_row)?;

        let mut branches = Vec::new();
        for row in rows {
            branches.push(row?.into());
        }
        Ok(branches)
    }
}

pub(super) fn upsert_pharmacy(conn: &Connection, pharmacy: &Pharmacy) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO pharmacies (id, name, chain_name, logo)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            chain_name = excluded.chain_name,
            logo = excluded.logo
        "#,
        params![pharmacy.id, pharmacy.name, pharmacy.chain_name, pharmacy.logo],
    )?;
    Ok(())
}

pub(super) fn upsert_branch(conn: &Connection, branch: &PharmacyBranch) -> DbResult<()> {
    // Malformed coordinates are stored as unknown.
    let coords = branch.valid_coordinates();

    conn.execute(
        r#"
        INSERT INTO pharmacy_branches (
            id, pharmacy_id, pharmacy_name, address, district, city, region,
            lat, lng, phone, hours, is_open_24_hours, rating
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        ON CONFLICT(id) DO UPDATE SET
            pharmacy_id = excluded.pharmacy_id,
            pharmacy_name = excluded.pharmacy_name,
            address = excluded.address,
            district = excluded.district,
            city = excluded.city,
            region = excluded.region,
            lat = excluded.lat,
            lng = excluded.lng,
            phone = excluded.phone,
            hours = excluded.hours,
            is_open_24_hours = excluded.is_open_24_hours,
            rating = excluded.rating
        "#,
        params![
            branch.id,
            branch.pharmacy_id,
            branch.pharmacy_name,
            branch.address,
            branch.district,
            branch.city,
            branch.region,
            coords.map(|c| c.lat),
            coords.map(|c| c.lng),
            branch.phone,
            branch.hours,
            branch.is_open_24_hours,
            branch.rating,
        ],
    )?;
    Ok(())
}

struct BranchRow {
    id: String,
    pharmacy_id: String,
    pharmacy_name: String,
    address: String,
    district: String,
    city: String,
    region: String,
    lat: Option<f64>,
    lng: Option<f64>,
    phone: String,
    hours: String,
    is_open_24_hours: bool,
    rating: f64,
}

impl BranchRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            pharmacy_id: row.get(1)?,
            pharmacy_name: row.get(2)?,
            address: row.get(3)?,
            district: row.get(4)?,
            city: row.get(5)?,
            region: row.get(6)?,
            lat: row.get(7)?,
            lng: row.get(8)?,
            phone: row.get(9)?,
            hours: row.get(10)?,
            is_open_24_hours: row.get(11)?,
            rating: row.get(12)?,
        })
    }
}

impl From<BranchRow> for PharmacyBranch {
    fn from(row: BranchRow) -> Self {
        let coordinates = match (row.lat, row.lng) {
            (Some(lat), Some(lng)) => {
                let coords = Coordinates::new(lat, lng);
                if coords.is_valid() {
                    Some(coords)
                } else {
                    warn!(branch_id = %row.id, lat, lng, "ignoring malformed stored coordinates");
                    None
                }
            }
            _ => None,
        };

        PharmacyBranch {
            id: row.id,
            pharmacy_id: row.pharmacy_id,
            pharmacy_name: row.pharmacy_name,
            address: row.address,
            district: row.district,
            city: row.city,
            region: row.region,
            coordinates,
            phone: row.phone,
            hours: row.hours,
            is_open_24_hours: row.is_open_24_hours,
            rating: row.rating,
        }
    }
}
