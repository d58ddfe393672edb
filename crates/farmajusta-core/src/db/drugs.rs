//! Drug table operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Drug, MedicalInfo};

const DRUG_COLUMNS: &str = "id, dci, commercial_names, pharmaceutical_form, concentration, \
     is_generic, laboratory, active_ingredient, presentation, requires_prescription, \
     is_active, medical_info";

impl Database {
    /// Insert or update a drug.
    pub fn upsert_drug(&self, drug: &Drug) -> DbResult<()> {
        upsert_drug(&self.conn, drug)
    }

    /// Get a drug by id.
    pub fn get_drug(&self, id: &str) -> DbResult<Option<Drug>> {
        let sql = format!("SELECT {DRUG_COLUMNS} FROM drugs WHERE id = ?");
        let row = self
            .conn
            .query_row(&sql, [id], DrugRow::from_row)
            .optional()?;

        row.map(Drug::try_from).transpose()
    }

    /// All drugs in insertion order.
    pub fn list_drug_rows(&self) -> DbResult<Vec<Drug>> {
        let sql = format!("SELECT {DRUG_COLUMNS} FROM drugs ORDER BY rowid");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], DrugRow::from_row)?;

        let mut drugs = Vec::new();
        for row in rows {
            drugs.push(row?.try_into()?);
        }
        Ok(drugs)
    }
}

pub(super) fn upsert_drug(conn: &Connection, drug: &Drug) -> DbResult<()> {
    let names_json = serde_json::to_string(&drug.commercial_names)?;
    let medical_json = serde_json::to_string(&drug.medical_info)?;

    conn.execute(
        r#"
        INSERT INTO drugs (
            id, dci, commercial_names, pharmaceutical_form, concentration,
            is_generic, laboratory, active_ingredient, presentation,
            requires_prescription, is_active, medical_info, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, datetime('now'))
        ON CONFLICT(id) DO UPDATE SET
            dci = excluded.dci,
            commercial_names = excluded.commercial_names,
            pharmaceutical_form = excluded.pharmaceutical_form,
            concentration = excluded.concentration,
            is_generic = excluded.is_generic,
            laboratory = excluded.laboratory,
            active_ingredient = excluded.active_ingredient,
            presentation = excluded.presentation,
            requires_prescription = excluded.requires_prescription,
            is_active = excluded.is_active,
            medical_info = excluded.medical_info,
            updated_at = datetime('now')
        "#,
        params![
            drug.id,
            drug.dci,
            names_json,
            drug.pharmaceutical_form,
            drug.concentration,
            drug.is_generic,
            drug.laboratory,
            drug.active_ingredient,
            drug.presentation,
            drug.requires_prescription,
            drug.is_active,
            medical_json,
        ],
    )?;
    Ok(())
}

/// Internal row struct for database mapping.
struct DrugRow {
    id: String,
    dci: String,
    commercial_names: String,
    pharmaceutical_form: String,
    concentration: String,
    is_generic: bool,
    laboratory: String,
    active_ingredient: String,
    presentation: String,
    requires_prescription: bool,
    is_active: bool,
    medical_info: String,
}

impl DrugRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            dci: row.get(1)?,
            commercial_names: row.get(2)?,
            pharmaceutical_form: row.get(3)?,
            concentration: row.get(4)?,
            is_generic: row.get(5)?,
            laboratory: row.get(6)?,
            active_ingredient: row.get(7)?,
            presentation: row.get(8)?,
            requires_prescription: row.get(9)?,
            is_active: row.get(10)?,
            medical_info: row.get(11)?,
        })
    }
}

impl TryFrom<DrugRow> for Drug {
    type Error = DbError;

    fn try_from(row: DrugRow) -> Result<Self, Self::Error> {
        let medical_info: MedicalInfo = serde_json::from_str(&row.medical_info)?;
        Ok(Drug {
            id: row.id,
            dci: row.dci,
            commercial_names: serde_json::from_str(&row.commercial_names)?,
            pharmaceutical_form: row.pharmaceutical_form,
            concentration: row.concentration,
            is_generic: row.is_generic,
            laboratory: row.laboratory,
            active_ingredient: row.active_ingredient,
            presentation: row.presentation,
            requires_prescription: row.requires_prescription,
            is_active: row.is_active,
            medical_info,
        })
    }
}
