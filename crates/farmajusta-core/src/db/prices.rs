//! Price table operations.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use super::{Database, DbError, DbResult};
use crate::models::{DrugPrice, PriceSource, StockStatus};

impl Database {
    /// Insert or update a price row.
    pub fn upsert_price(&self, price: &DrugPrice) -> DbResult<()> {
        upsert_price(&self.conn, price)
    }

    /// All price rows for a drug in insertion order.
    pub fn list_prices_for_drug(&self, drug_id: &str) -> DbResult<Vec<DrugPrice>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, drug_id, branch_id, price, currency, stock_status,
                   stock_quantity, source, last_updated
            FROM drug_prices
            WHERE drug_id = ?
            ORDER BY rowid
            "#,
        )?;
        let rows = stmt.query_map([drug_id], PriceRow::from_row)?;

        let mut prices = Vec::new();
        for row in rows {
            prices.push(row?.try_into()?);
        }
        Ok(prices)
    }

    /// Total number of price rows.
    pub fn count_prices(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM drug_prices", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

pub(super) fn upsert_price(conn: &Connection, price: &DrugPrice) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO drug_prices (
            id, drug_id, branch_id, price, currency, stock_status,
            stock_quantity, source, last_updated
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(id) DO UPDATE SET
            drug_id = excluded.drug_id,
            branch_id = excluded.branch_id,
            price = excluded.price,
            currency = excluded.currency,
            stock_status = excluded.stock_status,
            stock_quantity = excluded.stock_quantity,
            source = excluded.source,
            last_updated = excluded.last_updated
        "#,
        params![
            price.id,
            price.drug_id,
            price.branch_id,
            price.price,
            price.currency,
            price.stock_status.as_str(),
            price.stock_quantity,
            price.source.as_str(),
            price.last_updated.to_rfc3339(),
        ],
    )?;
    Ok(())
}

struct PriceRow {
    id: String,
    drug_id: String,
    branch_id: String,
    price: f64,
    currency: String,
    stock_status: String,
    stock_quantity: Option<u32>,
    source: String,
    last_updated: String,
}

impl PriceRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            drug_id: row.get(1)?,
            branch_id: row.get(2)?,
            price: row.get(3)?,
            currency: row.get(4)?,
            stock_status: row.get(5)?,
            stock_quantity: row.get(6)?,
            source: row.get(7)?,
            last_updated: row.get(8)?,
        })
    }
}

impl TryFrom<PriceRow> for DrugPrice {
    type Error = DbError;

    fn try_from(row: PriceRow) -> Result<Self, Self::Error> {
        let stock_status = StockStatus::parse(&row.stock_status).ok_or_else(|| {
            DbError::InvalidValue(format!("unknown stock status '{}'", row.stock_status))
        })?;
        let source = PriceSource::parse(&row.source)
            .ok_or_else(|| DbError::InvalidValue(format!("unknown price source '{}'", row.source)))?;
        let last_updated = DateTime::parse_from_rfc3339(&row.last_updated)
            .map_err(|e| {
                DbError::InvalidValue(format!("bad timestamp '{}': {}", row.last_updated, e))
            })?
            .with_timezone(&Utc);

        Ok(DrugPrice {
            id: row.id,
            drug_id: row.drug_id,
            branch_id: row.branch_id,
            price: row.price,
            currency: row.currency,
            stock_status,
            stock_quantity: row.stock_quantity,
            source,
            last_updated,
        })
    }
}
