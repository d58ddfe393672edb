//! Snapshot import/export and the catalog query contract.

use tracing::debug;

use super::{branches, drugs, prices, Database, DbResult};
use crate::catalog::{CatalogResult, CatalogSnapshot, CatalogSource};
use crate::models::{Drug, DrugPrice, PharmacyBranch};

/// Counts of records written by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub pharmacies: usize,
    pub drugs: usize,
    pub branches: usize,
    pub prices: usize,
}

impl Database {
    /// Upsert every record of a snapshot in a single transaction.
    ///
    /// Either the whole snapshot lands or nothing does.
    pub fn import_snapshot(&mut self, snapshot: &CatalogSnapshot) -> DbResult<ImportStats> {
        let tx = self.transaction()?;

        for pharmacy in &snapshot.pharmacies {
            branches::upsert_pharmacy(&tx, pharmacy)?;
        }
        for drug in &snapshot.drugs {
            drugs::upsert_drug(&tx, drug)?;
        }
        for branch in &snapshot.branches {
            branches::upsert_branch(&tx, branch)?;
        }
        for price in &snapshot.prices {
            prices::upsert_price(&tx, price)?;
        }

        tx.commit()?;

        let stats = ImportStats {
            pharmacies: snapshot.pharmacies.len(),
            drugs: snapshot.drugs.len(),
            branches: snapshot.branches.len(),
            prices: snapshot.prices.len(),
        };
        debug!(?stats, "snapshot imported");
        Ok(stats)
    }

    /// Read the whole catalog back as a snapshot.
    pub fn export_snapshot(&self) -> DbResult<CatalogSnapshot> {
        let mut stmt = self.conn.prepare("SELECT DISTINCT drug_id FROM drug_prices")?;
        let priced: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        let drugs = self.list_drug_rows()?;

        // Prices follow drug order, then dangling drug ids.
        let mut prices = Vec::new();
        for drug in &drugs {
            prices.extend(self.list_prices_for_drug(&drug.id)?);
        }
        for drug_id in priced.iter().filter(|id| !drugs.iter().any(|d| &d.id == *id)) {
            prices.extend(self.list_prices_for_drug(drug_id)?);
        }

        Ok(CatalogSnapshot {
            pharmacies: self.list_pharmacies()?,
            drugs,
            branches: self.list_branch_rows()?,
            prices,
        })
    }
}

impl CatalogSource for Database {
    fn drug_by_id(&self, id: &str) -> CatalogResult<Option<Drug>> {
        Ok(self.get_drug(id)?)
    }

    fn branch_by_id(&self, id: &str) -> CatalogResult<Option<PharmacyBranch>> {
        Ok(self.get_branch(id)?)
    }

    fn prices_for_drug(&self, drug_id: &str) -> CatalogResult<Vec<DrugPrice>> {
        Ok(self.list_prices_for_drug(drug_id)?)
    }

    fn list_drugs(&self) -> CatalogResult<Vec<Drug>> {
        Ok(self.list_drug_rows()?)
    }

    fn list_branches(&self) -> CatalogResult<Vec<PharmacyBranch>> {
        Ok(self.list_branch_rows()?)
    }
}
