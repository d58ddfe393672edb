//! SQLite schema definition.

/// Complete database schema for the price catalog.
///
/// Price rows carry no foreign keys: the catalog is fed from surveys and
/// pharmacy APIs that may reference branches or drugs not yet imported, and
/// readers skip such rows.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Pharmacies
-- ============================================================================

CREATE TABLE IF NOT EXISTS pharmacies (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    chain_name TEXT,
    logo TEXT
);

-- ============================================================================
-- Drugs
-- ============================================================================

CREATE TABLE IF NOT EXISTS drugs (
    id TEXT PRIMARY KEY,
    dci TEXT NOT NULL,
    commercial_names TEXT NOT NULL DEFAULT '[]',  -- JSON array of strings
    pharmaceutical_form TEXT NOT NULL,
    concentration TEXT NOT NULL,
    is_generic INTEGER NOT NULL,
    laboratory TEXT NOT NULL DEFAULT '',
    active_ingredient TEXT NOT NULL DEFAULT '',
    presentation TEXT NOT NULL DEFAULT '',
    requires_prescription INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    medical_info TEXT NOT NULL DEFAULT '{}',      -- JSON object, display only
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Equivalence class lookups
CREATE INDEX IF NOT EXISTS idx_drugs_equivalence
    ON drugs(dci, pharmaceutical_form, concentration);

-- ============================================================================
-- Pharmacy Branches
-- ============================================================================

CREATE TABLE IF NOT EXISTS pharmacy_branches (
    id TEXT PRIMARY KEY,
    pharmacy_id TEXT NOT NULL,
    pharmacy_name TEXT NOT NULL,
    address TEXT NOT NULL DEFAULT '',
    district TEXT NOT NULL DEFAULT '',
    city TEXT NOT NULL DEFAULT '',
    region TEXT NOT NULL DEFAULT '',
    lat REAL,                                     -- NULL when unknown
    lng REAL,
    phone TEXT NOT NULL DEFAULT '',
    hours TEXT NOT NULL DEFAULT '',
    is_open_24_hours INTEGER NOT NULL DEFAULT 0,
    rating REAL NOT NULL DEFAULT 0,
    CHECK ((lat IS NULL) = (lng IS NULL))
);

CREATE INDEX IF NOT EXISTS idx_branches_pharmacy ON pharmacy_branches(pharmacy_id);

-- ============================================================================
-- Drug Prices
-- ============================================================================

CREATE TABLE IF NOT EXISTS drug_prices (
    id TEXT PRIMARY KEY,
    drug_id TEXT NOT NULL,
    branch_id TEXT NOT NULL,
    price REAL NOT NULL CHECK (price >= 0),
    currency TEXT NOT NULL DEFAULT 'PEN',
    stock_status TEXT NOT NULL CHECK (stock_status IN ('IN_STOCK', 'LOW', 'OUT_OF_STOCK')),
    stock_quantity INTEGER,
    source TEXT NOT NULL CHECK (source IN ('SNIP', 'PHARMACY_API', 'MANUAL')),
    last_updated TEXT NOT NULL                    -- RFC 3339, UTC
);

CREATE INDEX IF NOT EXISTS idx_prices_drug ON drug_prices(drug_id);
CREATE INDEX IF NOT EXISTS idx_prices_branch ON drug_prices(branch_id);
"#;
