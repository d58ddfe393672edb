//! FarmaJusta command-line front end.
//!
//! Usage:
//!   farmajusta search paracetamol
//!   farmajusta compare G1 --district "San Isidro" --equivalents
//!   farmajusta savings G1 --json
//!   farmajusta --db catalog.db import data/seed_catalog.json
//!   farmajusta --db catalog.db export -o snapshot.json

mod output;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use farmajusta_core::models::district_location;
use farmajusta_core::{
    apply_filters, sort_results, CatalogSnapshot, CatalogSource, Comparator, Database,
    DrugSearch, EngineConfig, InMemoryCatalog, LocationData, ProductType, SearchFilters, SortKey,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Compare medication prices across nearby pharmacies.
#[derive(Parser)]
#[command(name = "farmajusta", version, about)]
struct Cli {
    /// JSON catalog snapshot (defaults to the bundled Lima sample)
    #[arg(long, global = true, conflicts_with = "db")]
    catalog: Option<PathBuf>,

    /// SQLite catalog database
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// TOML engine configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find drugs by name, brand, laboratory or active ingredient.
    Search { query: String },
    /// List drugs interchangeable with the given one.
    Equivalents { drug_id: String },
    /// Rank offers for a drug by price.
    Compare(CompareArgs),
    /// Show generic-versus-brand savings for a drug.
    Savings { drug_id: String },
    /// List branches near a location.
    Nearby {
        #[command(flatten)]
        location: LocationArgs,
        /// Search radius in km
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Load a JSON snapshot into the SQLite catalog given by --db.
    Import { snapshot: PathBuf },
    /// Write the SQLite catalog given by --db as a JSON snapshot.
    Export {
        /// Output file (defaults to stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct LocationArgs {
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,
    /// Known Lima district, used instead of --lat/--lng
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    district: Option<String>,
}

#[derive(Args)]
struct CompareArgs {
    drug_id: String,
    #[command(flatten)]
    location: LocationArgs,
    /// Search radius in km
    #[arg(long)]
    radius: Option<f64>,
    /// Include equivalent generics and brands
    #[arg(long)]
    equivalents: bool,
    /// generico, marca or todos
    #[arg(long = "type")]
    product_type: Option<String>,
    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,
    /// Only offers currently in stock
    #[arg(long)]
    in_stock: bool,
    /// Only offers that do (true) or do not (false) require a prescription
    #[arg(long)]
    prescription: Option<bool>,
    /// price or distance
    #[arg(long)]
    sort: Option<String>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        catalog,
        db,
        config,
        json,
        command,
    } = cli;

    let config = match &config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    debug!(?config, "configuration loaded");

    let source = || open_catalog(db.as_deref(), catalog.as_deref());

    match command {
        Command::Search { query } => {
            let catalog = source()?;
            let search = DrugSearch::new(catalog.as_ref());
            let drugs = search.search(&query)?;
            if drugs.is_empty() {
                let suggestions = search.suggest(
                    &query,
                    config.search.suggestion_limit,
                    config.search.min_similarity,
                )?;
                output::suggestions(&query, &suggestions, json)?;
            } else {
                output::drugs(&drugs, json)?;
            }
        }
        Command::Equivalents { drug_id } => {
            let catalog = source()?;
            let drugs = Comparator::new(catalog.as_ref()).find_equivalents(&drug_id)?;
            output::drugs(&drugs, json)?;
        }
        Command::Compare(args) => {
            let catalog = source()?;
            compare(catalog.as_ref(), &config, args, json)?;
        }
        Command::Savings { drug_id } => {
            let catalog = source()?;
            let summary = Comparator::new(catalog.as_ref()).calculate_savings(&drug_id)?;
            output::savings(&drug_id, &summary, &config.currency, json)?;
        }
        Command::Nearby { location, radius } => {
            let Some(location) = resolve_location(&location)? else {
                bail!("nearby needs --lat/--lng or --district");
            };
            let radius = radius.unwrap_or(config.default_radius_km);
            let catalog = source()?;
            let branches =
                Comparator::new(catalog.as_ref()).branches_in_radius(&location, radius)?;
            output::branches(&branches, &location, json)?;
        }
        Command::Import { snapshot } => {
            let db_path = db
                .as_deref()
                .context("import needs a target database (--db)")?;
            import(&snapshot, db_path, json)?;
        }
        Command::Export { output } => {
            let db_path = db
                .as_deref()
                .context("export needs a source database (--db)")?;
            export(db_path, output.as_deref())?;
        }
    }

    Ok(())
}

fn compare(
    catalog: &dyn CatalogSource,
    config: &EngineConfig,
    args: CompareArgs,
    json: bool,
) -> Result<()> {
    let location = resolve_location(&args.location)?;
    let radius = args.radius.unwrap_or(config.default_radius_km);
    if radius.is_nan() || radius < 0.0 {
        bail!("--radius must be a non-negative number");
    }
    let sort = match &args.sort {
        Some(s) => SortKey::parse(s).with_context(|| format!("unknown sort key '{}'", s))?,
        None => config.default_sort,
    };
    let filters = build_filters(&args)?;

    let comparator = Comparator::new(catalog);
    let mut rows = if args.equivalents {
        comparator.compare_equivalents(&args.drug_id, location.as_ref(), radius)?
    } else {
        comparator.compare_prices(&args.drug_id, location.as_ref(), radius)?
    };

    if !filters.is_empty() {
        rows = apply_filters(&rows, &filters);
    }
    sort_results(&mut rows, sort);

    let reason = if rows.is_empty() {
        comparator.diagnose_comparison(
            &args.drug_id,
            location.as_ref(),
            radius,
            args.equivalents,
            &filters,
        )?
    } else {
        None
    };

    output::comparison(&rows, reason, json)
}

fn build_filters(args: &CompareArgs) -> Result<SearchFilters> {
    let product_type = match &args.product_type {
        Some(t) => ProductType::parse(t).with_context(|| format!("unknown product type '{}'", t))?,
        None => ProductType::All,
    };
    let price_range = match (args.min_price, args.max_price) {
        (None, None) => None,
        (min, max) => Some((min.unwrap_or(0.0), max.unwrap_or(f64::INFINITY))),
    };

    Ok(SearchFilters {
        product_type,
        price_range,
        only_in_stock: args.in_stock,
        requires_prescription: args.prescription,
    })
}

fn resolve_location(args: &LocationArgs) -> Result<Option<LocationData>> {
    if let Some(name) = &args.district {
        let location = district_location(name)
            .with_context(|| format!("unknown district '{}'", name))?;
        return Ok(Some(location));
    }

    match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => {
            let location = LocationData::new(lat, lng);
            if !location.coordinates().is_valid() {
                bail!("coordinates out of range: {}, {}", lat, lng);
            }
            Ok(Some(location))
        }
        _ => Ok(None),
    }
}

fn open_catalog(db: Option<&Path>, catalog: Option<&Path>) -> Result<Box<dyn CatalogSource>> {
    if let Some(path) = db {
        let db = Database::open(path)
            .with_context(|| format!("failed to open database '{}'", path.display()))?;
        return Ok(Box::new(db));
    }

    let catalog = match catalog {
        Some(path) => InMemoryCatalog::from_path(path)
            .with_context(|| format!("failed to load catalog '{}'", path.display()))?,
        None => InMemoryCatalog::seed()?,
    };
    Ok(Box::new(catalog))
}

fn import(snapshot: &Path, db_path: &Path, json: bool) -> Result<()> {
    let snapshot = CatalogSnapshot::from_path(snapshot)
        .with_context(|| format!("failed to load snapshot '{}'", snapshot.display()))?;
    let mut db = Database::open(db_path)
        .with_context(|| format!("failed to open database '{}'", db_path.display()))?;

    let stats = db.import_snapshot(&snapshot)?;
    output::import_stats(&stats, json)
}

fn export(db_path: &Path, output: Option<&Path>) -> Result<()> {
    let db = Database::open(db_path)
        .with_context(|| format!("failed to open database '{}'", db_path.display()))?;
    let json = db.export_snapshot()?.to_json()?;

    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write '{}'", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
