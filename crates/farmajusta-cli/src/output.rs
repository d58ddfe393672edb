//! Table and JSON rendering for CLI results.

use anyhow::Result;
use serde::Serialize;

use farmajusta_core::db::ImportStats;
use farmajusta_core::models::nearest_district;
use farmajusta_core::{
    distance_km, ComparisonResult, Drug, EmptyReason, LocationData, PharmacyBranch,
    SavingsSummary, Suggestion,
};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn kind(drug: &Drug) -> &'static str {
    if drug.is_generic {
        "generic"
    } else {
        "brand"
    }
}

pub fn drugs(drugs: &[Drug], json: bool) -> Result<()> {
    if json {
        return print_json(drugs);
    }
    if drugs.is_empty() {
        println!("No drugs found.");
        return Ok(());
    }

    println!(
        "{:<10} {:<24} {:<14} {:<12} {:<8} {}",
        "ID", "NAME", "DCI", "STRENGTH", "TYPE", "Rx"
    );
    for drug in drugs {
        println!(
            "{:<10} {:<24} {:<14} {:<12} {:<8} {}",
            drug.id,
            drug.display_name(),
            drug.dci,
            drug.concentration,
            kind(drug),
            if drug.requires_prescription { "yes" } else { "" }
        );
    }
    Ok(())
}

pub fn suggestions(query: &str, suggestions: &[Suggestion], json: bool) -> Result<()> {
    if json {
        return print_json(suggestions);
    }
    if suggestions.is_empty() {
        println!("No drugs match '{}'.", query);
        return Ok(());
    }

    println!("No drugs match '{}'. Did you mean:", query);
    for s in suggestions {
        println!("  {:<24} ({}, score {:.2})", s.matched_name, s.drug.id, s.score);
    }
    Ok(())
}

#[derive(Serialize)]
struct ComparisonOutput<'a> {
    results: &'a [ComparisonResult],
    #[serde(skip_serializing_if = "Option::is_none")]
    empty_reason: Option<EmptyReason>,
}

pub fn comparison(rows: &[ComparisonResult], reason: Option<EmptyReason>, json: bool) -> Result<()> {
    if json {
        return print_json(&ComparisonOutput {
            results: rows,
            empty_reason: reason,
        });
    }
    if rows.is_empty() {
        let message = match reason {
            Some(EmptyReason::UnknownDrug) => "Unknown drug.",
            Some(EmptyReason::NoOffers) => "No pharmacy lists this drug or an equivalent.",
            Some(EmptyReason::NoneWithinRadius) => "No offers inside the search radius.",
            Some(EmptyReason::FilteredOut) => "No offers match the filters.",
            None => "No offers found.",
        };
        println!("{}", message);
        return Ok(());
    }

    println!(
        "{:<8} {:<24} {:<8} {:<22} {:>9} {:>8}  {}",
        "PRICE", "DRUG", "TYPE", "PHARMACY", "DIST(km)", "", "STOCK"
    );
    for row in rows {
        let distance = row
            .distance
            .map(|d| format!("{:.1}", d))
            .unwrap_or_else(|| "-".to_string());
        let pharmacy = format!("{} {}", row.branch.pharmacy_name, row.branch.district);
        println!(
            "{:<8} {:<24} {:<8} {:<22} {:>9} {:>8}  {}",
            format!("{:.2}", row.amount()),
            row.drug.display_name(),
            kind(&row.drug),
            pharmacy.trim(),
            distance,
            row.price.currency,
            row.price.stock_status.as_str()
        );
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SavingsOutput<'a> {
    drug_id: &'a str,
    #[serde(flatten)]
    summary: &'a SavingsSummary,
}

pub fn savings(drug_id: &str, summary: &SavingsSummary, currency: &str, json: bool) -> Result<()> {
    if json {
        return print_json(&SavingsOutput { drug_id, summary });
    }

    let money = |v: Option<f64>| {
        v.map(|v| format!("{} {:.2}", currency, v))
            .unwrap_or_else(|| "-".to_string())
    };
    println!("Cheapest generic: {}", money(summary.generic_price));
    println!("Cheapest brand:   {}", money(summary.brand_price));
    match (summary.savings, summary.savings_percentage) {
        (Some(savings), Some(pct)) => println!("Savings:          {} ({}%)", money(Some(savings)), pct),
        (Some(savings), None) => println!("Savings:          {}", money(Some(savings))),
        _ => println!("Savings:          not available"),
    }
    Ok(())
}

#[derive(Serialize)]
struct BranchOutput<'a> {
    #[serde(flatten)]
    branch: &'a PharmacyBranch,
    distance: f64,
}

pub fn branches(branches: &[PharmacyBranch], location: &LocationData, json: bool) -> Result<()> {
    let with_distance: Vec<BranchOutput<'_>> = branches
        .iter()
        .filter_map(|branch| {
            let c = branch.valid_coordinates()?;
            Some(BranchOutput {
                branch,
                distance: distance_km(location.lat, location.lng, c.lat, c.lng),
            })
        })
        .collect();

    if json {
        return print_json(&with_distance);
    }

    let near = location
        .district
        .clone()
        .unwrap_or_else(|| nearest_district(location.lat, location.lng).to_string());
    if with_distance.is_empty() {
        println!("No branches near {}.", near);
        return Ok(());
    }

    println!("Branches near {}:", near);
    for entry in &with_distance {
        println!(
            "  {:<20} {:<16} {:>6.1} km  {}",
            entry.branch.pharmacy_name,
            entry.branch.district,
            entry.distance,
            if entry.branch.is_open_24_hours { "24h" } else { "" }
        );
    }
    Ok(())
}

pub fn import_stats(stats: &ImportStats, json: bool) -> Result<()> {
    if json {
        return print_json(&serde_json::json!({
            "pharmacies": stats.pharmacies,
            "drugs": stats.drugs,
            "branches": stats.branches,
            "prices": stats.prices,
        }));
    }

    println!(
        "Imported {} pharmacies, {} drugs, {} branches, {} prices.",
        stats.pharmacies, stats.drugs, stats.branches, stats.prices
    );
    Ok(())
}
