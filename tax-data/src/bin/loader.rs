use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tax_core::calculations::{contribution_label_for, exempt_range, format_rate, label_for};
use tax_data::TaxTableLoader;

/// Check a bracket table CSV file and print the tables it defines.
///
/// The CSV file should have the following columns:
/// - tax_year: The tax year (e.g., 2025)
/// - scheme: A jurisdiction code (FED, ON, MB, ...) or CPP
/// - width: Width of the bracket (empty for the unbounded top bracket)
/// - rate: The marginal rate as a decimal (e.g., 0.15)
/// - exemption: Exemption floor, CPP rows only
#[derive(Parser, Debug)]
#[command(name = "tax-table-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing bracket table data
    #[arg(short, long)]
    file: PathBuf,

    /// Tax year to build (defaults to the latest year in the file)
    #[arg(short, long)]
    year: Option<i32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Loading bracket tables from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = TaxTableLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let years = TaxTableLoader::tax_years(&records);
    let Some(tax_year) = args.year.or_else(|| years.last().copied()) else {
        bail!("No records in {}", args.file.display());
    };

    let registry = TaxTableLoader::build(&records, tax_year)
        .with_context(|| format!("Failed to build tables for tax year {tax_year}"))?;

    for id in registry.jurisdictions() {
        let table = registry
            .brackets_for(id)
            .with_context(|| format!("Table for {id} disappeared"))?;
        let widths = table.widths();
        println!("\n{} ({id})", id.display_name());
        for (index, bracket) in table.brackets().iter().enumerate() {
            if let Some(range) = label_for(&widths, index) {
                println!("  {:<32} @ {}", range.to_string(), format_rate(bracket.rate));
            }
        }
    }

    let scheme = registry.contribution();
    println!("\n{}", scheme.name());
    println!("  {:<32} exempt", exempt_range(scheme).to_string());
    for (index, bracket) in scheme.brackets().iter().enumerate() {
        if let Some(range) = contribution_label_for(scheme, index) {
            println!("  {:<32} @ {}", range.to_string(), format_rate(bracket.rate));
        }
    }

    println!(
        "\nTax year {} OK: {} jurisdiction tables.",
        tax_year,
        registry.jurisdictions().count()
    );

    Ok(())
}
