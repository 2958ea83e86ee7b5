//! End-to-end: table file, settings, engine and report together.

use std::path::Path;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_cli::config::{FileConfig, Overrides, Settings};
use tax_cli::report::{render_json, render_text};
use tax_core::{
    ConfigurationError, EngineOptions, JurisdictionId, JurisdictionRegistry, TaxEngine,
    TaxInputs,
};
use tax_data::TaxTableLoader;

const TABLES_2025: &str = include_str!("../../tax-data/test-data/tax_tables_2025.csv");

fn registry() -> JurisdictionRegistry {
    let records = TaxTableLoader::parse(TABLES_2025.as_bytes()).expect("Failed to parse CSV");
    TaxTableLoader::build(&records, 2025).expect("Failed to build registry")
}

fn settings(config: &str) -> Settings {
    let file = FileConfig::from_toml_str(config, Path::new("tax-calc.toml"))
        .expect("Failed to parse config");
    Settings::resolve(file, Overrides::default()).expect("Failed to resolve settings")
}

#[test]
fn test_manitoba_report_from_config() {
    let settings = settings("jurisdiction = \"MB\"\nmonthly = true\n");
    let registry = registry();
    let engine = TaxEngine::new(&registry).with_options(EngineOptions {
        deduct_contributions: settings.deduct_contributions,
    });

    let breakdown = engine
        .compute(&TaxInputs::from_raw("60,000", "", settings.jurisdiction))
        .expect("Failed to compute");
    let text = render_text(&breakdown, settings.monthly);

    assert!(text.starts_with("Manitoba (MB), tax year 2025\n"));
    assert!(text.contains("Provincial taxes (Manitoba)"));
    assert!(text.contains("before $47,564.00"));
    assert!(text.contains("$47,564.00 \u{2013} $101,200.00"));
    assert!(text.contains("over $101,200.00"));
    assert!(text.contains("\nMonthly\n"));
}

#[test]
fn test_saskatchewan_totals() {
    let registry = registry();
    let engine = TaxEngine::new(&registry);

    let breakdown = engine
        .compute(&TaxInputs::new(dec!(200000), JurisdictionId::Saskatchewan))
        .expect("Failed to compute");

    // 53463 * 0.105 + 99287 * 0.125 + (200000 - 152750) * 0.145
    assert_eq!(breakdown.regional.total, dec!(5613.615) + dec!(12410.875) + dec!(6851.25));
    assert_eq!(breakdown.contribution.total, dec!(4430.10));
}

#[test]
fn test_json_matches_text_figures() {
    let registry = registry();
    let engine = TaxEngine::new(&registry);
    let breakdown = engine
        .compute(&TaxInputs::new(dec!(100000), JurisdictionId::Ontario))
        .expect("Failed to compute");

    let json = render_json(&breakdown, true).expect("Failed to render JSON");
    let value: serde_json::Value = serde_json::from_str(&json).expect("Invalid JSON");

    assert_eq!(value["jurisdiction"], "ON");
    assert_eq!(value["federal"]["title"], "Federal taxes");
    assert_eq!(value["federal"]["lines"].as_array().map(Vec::len), Some(5));
    assert_eq!(value["contribution"]["lines"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["summary"]["contributions_deducted"], true);
    assert!(value["monthly"].is_object());
}

#[test]
fn test_unregistered_jurisdiction_produces_no_report() {
    let settings = settings("jurisdiction = \"BC\"");
    let registry = registry();
    let engine = TaxEngine::new(&registry);

    let result = engine.compute(&TaxInputs::new(dec!(100000), settings.jurisdiction));

    assert_eq!(
        result.map(|b| render_text(&b, false)),
        Err(ConfigurationError::UnknownJurisdiction(
            JurisdictionId::BritishColumbia
        ))
    );
}
