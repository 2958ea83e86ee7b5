//! Integration tests for building a registry from the bundled table file and
//! running the engine against it.

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::{
    ConfigurationError, JurisdictionId, JurisdictionRegistry, TaxEngine, TaxInputs,
};
use tax_data::{TaxTableLoader, TaxTableLoaderError};

const TEST_CSV_2025: &str = include_str!("../test-data/tax_tables_2025.csv");

fn load_2025() -> JurisdictionRegistry {
    let records = TaxTableLoader::parse(TEST_CSV_2025.as_bytes()).expect("Failed to parse CSV");
    TaxTableLoader::build(&records, 2025).expect("Failed to build registry")
}

#[test]
fn test_bundled_file_matches_built_in_registry() {
    assert_eq!(load_2025(), JurisdictionRegistry::canada_2025());
}

#[test]
fn test_bundled_file_has_single_year() {
    let records = TaxTableLoader::parse(TEST_CSV_2025.as_bytes()).expect("Failed to parse CSV");

    assert_eq!(TaxTableLoader::tax_years(&records), vec![2025]);
    assert_eq!(records.len(), 18);
}

#[test]
fn test_engine_over_loaded_tables() {
    let registry = load_2025();
    let engine = TaxEngine::new(&registry);

    let breakdown = engine
        .compute(&TaxInputs::new(dec!(100000), JurisdictionId::Ontario))
        .expect("Failed to compute");

    assert_eq!(breakdown.tax_year, 2025);
    assert_eq!(breakdown.federal.total, dec!(17344.375));
    assert_eq!(breakdown.regional.total, dec!(6981.674));
    assert_eq!(breakdown.contribution.total, dec!(4430.10));
    assert_eq!(
        breakdown.summary.net,
        dec!(100000) - dec!(17344.375) - dec!(6981.674) - dec!(4430.10)
    );
}

#[test]
fn test_engine_reports_unloaded_jurisdiction() {
    let registry = load_2025();
    let engine = TaxEngine::new(&registry);

    let result = engine.compute(&TaxInputs::new(dec!(100000), JurisdictionId::BritishColumbia));

    assert_eq!(
        result,
        Err(ConfigurationError::UnknownJurisdiction(
            JurisdictionId::BritishColumbia
        ))
    );
}

#[test]
fn test_additional_year_is_built_independently() {
    let csv = format!(
        "{TEST_CSV_2025}2026,FED,60000,0.14,\n2026,FED,,0.30,\n2026,CPP,70000,0.06,3600\n"
    );
    let records = TaxTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

    assert_eq!(TaxTableLoader::tax_years(&records), vec![2025, 2026]);

    let registry = TaxTableLoader::build(&records, 2026).expect("Failed to build 2026");
    assert_eq!(registry.tax_year(), 2026);
    assert_eq!(
        registry.jurisdictions().collect::<Vec<_>>(),
        vec![JurisdictionId::Federal]
    );
    assert_eq!(registry.contribution().exemption(), dec!(3600));
    assert_eq!(registry.contribution().ceiling(), dec!(73600));
}

#[test]
fn test_missing_year_is_reported() {
    let records = TaxTableLoader::parse(TEST_CSV_2025.as_bytes()).expect("Failed to parse CSV");

    let err = TaxTableLoader::build(&records, 2024).expect_err("2024 is not in the file");

    assert!(matches!(err, TaxTableLoaderError::TaxYearNotFound(2024)));
    assert_eq!(err.to_string(), "Tax year 2024 not found in table data");
}
