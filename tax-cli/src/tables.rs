//! Choosing the bracket tables for a run: the built-in tables, or one tax
//! year out of a CSV file.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tax_core::JurisdictionRegistry;
use tax_data::{TaxTableLoader, TaxTableLoaderError};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum TablesError {
    /// A year was requested that the built-in tables do not cover. Another
    /// year's tables are never substituted.
    #[error("built-in tables are for {available}; pass --tables for {requested}")]
    BuiltInYear { requested: i32, available: i32 },

    #[error("cannot open table file '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no bracket tables in table file")]
    Empty,

    #[error(transparent)]
    Loader(#[from] TaxTableLoaderError),
}

/// Built-in tables, checked against the requested year if there is one.
pub fn built_in(tax_year: Option<i32>) -> Result<JurisdictionRegistry, TablesError> {
    let registry = JurisdictionRegistry::canada_2025();
    match tax_year {
        Some(requested) if requested != registry.tax_year() => Err(TablesError::BuiltInYear {
            requested,
            available: registry.tax_year(),
        }),
        _ => Ok(registry),
    }
}

/// Tables for `tax_year` out of CSV data, or for the latest year present
/// when no year is given.
pub fn from_reader<R: Read>(
    reader: R,
    tax_year: Option<i32>,
) -> Result<JurisdictionRegistry, TablesError> {
    let records = TaxTableLoader::parse(reader)?;
    let tax_year = tax_year
        .or_else(|| TaxTableLoader::tax_years(&records).last().copied())
        .ok_or(TablesError::Empty)?;

    Ok(TaxTableLoader::build(&records, tax_year)?)
}

/// Tables from `path` when given, otherwise the built-in tables.
pub fn load(
    path: Option<&Path>,
    tax_year: Option<i32>,
) -> Result<JurisdictionRegistry, TablesError> {
    let Some(path) = path else {
        return built_in(tax_year);
    };

    let file = File::open(path).map_err(|source| TablesError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let registry = from_reader(file, tax_year)?;
    info!(path = %path.display(), tax_year = registry.tax_year(), "loaded bracket tables");
    Ok(registry)
}
