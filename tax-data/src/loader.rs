use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{
    BracketTable, BracketTableError, ContributionScheme, JurisdictionId, JurisdictionRegistry,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Scheme code used for contribution rows.
pub const CONTRIBUTION_SCHEME_CODE: &str = "CPP";

const CONTRIBUTION_SCHEME_NAME: &str = "Canada Pension Plan (CPP)";

/// Errors that can occur when loading bracket tables.
#[derive(Debug, Error)]
pub enum TaxTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Unknown scheme '{0}'")]
    UnknownScheme(String),

    #[error("Tax year {0} not found in table data")]
    TaxYearNotFound(i32),

    #[error("No federal table for tax year {0}")]
    MissingFederalTable(i32),

    #[error("No contribution scheme for tax year {0}")]
    MissingContributionScheme(i32),

    #[error("Scheme '{scheme}': only the last bracket may be unbounded (row {row})")]
    MisplacedUnboundedBracket { scheme: String, row: usize },

    #[error("Scheme '{0}': last bracket must have an empty width")]
    MissingUnboundedBracket(String),

    #[error("Contribution brackets must all have a width (row {0})")]
    UnboundedContributionBracket(usize),

    #[error("Contribution rows must carry an exemption")]
    MissingExemption,

    #[error("Contribution exemption changes from {expected} to {found}")]
    InconsistentExemption { expected: Decimal, found: Decimal },

    #[error("Scheme '{scheme}' is invalid: {source}")]
    InvalidTable {
        scheme: String,
        #[source]
        source: BracketTableError,
    },
}

impl From<csv::Error> for TaxTableLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the bracket table CSV file.
///
/// - `tax_year`: The tax year (e.g., 2025)
/// - `scheme`: A jurisdiction code (`FED`, `ON`, ...) or `CPP`
/// - `width`: Width of the bracket (empty for the unbounded top bracket)
/// - `rate`: The marginal rate as a decimal (e.g., 0.15 for 15%)
/// - `exemption`: Exemption floor, `CPP` rows only
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxTableRecord {
    pub tax_year: i32,
    pub scheme: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub width: Option<Decimal>,
    pub rate: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub exemption: Option<Decimal>,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

enum Scheme {
    Jurisdiction(JurisdictionId),
    Contribution,
}

fn parse_scheme(code: &str) -> Result<Scheme, TaxTableLoaderError> {
    if code.trim().eq_ignore_ascii_case(CONTRIBUTION_SCHEME_CODE) {
        return Ok(Scheme::Contribution);
    }
    JurisdictionId::parse(code)
        .map(Scheme::Jurisdiction)
        .ok_or_else(|| TaxTableLoaderError::UnknownScheme(code.to_string()))
}

/// Loader for bracket tables from CSV files.
///
/// Rows are grouped by scheme in file order, so each scheme's rows must
/// already be in bracket order.
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parse table records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxTableRecord>, TaxTableLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxTableRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Distinct tax years present in `records`, ascending.
    pub fn tax_years(records: &[TaxTableRecord]) -> Vec<i32> {
        records
            .iter()
            .map(|r| r.tax_year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Build a registry from the rows for `tax_year`.
    ///
    /// Every table goes through the same validation as
    /// [`BracketTable::new`] and [`ContributionScheme::new`], so a registry
    /// built here is as trustworthy as the built-in one.
    pub fn build(
        records: &[TaxTableRecord],
        tax_year: i32,
    ) -> Result<JurisdictionRegistry, TaxTableLoaderError> {
        let mut tables: BTreeMap<JurisdictionId, Vec<&TaxTableRecord>> = BTreeMap::new();
        let mut contribution_rows = Vec::new();

        for record in records.iter().filter(|r| r.tax_year == tax_year) {
            match parse_scheme(&record.scheme)? {
                Scheme::Jurisdiction(id) => tables.entry(id).or_default().push(record),
                Scheme::Contribution => contribution_rows.push(record),
            }
        }

        if tables.is_empty() && contribution_rows.is_empty() {
            return Err(TaxTableLoaderError::TaxYearNotFound(tax_year));
        }
        if !tables.contains_key(&JurisdictionId::Federal) {
            return Err(TaxTableLoaderError::MissingFederalTable(tax_year));
        }
        if contribution_rows.is_empty() {
            return Err(TaxTableLoaderError::MissingContributionScheme(tax_year));
        }

        let contribution = build_contribution_scheme(&contribution_rows)?;
        let mut registry = JurisdictionRegistry::new(tax_year, contribution);

        for (id, rows) in tables {
            let table = build_bracket_table(id, &rows)?;
            debug!(jurisdiction = %id, brackets = table.len(), "loaded bracket table");
            registry = registry.with_table(id, table);
        }

        Ok(registry)
    }
}

fn build_bracket_table(
    id: JurisdictionId,
    rows: &[&TaxTableRecord],
) -> Result<BracketTable, TaxTableLoaderError> {
    let scheme = id.as_str().to_string();
    let Some((last, bounded)) = rows.split_last() else {
        return Err(TaxTableLoaderError::InvalidTable {
            scheme,
            source: BracketTableError::Empty,
        });
    };
    if last.width.is_some() {
        return Err(TaxTableLoaderError::MissingUnboundedBracket(scheme));
    }

    let mut widths = Vec::with_capacity(bounded.len());
    for (row, record) in bounded.iter().enumerate() {
        match record.width {
            Some(width) => widths.push(width),
            None => {
                return Err(TaxTableLoaderError::MisplacedUnboundedBracket { scheme, row });
            }
        }
    }
    if rows.iter().any(|r| r.exemption.is_some()) {
        warn!(scheme = %id, "ignoring exemption on jurisdiction rows");
    }
    let rates: Vec<Decimal> = rows.iter().map(|r| r.rate).collect();

    BracketTable::new(&widths, &rates)
        .map_err(|source| TaxTableLoaderError::InvalidTable { scheme, source })
}

fn build_contribution_scheme(
    rows: &[&TaxTableRecord]
) -> Result<ContributionScheme, TaxTableLoaderError> {
    let exemption = rows
        .first()
        .and_then(|r| r.exemption)
        .ok_or(TaxTableLoaderError::MissingExemption)?;

    let mut widths = Vec::with_capacity(rows.len());
    let mut rates = Vec::with_capacity(rows.len());
    for (row, record) in rows.iter().enumerate() {
        let width = record
            .width
            .ok_or(TaxTableLoaderError::UnboundedContributionBracket(row))?;
        match record.exemption {
            Some(found) if found != exemption => {
                return Err(TaxTableLoaderError::InconsistentExemption {
                    expected: exemption,
                    found,
                });
            }
            Some(_) => {}
            None => return Err(TaxTableLoaderError::MissingExemption),
        }
        widths.push(width);
        rates.push(record.rate);
    }

    ContributionScheme::new(CONTRIBUTION_SCHEME_NAME, exemption, &widths, &rates).map_err(
        |source| TaxTableLoaderError::InvalidTable {
            scheme: CONTRIBUTION_SCHEME_CODE.to_string(),
            source,
        },
    )
}
