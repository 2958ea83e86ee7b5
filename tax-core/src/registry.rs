use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

use crate::models::{BracketTable, ContributionScheme, JurisdictionId};

/// Raised when a computation asks for a jurisdiction the registry has no
/// table for. The selectable set is closed, so this is a configuration defect
/// rather than a user error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("no bracket table registered for jurisdiction '{0}'")]
    UnknownJurisdiction(JurisdictionId),

    /// The federal code was selected where a province or territory is
    /// expected.
    #[error("'{0}' is not a provincial or territorial jurisdiction")]
    NotRegional(JurisdictionId),
}

/// Immutable mapping from [`JurisdictionId`] to its bracket table, plus the
/// contribution scheme in force for the same tax year.
///
/// Typical lifetime:
/// 1. Build with [`JurisdictionRegistry::canada_2025`] or
///    `JurisdictionRegistry::new(..).with_table(..)`.
/// 2. Hand a reference to a [`TaxEngine`](crate::TaxEngine).
/// 3. Drop it; nothing here is ever mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JurisdictionRegistry {
    tax_year: i32,
    tables: BTreeMap<JurisdictionId, BracketTable>,
    contribution: ContributionScheme,
}

impl JurisdictionRegistry {
    /// Create a registry with no bracket tables.
    pub fn new(
        tax_year: i32,
        contribution: ContributionScheme,
    ) -> Self {
        Self {
            tax_year,
            tables: BTreeMap::new(),
            contribution,
        }
    }

    /// Register a table for `id`, replacing any table already present.
    pub fn with_table(
        mut self,
        id: JurisdictionId,
        table: BracketTable,
    ) -> Self {
        self.tables.insert(id, table);
        self
    }

    /// Built-in 2025 federal, Ontario, Manitoba and Saskatchewan tables and
    /// the CPP contribution scheme.
    pub fn canada_2025() -> Self {
        let cpp = ContributionScheme::from_parts(
            "Canada Pension Plan (CPP)",
            dec!(3500),
            &[dec!(67800), dec!(9900)],
            &[dec!(0.0595), dec!(0.04)],
        );

        Self::new(2025, cpp)
            .with_table(
                JurisdictionId::Federal,
                BracketTable::from_parts(
                    &[dec!(57375), dec!(57375), dec!(63132), dec!(75532)],
                    &[dec!(0.15), dec!(0.205), dec!(0.26), dec!(0.29), dec!(0.33)],
                ),
            )
            .with_table(
                JurisdictionId::Ontario,
                BracketTable::from_parts(
                    &[dec!(52886), dec!(52889), dec!(44225), dec!(26752)],
                    &[dec!(0.0505), dec!(0.0915), dec!(0.1116), dec!(0.1216), dec!(0.1316)],
                ),
            )
            .with_table(
                JurisdictionId::Manitoba,
                BracketTable::from_parts(
                    &[dec!(47564), dec!(53636)],
                    &[dec!(0.108), dec!(0.1275), dec!(0.174)],
                ),
            )
            .with_table(
                JurisdictionId::Saskatchewan,
                BracketTable::from_parts(
                    &[dec!(53463), dec!(99287)],
                    &[dec!(0.105), dec!(0.125), dec!(0.145)],
                ),
            )
    }

    pub fn tax_year(&self) -> i32 {
        self.tax_year
    }

    pub fn contribution(&self) -> &ContributionScheme {
        &self.contribution
    }

    pub fn is_registered(
        &self,
        id: JurisdictionId,
    ) -> bool {
        self.tables.contains_key(&id)
    }

    /// Every jurisdiction with a table, in code order.
    pub fn jurisdictions(&self) -> impl Iterator<Item = JurisdictionId> + '_ {
        self.tables.keys().copied()
    }

    /// Registered provinces and territories, federal excluded.
    pub fn regional_jurisdictions(&self) -> impl Iterator<Item = JurisdictionId> + '_ {
        self.jurisdictions().filter(JurisdictionId::is_regional)
    }

    /// # Errors
    /// * [`ConfigurationError::UnknownJurisdiction`] if `id` has no table.
    pub fn brackets_for(
        &self,
        id: JurisdictionId,
    ) -> Result<&BracketTable, ConfigurationError> {
        self.tables
            .get(&id)
            .ok_or(ConfigurationError::UnknownJurisdiction(id))
    }

    /// Rates for `id`, one more than [`widths_for`](Self::widths_for).
    pub fn rates_for(
        &self,
        id: JurisdictionId,
    ) -> Result<Vec<Decimal>, ConfigurationError> {
        self.brackets_for(id).map(BracketTable::rates)
    }

    pub fn widths_for(
        &self,
        id: JurisdictionId,
    ) -> Result<Vec<Decimal>, ConfigurationError> {
        self.brackets_for(id).map(BracketTable::widths)
    }

    pub fn display_name_for(
        &self,
        id: JurisdictionId,
    ) -> Result<&'static str, ConfigurationError> {
        self.brackets_for(id).map(|_| id.display_name())
    }
}
