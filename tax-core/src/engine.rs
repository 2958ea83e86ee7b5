//! Full tax breakdown for one set of inputs.
//!
//! The engine is a pure function of a [`TaxInputs`] snapshot and the
//! registry it borrows. Every call recomputes every schedule from scratch;
//! nothing is cached between calls.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{JurisdictionId, JurisdictionRegistry, TaxEngine, TaxInputs};
//!
//! let registry = JurisdictionRegistry::canada_2025();
//! let engine = TaxEngine::new(&registry);
//!
//! let inputs = TaxInputs::new(dec!(100000), JurisdictionId::Ontario);
//! let breakdown = engine.compute(&inputs).unwrap();
//!
//! assert_eq!(breakdown.federal.total, dec!(17344.375));
//! assert_eq!(breakdown.contribution.total, dec!(4430.10));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::{
    BracketRange, IncomeSummary, allocate, allocate_with_exemption, contribution_label_for,
    exempt_range, label_for, total,
};
use crate::models::{AllocationResult, BracketTable, ContributionScheme, JurisdictionId};
use crate::registry::{ConfigurationError, JurisdictionRegistry};

/// One complete set of inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInputs {
    /// Employment income. Drives both tax and contributions.
    pub income: Decimal,

    /// Other taxable income. Added to `income` for tax, but not subject to
    /// contributions.
    pub supplementary_income: Decimal,

    /// Selected province or territory.
    pub jurisdiction: JurisdictionId,
}

impl TaxInputs {
    pub fn new(
        income: Decimal,
        jurisdiction: JurisdictionId,
    ) -> Self {
        Self {
            income,
            supplementary_income: Decimal::ZERO,
            jurisdiction,
        }
    }

    /// Builds inputs from raw field text, normalizing each amount with
    /// [`normalize_amount`](crate::normalize_amount).
    pub fn from_raw(
        income: &str,
        supplementary_income: &str,
        jurisdiction: JurisdictionId,
    ) -> Self {
        Self {
            income: crate::normalize_amount(income),
            supplementary_income: crate::normalize_amount(supplementary_income),
            jurisdiction,
        }
    }

    pub fn with_supplementary_income(
        mut self,
        amount: Decimal,
    ) -> Self {
        self.supplementary_income = amount;
        self
    }

    /// Income subject to federal and regional tax. Saturates at
    /// [`Decimal::MAX`].
    pub fn taxable_income(&self) -> Decimal {
        self.income.saturating_add(self.supplementary_income)
    }
}

/// Switches that change how the engine aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Whether contributions are taken off gross income when computing net.
    pub deduct_contributions: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            deduct_contributions: true,
        }
    }
}

/// One row of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BreakdownLine {
    Taxed {
        range: BracketRange,
        rate: Decimal,
        amount: Decimal,
    },
    /// Income below a contribution scheme's exemption floor.
    Exempt { range: BracketRange },
}

/// Itemized result for a single tax or contribution schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBreakdown {
    pub title: String,
    pub lines: Vec<BreakdownLine>,
    pub total: Decimal,
}

/// Everything computed for one [`TaxInputs`] snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub tax_year: i32,
    pub jurisdiction: JurisdictionId,
    pub gross_income: Decimal,
    pub federal: ScheduleBreakdown,
    pub regional: ScheduleBreakdown,
    pub contribution: ScheduleBreakdown,
    pub summary: IncomeSummary,
}

/// Computes tax breakdowns against a borrowed [`JurisdictionRegistry`].
#[derive(Debug, Clone)]
pub struct TaxEngine<'a> {
    registry: &'a JurisdictionRegistry,
    options: EngineOptions,
}

impl<'a> TaxEngine<'a> {
    pub fn new(registry: &'a JurisdictionRegistry) -> Self {
        Self {
            registry,
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(
        mut self,
        options: EngineOptions,
    ) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &'a JurisdictionRegistry {
        self.registry
    }

    /// Runs federal and regional allocation, the contribution walk, and the
    /// summary arithmetic for `inputs`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if:
    /// - `inputs.jurisdiction` is the federal code
    /// - the federal or selected regional table is not registered
    ///
    /// Tables are resolved before anything is computed, so an error never
    /// comes with a partial breakdown.
    pub fn compute(
        &self,
        inputs: &TaxInputs,
    ) -> Result<TaxBreakdown, ConfigurationError> {
        if !inputs.jurisdiction.is_regional() {
            return Err(ConfigurationError::NotRegional(inputs.jurisdiction));
        }
        let federal_table = self.registry.brackets_for(JurisdictionId::Federal)?;
        let regional_table = self.registry.brackets_for(inputs.jurisdiction)?;
        let scheme = self.registry.contribution();

        let taxable = inputs.taxable_income();
        let federal = allocate(taxable, federal_table);
        let regional = allocate(taxable, regional_table);
        let contribution = allocate_with_exemption(inputs.income, scheme);

        let summary = IncomeSummary::from_results(
            taxable,
            &federal,
            &regional,
            &contribution,
            self.options.deduct_contributions,
        );

        debug!(
            jurisdiction = %inputs.jurisdiction,
            %taxable,
            federal = %summary.federal_tax,
            regional = %summary.regional_tax,
            contributions = %summary.contributions,
            net = %summary.net,
            "computed tax breakdown"
        );

        Ok(TaxBreakdown {
            tax_year: self.registry.tax_year(),
            jurisdiction: inputs.jurisdiction,
            gross_income: taxable,
            federal: tax_schedule("Federal taxes".to_string(), federal_table, &federal),
            regional: tax_schedule(regional_title(inputs.jurisdiction), regional_table, &regional),
            contribution: contribution_schedule(scheme, &contribution),
            summary,
        })
    }
}

fn regional_title(id: JurisdictionId) -> String {
    let kind = if id.is_territory() {
        "Territorial"
    } else {
        "Provincial"
    };
    format!("{kind} taxes ({})", id.display_name())
}

/// One line per bracket of `table`; brackets the allocation never reached
/// show zero.
fn tax_schedule(
    title: String,
    table: &BracketTable,
    result: &AllocationResult,
) -> ScheduleBreakdown {
    let widths = table.widths();
    let lines = table
        .brackets()
        .iter()
        .enumerate()
        .filter_map(|(index, bracket)| {
            label_for(&widths, index).map(|range| BreakdownLine::Taxed {
                range,
                rate: bracket.rate,
                amount: result.get(index).unwrap_or(Decimal::ZERO),
            })
        })
        .collect();

    ScheduleBreakdown {
        title,
        lines,
        total: total(result),
    }
}

fn contribution_schedule(
    scheme: &ContributionScheme,
    result: &AllocationResult,
) -> ScheduleBreakdown {
    let exempt = BreakdownLine::Exempt {
        range: exempt_range(scheme),
    };
    let taxed = scheme
        .brackets()
        .iter()
        .enumerate()
        .filter_map(|(index, bracket)| {
            contribution_label_for(scheme, index).map(|range| BreakdownLine::Taxed {
                range,
                rate: bracket.rate,
                amount: result.get(index).unwrap_or(Decimal::ZERO),
            })
        });

    ScheduleBreakdown {
        title: scheme.name().to_string(),
        lines: std::iter::once(exempt).chain(taxed).collect(),
        total: total(result),
    }
}
