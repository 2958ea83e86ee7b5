//! Totals, net income and monthly equivalents.
//!
//! Nothing in here rounds. Values keep full decimal precision and are only
//! rounded to cents when displayed.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::AllocationResult;

pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Sum of every per-bracket amount.
pub fn total(result: &AllocationResult) -> Decimal {
    result.iter().sum()
}

/// `gross` less the totals of every result. Saturates instead of
/// overflowing.
pub fn net_income<'a, I>(
    gross: Decimal,
    results: I,
) -> Decimal
where
    I: IntoIterator<Item = &'a AllocationResult>,
{
    results
        .into_iter()
        .fold(gross, |net, r| net.saturating_sub(total(r)))
}

/// Monthly equivalent of an annual amount.
pub fn monthly(annual: Decimal) -> Decimal {
    annual / MONTHS_PER_YEAR
}

/// Headline figures for one computation.
///
/// `net` is `gross` less federal and regional tax, and less contributions
/// when `contributions_deducted` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSummary {
    pub gross: Decimal,
    pub federal_tax: Decimal,
    pub regional_tax: Decimal,
    pub contributions: Decimal,
    pub contributions_deducted: bool,
    pub net: Decimal,
}

impl IncomeSummary {
    /// Builds a summary from already-computed totals, deriving `net`.
    pub fn new(
        gross: Decimal,
        federal_tax: Decimal,
        regional_tax: Decimal,
        contributions: Decimal,
        contributions_deducted: bool,
    ) -> Self {
        let mut summary = Self {
            gross,
            federal_tax,
            regional_tax,
            contributions,
            contributions_deducted,
            net: Decimal::ZERO,
        };
        summary.net = summary.gross.saturating_sub(summary.deductions());
        summary
    }

    /// Builds a summary straight from allocation results.
    pub fn from_results(
        gross: Decimal,
        federal: &AllocationResult,
        regional: &AllocationResult,
        contribution: &AllocationResult,
        contributions_deducted: bool,
    ) -> Self {
        Self::new(
            gross,
            total(federal),
            total(regional),
            total(contribution),
            contributions_deducted,
        )
    }

    /// Everything taken off `gross` to reach `net`. Saturates at
    /// [`Decimal::MAX`].
    pub fn deductions(&self) -> Decimal {
        let contributions = if self.contributions_deducted {
            self.contributions
        } else {
            Decimal::ZERO
        };
        self.federal_tax
            .saturating_add(self.regional_tax)
            .saturating_add(contributions)
    }

    /// Monthly equivalent of every figure.
    ///
    /// Each component is divided by twelve on its own and the monthly net is
    /// derived from those quotients, so `net == gross - deductions()` holds
    /// exactly on the monthly summary as well.
    pub fn monthly(&self) -> Self {
        Self::new(
            monthly(self.gross),
            monthly(self.federal_tax),
            monthly(self.regional_tax),
            monthly(self.contributions),
            self.contributions_deducted,
        )
    }
}
