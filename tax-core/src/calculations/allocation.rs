//! Bracket allocation.
//!
//! Two algorithms share one bracket walk:
//!
//! | Algorithm | Stops early | Top bracket | Result length |
//! |-----------|-------------|-------------|---------------|
//! | [`allocate`] (progressive tax) | yes, once the amount is used up | unbounded | brackets engaged |
//! | [`allocate_with_exemption`] (capped contribution) | no, pads with zero | none, capped at the ceiling | every bracket |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::JurisdictionRegistry;
//! use tax_core::JurisdictionId;
//! use tax_core::calculations::{allocate, allocate_with_exemption};
//!
//! let registry = JurisdictionRegistry::canada_2025();
//! let federal = registry.brackets_for(JurisdictionId::Federal).unwrap();
//!
//! let tax = allocate(dec!(100000), federal);
//! assert_eq!(tax.amounts(), &[dec!(8606.25), dec!(8738.125)]);
//!
//! let cpp = allocate_with_exemption(dec!(50000), registry.contribution());
//! assert_eq!(cpp.amounts(), &[dec!(2766.75), dec!(0)]);
//! ```

use rust_decimal::Decimal;

use crate::models::{
    AllocationResult, BracketTable, BracketTableError, ContributionResult, ContributionScheme,
};

/// How the walk treats brackets it reaches after the amount is used up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkMode {
    /// Stop and report only the brackets engaged so far.
    Progressive,
    /// Keep going and report zero for every remaining bracket.
    Capped,
}

/// Walks `steps` in order, taxing the slice of `base` that falls inside each
/// bracket. A `None` width absorbs everything that is left.
fn walk<I>(
    base: Decimal,
    steps: I,
    mode: WalkMode,
) -> Vec<Decimal>
where
    I: IntoIterator<Item = (Option<Decimal>, Decimal)>,
{
    let mut remaining = base;
    let mut amounts = Vec::new();

    for (width, rate) in steps {
        if remaining <= Decimal::ZERO {
            match mode {
                WalkMode::Progressive => break,
                WalkMode::Capped => {
                    amounts.push(Decimal::ZERO);
                    continue;
                }
            }
        }

        match width {
            Some(width) => {
                amounts.push(width.min(remaining) * rate);
                remaining -= width;
            }
            None => {
                amounts.push(remaining * rate);
                remaining = Decimal::ZERO;
            }
        }
    }

    amounts
}

/// Splits `amount` across a progressive table.
///
/// The result has one entry per bracket engaged. An amount of zero gives an
/// empty result, and an amount that lands exactly on a bracket boundary does
/// not touch the following bracket.
pub fn allocate(
    amount: Decimal,
    table: &BracketTable,
) -> AllocationResult {
    let steps = table.brackets().iter().map(|b| (b.width, b.rate));
    let amounts = walk(amount, steps, WalkMode::Progressive);

    tracing::trace!(%amount, brackets = amounts.len(), "progressive allocation");
    AllocationResult::new(amounts)
}

/// [`allocate`] over raw widths and rates.
///
/// # Errors
///
/// Returns [`BracketTableError`] if the widths and rates do not form a valid
/// [`BracketTable`].
pub fn allocate_parts(
    amount: Decimal,
    widths: &[Decimal],
    rates: &[Decimal],
) -> Result<AllocationResult, BracketTableError> {
    let table = BracketTable::new(widths, rates)?;
    Ok(allocate(amount, &table))
}

/// Splits `amount` across a capped contribution scheme.
///
/// The exemption is taken off first, so an amount below it leaves a negative
/// base. Every bracket is reported; brackets the base never reaches report
/// exactly zero, and nothing above the scheme's ceiling contributes.
pub fn allocate_with_exemption(
    amount: Decimal,
    scheme: &ContributionScheme,
) -> ContributionResult {
    let base = amount.saturating_sub(scheme.exemption());
    let steps = scheme.brackets().iter().map(|b| (Some(b.width), b.rate));
    let amounts = walk(base, steps, WalkMode::Capped);

    tracing::trace!(%amount, %base, "capped contribution");
    ContributionResult::new(amounts)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::summary::total;

    fn federal_widths() -> Vec<Decimal> {
        vec![dec!(57375), dec!(57375), dec!(63132), dec!(75532)]
    }

    fn federal_rates() -> Vec<Decimal> {
        vec![dec!(0.15), dec!(0.205), dec!(0.26), dec!(0.29), dec!(0.33)]
    }

    fn federal() -> BracketTable {
        BracketTable::new(&federal_widths(), &federal_rates()).unwrap()
    }

    fn cpp() -> ContributionScheme {
        ContributionScheme::new(
            "CPP",
            dec!(3500),
            &[dec!(67800), dec!(9900)],
            &[dec!(0.0595), dec!(0.04)],
        )
        .unwrap()
    }

    // =========================================================================
    // allocate tests
    // =========================================================================

    #[test]
    fn allocate_zero_is_empty() {
        let result = allocate(dec!(0), &federal());

        assert!(result.is_empty());
        assert_eq!(total(&result), dec!(0));
    }

    #[test]
    fn allocate_stops_at_exact_boundary() {
        let result = allocate(dec!(57375), &federal());

        assert_eq!(result.amounts(), &[dec!(8606.25)]);
    }

    #[test]
    fn allocate_mid_second_bracket() {
        let result = allocate(dec!(100000), &federal());

        assert_eq!(result.amounts(), &[dec!(8606.25), dec!(8738.125)]);
        assert_eq!(total(&result), dec!(17344.375));
    }

    #[test]
    fn allocate_reaches_unbounded_top_bracket() {
        let result = allocate(dec!(300000), &federal());

        assert_eq!(
            result.amounts(),
            &[
                dec!(8606.25),
                dec!(11761.875),
                dec!(16414.32),
                dec!(21904.28),
                // (300000 - 253414) * 0.33
                dec!(15373.38),
            ]
        );
    }

    #[test]
    fn allocate_just_past_boundary_engages_next_bracket() {
        let result = allocate(dec!(57375.01), &federal());

        assert_eq!(result.amounts(), &[dec!(8606.25), dec!(0.00205)]);
    }

    #[test]
    fn allocate_single_flat_bracket() {
        let table = BracketTable::new(&[], &[dec!(0.25)]).unwrap();

        let result = allocate(dec!(1000), &table);

        assert_eq!(result.amounts(), &[dec!(250)]);
    }

    #[test]
    fn allocate_negative_amount_is_empty() {
        assert!(allocate(dec!(-10), &federal()).is_empty());
    }

    #[test]
    fn allocate_parts_matches_table_allocation() {
        let from_parts =
            allocate_parts(dec!(123456.78), &federal_widths(), &federal_rates()).unwrap();

        assert_eq!(from_parts, allocate(dec!(123456.78), &federal()));
    }

    #[test]
    fn allocate_parts_rejects_invalid_table() {
        let result = allocate_parts(dec!(1000), &federal_widths(), &[dec!(0.15)]);

        assert!(matches!(
            result,
            Err(BracketTableError::RateCountMismatch { .. })
        ));
    }

    // =========================================================================
    // allocate_with_exemption tests
    // =========================================================================

    #[test]
    fn contribution_pads_untouched_bracket_with_zero() {
        let result = allocate_with_exemption(dec!(50000), &cpp());

        assert_eq!(result.amounts(), &[dec!(2766.75), dec!(0)]);
    }

    #[test]
    fn contribution_below_exemption_is_all_zero() {
        let result = allocate_with_exemption(dec!(2000), &cpp());

        assert_eq!(result.amounts(), &[dec!(0), dec!(0)]);
    }

    #[test]
    fn contribution_at_exemption_is_all_zero() {
        let result = allocate_with_exemption(dec!(3500), &cpp());

        assert_eq!(result.amounts(), &[dec!(0), dec!(0)]);
    }

    #[test]
    fn contribution_in_second_bracket() {
        let result = allocate_with_exemption(dec!(75000), &cpp());

        // base 71500: 67800 * 0.0595, then 3700 * 0.04
        assert_eq!(result.amounts(), &[dec!(4034.10), dec!(148.00)]);
    }

    #[test]
    fn contribution_is_capped_at_ceiling() {
        let at_ceiling = allocate_with_exemption(dec!(81200), &cpp());
        let above_ceiling = allocate_with_exemption(dec!(250000), &cpp());

        assert_eq!(at_ceiling.amounts(), &[dec!(4034.10), dec!(396.00)]);
        assert_eq!(above_ceiling, at_ceiling);
    }

    // =========================================================================
    // properties
    // =========================================================================

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_allocation_is_bounded_and_non_negative(cents in 0u64..100_000_000_00) {
            let amount = Decimal::new(cents as i64, 2);
            let table = federal();

            let result = allocate(amount, &table);
            let sum = total(&result);

            prop_assert!(result.iter().all(|a| a >= Decimal::ZERO));
            prop_assert!(sum >= Decimal::ZERO);
            prop_assert!(sum <= amount * table.max_rate());
            prop_assert!(result.len() <= table.len());
        }

        #[test]
        fn prop_allocation_is_deterministic(cents in 0u64..100_000_000_00) {
            let amount = Decimal::new(cents as i64, 2);

            prop_assert_eq!(allocate(amount, &federal()), allocate(amount, &federal()));
        }

        #[test]
        fn prop_contribution_is_full_length_and_capped(cents in 0u64..100_000_000_00) {
            let amount = Decimal::new(cents as i64, 2);
            let scheme = cpp();

            let result = allocate_with_exemption(amount, &scheme);

            prop_assert_eq!(result.len(), scheme.brackets().len());
            prop_assert!(result.iter().all(|a| a >= Decimal::ZERO));
            prop_assert!(total(&result) <= dec!(4430.10));
        }
    }
}
