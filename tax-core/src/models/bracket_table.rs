use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a bracket table or contribution scheme is constructed
/// from values that break its invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    /// A table needs at least one bracket.
    #[error("bracket table has no brackets")]
    Empty,

    /// The number of rates does not line up with the number of widths.
    #[error("expected {expected} rates for {widths} bracket widths, got {rates}")]
    RateCountMismatch {
        widths: usize,
        rates: usize,
        expected: usize,
    },

    /// Finite bracket widths must be strictly positive.
    #[error("bracket {index} has non-positive width {width}")]
    NonPositiveWidth { index: usize, width: Decimal },

    /// Rates are fractions between 0 and 1 inclusive.
    #[error("bracket {index} has rate {rate} outside [0, 1]")]
    RateOutOfRange { index: usize, rate: Decimal },

    /// The contribution exemption floor must be non-negative.
    #[error("exemption must be non-negative, got {0}")]
    NegativeExemption(Decimal),

    /// Only the last bracket of a table may be unbounded.
    #[error("bracket {index} is unbounded but is not the last bracket")]
    MisplacedUnbounded { index: usize },

    /// The last bracket of a table must be unbounded.
    #[error("last bracket has width {0}; it must be unbounded")]
    BoundedTop(Decimal),
}

/// One bracket of a progressive table.
///
/// `width` is `None` only for the last bracket of a table, which absorbs
/// whatever amount remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub width: Option<Decimal>,
    pub rate: Decimal,
}

/// Ordered brackets of a progressive tax schedule.
///
/// Built from `n` finite widths and `n + 1` rates: the extra trailing rate
/// belongs to the unbounded top bracket. Deserialization goes through the
/// same checks as [`new`](Self::new).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBracketTable")]
pub struct BracketTable {
    brackets: Vec<Bracket>,
}

#[derive(Deserialize)]
struct RawBracketTable {
    brackets: Vec<Bracket>,
}

impl TryFrom<RawBracketTable> for BracketTable {
    type Error = BracketTableError;

    fn try_from(raw: RawBracketTable) -> Result<Self, Self::Error> {
        let Some((top, finite)) = raw.brackets.split_last() else {
            return Err(BracketTableError::Empty);
        };
        if let Some(width) = top.width {
            return Err(BracketTableError::BoundedTop(width));
        }
        let widths = finite
            .iter()
            .enumerate()
            .map(|(index, b)| b.width.ok_or(BracketTableError::MisplacedUnbounded { index }))
            .collect::<Result<Vec<_>, _>>()?;
        let rates: Vec<Decimal> = raw.brackets.iter().map(|b| b.rate).collect();

        Self::new(&widths, &rates)
    }
}

impl BracketTable {
    /// Creates a table, validating widths and rates.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] if:
    /// - `rates` is empty
    /// - `rates.len() != widths.len() + 1`
    /// - any width is zero or negative
    /// - any rate is outside `[0, 1]`
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::BracketTable;
    ///
    /// let table = BracketTable::new(
    ///     &[dec!(47564), dec!(53636)],
    ///     &[dec!(0.108), dec!(0.1275), dec!(0.174)],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(table.len(), 3);
    /// assert_eq!(table.brackets()[2].width, None);
    /// ```
    pub fn new(
        widths: &[Decimal],
        rates: &[Decimal],
    ) -> Result<Self, BracketTableError> {
        if rates.is_empty() {
            return Err(BracketTableError::Empty);
        }
        if rates.len() != widths.len() + 1 {
            return Err(BracketTableError::RateCountMismatch {
                widths: widths.len(),
                rates: rates.len(),
                expected: widths.len() + 1,
            });
        }
        validate_widths(widths)?;
        validate_rates(rates)?;

        Ok(Self::from_parts(widths, rates))
    }

    /// Builds a table without validation. Only used for the built-in tables,
    /// which are covered by tests.
    pub(crate) fn from_parts(
        widths: &[Decimal],
        rates: &[Decimal],
    ) -> Self {
        let brackets = rates
            .iter()
            .enumerate()
            .map(|(index, &rate)| Bracket {
                width: widths.get(index).copied(),
                rate,
            })
            .collect();

        Self { brackets }
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Finite widths, in order. One shorter than [`rates`](Self::rates).
    pub fn widths(&self) -> Vec<Decimal> {
        self.brackets.iter().filter_map(|b| b.width).collect()
    }

    pub fn rates(&self) -> Vec<Decimal> {
        self.brackets.iter().map(|b| b.rate).collect()
    }

    /// Highest rate in the table.
    pub fn max_rate(&self) -> Decimal {
        self.brackets
            .iter()
            .map(|b| b.rate)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }
}

pub(crate) fn validate_widths(widths: &[Decimal]) -> Result<(), BracketTableError> {
    match widths.iter().position(|w| *w <= Decimal::ZERO) {
        Some(index) => Err(BracketTableError::NonPositiveWidth {
            index,
            width: widths[index],
        }),
        None => Ok(()),
    }
}

pub(crate) fn validate_rates(rates: &[Decimal]) -> Result<(), BracketTableError> {
    match rates
        .iter()
        .position(|r| *r < Decimal::ZERO || *r > Decimal::ONE)
    {
        Some(index) => Err(BracketTableError::RateOutOfRange {
            index,
            rate: rates[index],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_builds_unbounded_last_bracket() {
        let table = BracketTable::new(&[dec!(100), dec!(200)], &[dec!(0.1), dec!(0.2), dec!(0.3)])
            .unwrap();

        assert_eq!(
            table.brackets(),
            &[
                Bracket {
                    width: Some(dec!(100)),
                    rate: dec!(0.1)
                },
                Bracket {
                    width: Some(dec!(200)),
                    rate: dec!(0.2)
                },
                Bracket {
                    width: None,
                    rate: dec!(0.3)
                },
            ]
        );
        assert_eq!(table.widths(), vec![dec!(100), dec!(200)]);
        assert_eq!(table.rates(), vec![dec!(0.1), dec!(0.2), dec!(0.3)]);
    }

    #[test]
    fn new_accepts_single_flat_bracket() {
        let table = BracketTable::new(&[], &[dec!(0.25)]).unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.widths().is_empty());
    }

    #[test]
    fn new_rejects_empty_rates() {
        assert_eq!(BracketTable::new(&[], &[]), Err(BracketTableError::Empty));
    }

    #[test]
    fn new_rejects_rate_count_mismatch() {
        let result = BracketTable::new(&[dec!(100), dec!(200)], &[dec!(0.1), dec!(0.2)]);

        assert_eq!(
            result,
            Err(BracketTableError::RateCountMismatch {
                widths: 2,
                rates: 2,
                expected: 3,
            })
        );
    }

    #[test]
    fn new_rejects_zero_width() {
        let result = BracketTable::new(&[dec!(100), dec!(0)], &[dec!(0.1), dec!(0.2), dec!(0.3)]);

        assert_eq!(
            result,
            Err(BracketTableError::NonPositiveWidth {
                index: 1,
                width: dec!(0),
            })
        );
    }

    #[test]
    fn new_rejects_rate_above_one() {
        let result = BracketTable::new(&[dec!(100)], &[dec!(0.1), dec!(1.5)]);

        assert_eq!(
            result,
            Err(BracketTableError::RateOutOfRange {
                index: 1,
                rate: dec!(1.5),
            })
        );
    }

    #[test]
    fn new_allows_non_monotonic_rates() {
        let table = BracketTable::new(&[dec!(100)], &[dec!(0.3), dec!(0.1)]).unwrap();

        assert_eq!(table.max_rate(), dec!(0.3));
    }

    // =========================================================================
    // deserialization
    // =========================================================================

    fn from_json(json: &str) -> Result<BracketTable, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }

    #[test]
    fn deserialize_round_trips_valid_table() {
        let table = BracketTable::new(&[dec!(100), dec!(200)], &[dec!(0.1), dec!(0.2), dec!(0.3)])
            .unwrap();

        let json = serde_json::to_string(&table).unwrap();

        assert_eq!(from_json(&json), Ok(table));
    }

    #[test]
    fn deserialize_rejects_unbounded_middle_bracket() {
        let err = from_json(
            r#"{"brackets": [
                {"width": "100", "rate": "0.1"},
                {"width": null, "rate": "0.2"},
                {"width": null, "rate": "0.3"}
            ]}"#,
        )
        .unwrap_err();

        assert!(err.contains("bracket 1 is unbounded but is not the last bracket"));
    }

    #[test]
    fn deserialize_rejects_bounded_top() {
        let err = from_json(r#"{"brackets": [{"width": "100", "rate": "0.1"}]}"#).unwrap_err();

        assert!(err.contains("last bracket has width 100"));
    }

    #[test]
    fn deserialize_rejects_empty_and_out_of_range() {
        assert!(from_json(r#"{"brackets": []}"#).unwrap_err().contains("has no brackets"));
        assert!(
            from_json(
                r#"{"brackets": [{"width": "-5", "rate": "0.1"}, {"width": null, "rate": "0.2"}]}"#
            )
            .unwrap_err()
            .contains("non-positive width -5")
        );
        assert!(
            from_json(r#"{"brackets": [{"width": null, "rate": "1.5"}]}"#)
                .unwrap_err()
                .contains("rate 1.5 outside [0, 1]")
        );
    }
}
