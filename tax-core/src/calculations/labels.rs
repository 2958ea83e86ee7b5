//! Human-readable bracket ranges.
//!
//! Ranges are numeric values first; their `Display` impl renders them with
//! [`format_currency`], e.g. `before $57,375.00`, `$114,750.00 – $177,882.00`
//! and `over $253,414.00`.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::format_currency;
use crate::models::ContributionScheme;

/// Income range covered by one bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BracketRange {
    /// The first bracket, up to `upper`.
    Below { upper: Decimal },
    Between { lower: Decimal, upper: Decimal },
    /// The unbounded top bracket, from `lower`.
    Above { lower: Decimal },
}

impl fmt::Display for BracketRange {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Below { upper } => write!(f, "before {}", format_currency(*upper)),
            Self::Between { lower, upper } => write!(
                f,
                "{} \u{2013} {}",
                format_currency(*lower),
                format_currency(*upper)
            ),
            Self::Above { lower } => write!(f, "over {}", format_currency(*lower)),
        }
    }
}

/// Sum of the first `index` widths. Saturates at the sum of all widths.
pub fn cumulative_before(
    widths: &[Decimal],
    index: usize,
) -> Decimal {
    widths.iter().take(index).sum()
}

/// Range of bracket `index` in a progressive table with the given finite
/// `widths`. Index `widths.len()` addresses the unbounded top bracket.
///
/// Returns `None` for an index past the top bracket.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::label_for;
///
/// let widths = [dec!(57375), dec!(57375), dec!(63132), dec!(75532)];
///
/// assert_eq!(label_for(&widths, 0).unwrap().to_string(), "before $57,375.00");
/// assert_eq!(label_for(&widths, 4).unwrap().to_string(), "over $253,414.00");
/// assert!(label_for(&widths, 5).is_none());
/// ```
pub fn label_for(
    widths: &[Decimal],
    index: usize,
) -> Option<BracketRange> {
    if index > widths.len() {
        return None;
    }
    if index == widths.len() {
        return Some(BracketRange::Above {
            lower: cumulative_before(widths, index),
        });
    }
    if index == 0 {
        return Some(BracketRange::Below {
            upper: cumulative_before(widths, 1),
        });
    }

    Some(BracketRange::Between {
        lower: cumulative_before(widths, index),
        upper: cumulative_before(widths, index + 1),
    })
}

/// The part of income a contribution scheme exempts, from zero up to the
/// exemption floor.
pub fn exempt_range(scheme: &ContributionScheme) -> BracketRange {
    BracketRange::Between {
        lower: Decimal::ZERO,
        upper: scheme.exemption(),
    }
}

/// Range of contribution bracket `index`, offset by the exemption floor.
/// Returns `None` past the last bracket.
pub fn contribution_label_for(
    scheme: &ContributionScheme,
    index: usize,
) -> Option<BracketRange> {
    let widths = scheme.widths();
    if index >= widths.len() {
        return None;
    }

    let floor = scheme.exemption();
    Some(BracketRange::Between {
        lower: floor + cumulative_before(&widths, index),
        upper: floor + cumulative_before(&widths, index + 1),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn federal_widths() -> [Decimal; 4] {
        [dec!(57375), dec!(57375), dec!(63132), dec!(75532)]
    }

    fn label(
        widths: &[Decimal],
        index: usize,
    ) -> String {
        label_for(widths, index)
            .map(|range| range.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn first_bracket_is_before_first_boundary() {
        assert_eq!(label(&federal_widths(), 0), "before $57,375.00");
    }

    #[test]
    fn middle_bracket_spans_cumulative_boundaries() {
        assert_eq!(label(&federal_widths(), 1), "$57,375.00 \u{2013} $114,750.00");
        assert_eq!(label(&federal_widths(), 2), "$114,750.00 \u{2013} $177,882.00");
        assert_eq!(label(&federal_widths(), 3), "$177,882.00 \u{2013} $253,414.00");
    }

    #[test]
    fn top_bracket_is_over_sum_of_widths() {
        assert_eq!(label(&federal_widths(), 4), "over $253,414.00");
        assert_eq!(
            label_for(&federal_widths(), 4),
            Some(BracketRange::Above {
                lower: dec!(253414)
            })
        );
    }

    #[test]
    fn index_past_top_bracket_has_no_label() {
        assert_eq!(label_for(&federal_widths(), 5), None);
    }

    #[test]
    fn flat_table_has_single_open_range() {
        assert_eq!(label(&[], 0), "over $0.00");
    }

    #[test]
    fn cumulative_before_saturates() {
        assert_eq!(cumulative_before(&federal_widths(), 0), dec!(0));
        assert_eq!(cumulative_before(&federal_widths(), 2), dec!(114750));
        assert_eq!(cumulative_before(&federal_widths(), 99), dec!(253414));
    }

    #[test]
    fn contribution_ranges_are_offset_by_exemption() {
        let cpp = ContributionScheme::new(
            "CPP",
            dec!(3500),
            &[dec!(67800), dec!(9900)],
            &[dec!(0.0595), dec!(0.04)],
        )
        .unwrap();

        assert_eq!(exempt_range(&cpp).to_string(), "$0.00 \u{2013} $3,500.00");
        assert_eq!(
            contribution_label_for(&cpp, 0).map(|r| r.to_string()),
            Some("$3,500.00 \u{2013} $71,300.00".to_string())
        );
        assert_eq!(
            contribution_label_for(&cpp, 1).map(|r| r.to_string()),
            Some("$71,300.00 \u{2013} $81,200.00".to_string())
        );
        assert_eq!(contribution_label_for(&cpp, 2), None);
    }
}
