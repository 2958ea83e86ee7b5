//! Rounding and display helpers shared by the calculations.
//!
//! Amounts are only rounded here, at the point they are turned into text.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero, the same way currency
/// amounts are rounded for display.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as Canadian dollars: `$` prefix, comma thousands
/// separators and two decimals.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::format_currency;
///
/// assert_eq!(format_currency(dec!(57375)), "$57,375.00");
/// assert_eq!(format_currency(dec!(8738.125)), "$8,738.13");
/// assert_eq!(format_currency(dec!(-1234.5)), "-$1,234.50");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Formats a fractional rate as a percentage with two decimals.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::format_rate;
///
/// assert_eq!(format_rate(dec!(0.205)), "20.50%");
/// ```
pub fn format_rate(rate: Decimal) -> String {
    format!("{:.2}%", round_half_up(rate * dec!(100)))
}

fn group_thousands(whole: &str) -> String {
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
