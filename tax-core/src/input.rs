//! Turning raw text from an input field into an amount.

use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
pub enum ParseDecimalError {
    #[error("invalid decimal '{input}': unexpected character '{found}'")]
    UnexpectedChar { input: String, found: char },

    #[error("invalid decimal '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`) and scientific
/// notation (e.g. `"1e5"`). Empty or whitespace-only input is treated as 0.
/// Only digits, `.`, signs and an exponent marker are accepted after commas
/// are removed; `rust_decimal` alone would also take `_` as a separator.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    if let Some(found) = normalized
        .chars()
        .find(|c| !(c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E')))
    {
        return Err(ParseDecimalError::UnexpectedChar {
            input: s.to_string(),
            found,
        });
    }
    normalized
        .parse::<Decimal>()
        .or_else(|e| Decimal::from_scientific(&normalized).map_err(|_| e))
        .map_err(|e| ParseDecimalError::Invalid {
            input: s.to_string(),
            source: e,
        })
}

/// Normalizes a raw amount string to a non-negative [`Decimal`].
///
/// Never fails: anything that does not parse is treated as zero, as is a
/// negative amount. The fallback is logged at `warn` level.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::normalize_amount;
///
/// assert_eq!(normalize_amount("100,000.50"), dec!(100000.50));
/// assert_eq!(normalize_amount("not a number"), dec!(0));
/// ```
pub fn normalize_amount(raw: &str) -> Decimal {
    match parse_decimal(raw) {
        Ok(amount) if amount < Decimal::ZERO => {
            tracing::warn!(input = %raw, "negative amount treated as zero");
            Decimal::ZERO
        }
        Ok(amount) => amount,
        Err(e) => {
            tracing::warn!(input = %raw, "unparseable amount treated as zero: {}", e);
            Decimal::ZERO
        }
    }
}
