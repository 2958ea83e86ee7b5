use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::bracket_table::{BracketTableError, validate_rates, validate_widths};

/// A finite bracket of a capped contribution scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBracket {
    pub width: Decimal,
    pub rate: Decimal,
}

/// Statutory contribution with an exemption floor and a ceiling.
///
/// Income up to `exemption` contributes nothing. The brackets that follow are
/// all finite, so nothing is contributed above
/// [`ceiling`](Self::ceiling).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawContributionScheme")]
pub struct ContributionScheme {
    name: String,
    exemption: Decimal,
    brackets: Vec<ContributionBracket>,
}

#[derive(Deserialize)]
struct RawContributionScheme {
    name: String,
    exemption: Decimal,
    brackets: Vec<ContributionBracket>,
}

impl TryFrom<RawContributionScheme> for ContributionScheme {
    type Error = BracketTableError;

    fn try_from(raw: RawContributionScheme) -> Result<Self, Self::Error> {
        let widths: Vec<Decimal> = raw.brackets.iter().map(|b| b.width).collect();
        let rates: Vec<Decimal> = raw.brackets.iter().map(|b| b.rate).collect();

        Self::new(raw.name, raw.exemption, &widths, &rates)
    }
}

impl ContributionScheme {
    /// Creates a scheme from index-aligned widths and rates.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] if there are no brackets, the widths and
    /// rates differ in length, a width is not positive, a rate is outside
    /// `[0, 1]` or the exemption is negative.
    pub fn new(
        name: impl Into<String>,
        exemption: Decimal,
        widths: &[Decimal],
        rates: &[Decimal],
    ) -> Result<Self, BracketTableError> {
        if rates.is_empty() {
            return Err(BracketTableError::Empty);
        }
        if widths.len() != rates.len() {
            return Err(BracketTableError::RateCountMismatch {
                widths: widths.len(),
                rates: rates.len(),
                expected: widths.len(),
            });
        }
        if exemption < Decimal::ZERO {
            return Err(BracketTableError::NegativeExemption(exemption));
        }
        validate_widths(widths)?;
        validate_rates(rates)?;

        Ok(Self::from_parts(name, exemption, widths, rates))
    }

    pub(crate) fn from_parts(
        name: impl Into<String>,
        exemption: Decimal,
        widths: &[Decimal],
        rates: &[Decimal],
    ) -> Self {
        let brackets = widths
            .iter()
            .zip(rates)
            .map(|(&width, &rate)| ContributionBracket { width, rate })
            .collect();

        Self {
            name: name.into(),
            exemption,
            brackets,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exemption(&self) -> Decimal {
        self.exemption
    }

    pub fn brackets(&self) -> &[ContributionBracket] {
        &self.brackets
    }

    pub fn widths(&self) -> Vec<Decimal> {
        self.brackets.iter().map(|b| b.width).collect()
    }

    pub fn rates(&self) -> Vec<Decimal> {
        self.brackets.iter().map(|b| b.rate).collect()
    }

    /// Income level above which no further contribution is due.
    pub fn ceiling(&self) -> Decimal {
        self.exemption + self.brackets.iter().map(|b| b.width).sum::<Decimal>()
    }
}
