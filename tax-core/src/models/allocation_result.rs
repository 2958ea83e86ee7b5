use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-bracket amounts, index-aligned with the table they were computed from.
///
/// A progressive allocation only reports the brackets it engaged, so it can be
/// shorter than its table. A capped contribution always reports every bracket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationResult {
    amounts: Vec<Decimal>,
}

/// Output of the capped contribution walk. Same shape as a progressive
/// allocation.
pub type ContributionResult = AllocationResult;

impl AllocationResult {
    pub fn new(amounts: Vec<Decimal>) -> Self {
        Self { amounts }
    }

    pub fn amounts(&self) -> &[Decimal] {
        &self.amounts
    }

    /// Amount for `index`, or `None` when that bracket was never reached.
    pub fn get(
        &self,
        index: usize,
    ) -> Option<Decimal> {
        self.amounts.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.amounts.iter().copied()
    }
}

impl From<Vec<Decimal>> for AllocationResult {
    fn from(amounts: Vec<Decimal>) -> Self {
        Self::new(amounts)
    }
}
