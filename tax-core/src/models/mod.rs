mod allocation_result;
mod bracket_table;
mod contribution_scheme;
mod jurisdiction;

pub use allocation_result::{AllocationResult, ContributionResult};
pub use bracket_table::{Bracket, BracketTable, BracketTableError};
pub use contribution_scheme::{ContributionBracket, ContributionScheme};
pub use jurisdiction::JurisdictionId;
