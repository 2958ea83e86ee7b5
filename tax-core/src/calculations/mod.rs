//! Bracket calculations: allocation, range labels and summary arithmetic.

pub mod allocation;
pub mod common;
pub mod labels;
pub mod summary;

pub use allocation::{allocate, allocate_parts, allocate_with_exemption};
pub use common::{format_currency, format_rate, round_half_up};
pub use labels::{BracketRange, contribution_label_for, cumulative_before, exempt_range, label_for};
pub use summary::{IncomeSummary, MONTHS_PER_YEAR, monthly, net_income, total};
