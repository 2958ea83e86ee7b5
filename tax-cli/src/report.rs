//! Text and JSON rendering of a [`TaxBreakdown`].
//!
//! Amounts are rounded to cents here and nowhere else.

use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::calculations::{IncomeSummary, format_currency, format_rate, round_half_up};
use tax_core::{BreakdownLine, ScheduleBreakdown, TaxBreakdown};

const LABEL_WIDTH: usize = 40;
const AMOUNT_WIDTH: usize = 16;
const RANGE_WIDTH: usize = 30;
const RATE_WIDTH: usize = 7;

/// Plain-text report: header, one block per schedule, net income and, when
/// `monthly` is set, the monthly equivalents.
pub fn render_text(
    breakdown: &TaxBreakdown,
    monthly: bool,
) -> String {
    let mut lines = vec![
        format!(
            "{} ({}), tax year {}",
            breakdown.jurisdiction.display_name(),
            breakdown.jurisdiction,
            breakdown.tax_year
        ),
        figure("Gross income", breakdown.gross_income),
    ];

    for schedule in [
        &breakdown.federal,
        &breakdown.regional,
        &breakdown.contribution,
    ] {
        lines.push(String::new());
        lines.extend(schedule_lines(schedule));
    }

    let summary = &breakdown.summary;
    lines.push(String::new());
    if !summary.contributions_deducted {
        lines.push(format!(
            "{} not deducted from net income",
            breakdown.contribution.title
        ));
    }
    lines.push(figure("Net annual income", displayed_net(summary)));

    if monthly {
        lines.push(String::new());
        lines.extend(monthly_lines(breakdown, &summary.monthly()));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Schedule title with its negated total, then one row per bracket.
fn schedule_lines(schedule: &ScheduleBreakdown) -> Vec<String> {
    let mut lines = vec![figure(&schedule.title, -schedule.total)];
    lines.extend(schedule.lines.iter().map(bracket_line));
    lines
}

fn bracket_line(line: &BreakdownLine) -> String {
    match line {
        BreakdownLine::Taxed {
            range,
            rate,
            amount,
        } => format!(
            "  {:<RANGE_WIDTH$} @ {:>RATE_WIDTH$}{:>AMOUNT_WIDTH$}",
            range.to_string(),
            format_rate(*rate),
            format_currency(*amount)
        ),
        BreakdownLine::Exempt { range } => {
            format!("  {:<RANGE_WIDTH$}   {:>RATE_WIDTH$}", range.to_string(), "exempt")
        }
    }
}

fn monthly_lines(
    breakdown: &TaxBreakdown,
    month: &IncomeSummary,
) -> Vec<String> {
    let contribution_label = if month.contributions_deducted {
        breakdown.contribution.title.clone()
    } else {
        format!("{} (not deducted)", breakdown.contribution.title)
    };

    vec![
        "Monthly".to_string(),
        figure("Gross income", month.gross),
        figure(&breakdown.federal.title, -month.federal_tax),
        figure(&breakdown.regional.title, -month.regional_tax),
        figure(&contribution_label, -month.contributions),
        figure("Net monthly income", displayed_net(month)),
    ]
}

/// Net as printed: rounded gross less each rounded deduction, so the printed
/// column adds up to the cent. Differs from `summary.net` by at most a few
/// cents of rounding.
fn displayed_net(summary: &IncomeSummary) -> Decimal {
    let net = round_half_up(summary.gross)
        .saturating_sub(round_half_up(summary.federal_tax))
        .saturating_sub(round_half_up(summary.regional_tax));
    if summary.contributions_deducted {
        net.saturating_sub(round_half_up(summary.contributions))
    } else {
        net
    }
}

fn figure(
    label: &str,
    amount: Decimal,
) -> String {
    format!(
        "{:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}",
        label,
        format_currency(amount)
    )
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    breakdown: &'a TaxBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    monthly: Option<IncomeSummary>,
}

/// Pretty-printed JSON of the breakdown, with a `monthly` summary when
/// requested. Amounts keep full precision.
pub fn render_json(
    breakdown: &TaxBreakdown,
    monthly: bool,
) -> serde_json::Result<String> {
    let report = JsonReport {
        breakdown,
        monthly: monthly.then(|| breakdown.summary.monthly()),
    };
    serde_json::to_string_pretty(&report)
}
