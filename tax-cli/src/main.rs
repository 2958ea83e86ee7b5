use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use tax_core::{EngineOptions, JurisdictionId, TaxEngine, TaxInputs};
use tax_cli::config::{FileConfig, Overrides, Settings};
use tax_cli::{logging, report, tables};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive income tax calculator for Canadian provinces and territories.
///
/// Computes federal and provincial tax bracket by bracket, pension plan
/// contributions, and net income.
#[derive(Debug, Parser)]
#[command(name = "tax-calc", version, about)]
struct Cli {
    /// Config file. Defaults to `tax-calc.toml` in the working directory, if
    /// present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Province or territory code (ON, MB, SK, ...).
    #[arg(short, long, value_parser = parse_jurisdiction)]
    jurisdiction: Option<JurisdictionId>,

    /// Employment income. Anything unparseable counts as zero.
    #[arg(short, long, default_value = "", allow_hyphen_values = true)]
    income: String,

    /// Other taxable income, not subject to pension contributions.
    #[arg(short, long, default_value = "", allow_hyphen_values = true)]
    supplementary: String,

    /// Bracket table CSV to use instead of the built-in tables.
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Tax year to take from `--tables`. Defaults to the latest year in the
    /// file.
    #[arg(long)]
    year: Option<i32>,

    /// Also show monthly figures.
    #[arg(long)]
    monthly: bool,

    /// Print the breakdown as JSON.
    #[arg(long)]
    json: bool,

    /// Leave pension contributions out of net income.
    #[arg(long)]
    exclude_contributions: bool,

    /// Log level or EnvFilter directive. `RUST_LOG` takes precedence.
    #[arg(long)]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_jurisdiction(code: &str) -> Result<JurisdictionId, String> {
    JurisdictionId::parse(code).ok_or_else(|| {
        let known: Vec<&str> = JurisdictionId::REGIONAL.iter().map(|id| id.as_str()).collect();
        format!("unknown jurisdiction '{code}' (expected one of {})", known.join(", "))
    })
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            jurisdiction: self.jurisdiction,
            tables: self.tables.clone(),
            tax_year: self.year,
            monthly: self.monthly,
            exclude_contributions: self.exclude_contributions,
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let file_config = FileConfig::discover(cli.config.as_deref(), &cwd)?;
    let settings = Settings::resolve(file_config, cli.overrides())?;

    logging::init_logging(&settings.log_level, settings.log_file.as_deref())?;
    debug!(?settings, "resolved settings");

    let registry = tables::load(settings.tables.as_deref(), settings.tax_year)
        .context("Failed to load bracket tables")?;
    let engine = TaxEngine::new(&registry).with_options(EngineOptions {
        deduct_contributions: settings.deduct_contributions,
    });

    let inputs = TaxInputs::from_raw(&cli.income, &cli.supplementary, settings.jurisdiction);
    let breakdown = engine.compute(&inputs)?;

    if cli.json {
        println!("{}", report::render_json(&breakdown, settings.monthly)?);
    } else {
        print!("{}", report::render_text(&breakdown, settings.monthly));
    }

    Ok(())
}
