use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

use vat_cli::app::{AppContext, EstimateInput, Overrides, RateInput, merge_config};
use vat_cli::config::CliConfig;
use vat_cli::report::{EstimateReport, RateReport, render_matches};
use vat_cli::{logging, utils};
use vat_core::{PolicyYear, TaxRegime};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// VAT and simplified-regime rate calculator for 2025 and 2026.
///
/// Resolves the rate for a tax regime, computes tax and totals for both
/// years and looks up activity classification codes.
#[derive(Debug, Parser)]
#[command(name = "vat-calc", version)]
struct Cli {
    /// Configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Activity classification table (.csv or .json).
    #[arg(long, global = true)]
    classifications: Option<PathBuf>,

    /// Rate policy overrides (TOML).
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `vat_core=trace`. `RUST_LOG` wins.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Tax and totals for 2025 and 2026 with the difference between them.
    Estimate {
        /// Amount before tax, e.g. `100 000` or `1234,56`.
        #[arg(long, value_parser = utils::parse_decimal)]
        amount: Decimal,

        /// general (osn), simplified (usn), patent (psn) or automated_simplified (ausn).
        #[arg(long, default_value = "general", value_parser = parse_regime)]
        regime: TaxRegime,

        /// Activity classification code.
        #[arg(long)]
        code: Option<String>,

        /// General-regime rate for 2025 in percent.
        #[arg(long, value_parser = utils::parse_decimal)]
        rate: Option<Decimal>,

        /// Annual revenue in millions of roubles.
        #[arg(long, default_value = "0", value_parser = utils::parse_decimal)]
        revenue: Decimal,

        /// Number of employees.
        #[arg(long, default_value_t = 0)]
        employees: u32,
    },

    /// Find classification entries by code prefix or name fragment.
    Search {
        query: String,

        /// Maximum number of entries to print.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Rate for one regime and year.
    Rate {
        #[arg(long, value_parser = parse_regime)]
        regime: TaxRegime,

        #[arg(long, value_parser = parse_year)]
        year: PolicyYear,

        /// Annual revenue in millions of roubles.
        #[arg(long, default_value = "0", value_parser = utils::parse_decimal)]
        revenue: Decimal,

        /// Number of employees.
        #[arg(long, default_value_t = 0)]
        employees: u32,

        /// Activity classification code.
        #[arg(long)]
        code: Option<String>,
    },
}

fn parse_regime(s: &str) -> Result<TaxRegime, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn parse_year(s: &str) -> Result<PolicyYear, String> {
    let year: i32 = s.trim().parse().map_err(|_| format!("invalid year '{s}'"))?;
    PolicyYear::try_from(year).map_err(|e| format!("{e}"))
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };
    let config = merge_config(
        file_config,
        Overrides {
            classifications: cli.classifications,
            policy: cli.policy,
            log_level: cli.log_level,
        },
    );

    logging::init_logging(config.log_level.as_deref(), config.log_file.as_deref())
        .context("failed to initialize logging")?;
    debug!(?config, "effective configuration");

    let app = AppContext::load(&config)?;

    match cli.command {
        Command::Estimate {
            amount,
            regime,
            code,
            rate,
            revenue,
            employees,
        } => {
            let input = EstimateInput {
                regime,
                amount,
                revenue_millions: revenue,
                employees,
                code,
                selected_rate: rate,
            };
            let (estimate, suggestion) = app.estimate(&input)?;
            print!(
                "{}",
                EstimateReport {
                    estimate: &estimate,
                    suggestion,
                }
            );
        }
        Command::Search { query, limit } => {
            let limit = app.search_limit(limit);
            print!("{}", render_matches(app.table.search(&query), limit));
        }
        Command::Rate {
            regime,
            year,
            revenue,
            employees,
            code,
        } => {
            let input = RateInput {
                regime,
                year,
                revenue_millions: revenue,
                employees,
                code,
            };
            let result = app.rate(&input)?;
            println!("{}", RateReport(&result));
        }
    }

    Ok(())
}
