mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::compliance::{ComplianceArgs, HetuArgs, ValidateArgs};
use commands::reconcile::ReconcileArgs;
use commands::reference::{CategoriesArgs, RatesArgs};
use commands::tax::{EnnakkoveroArgs, EstimateArgs, Form5Args, TaxArgs, TaxCardArgs, YelArgs};
use input::rates::RatesContext;

/// Finnish sole-trader tax, pension and bank reconciliation calculations
#[derive(Parser)]
#[command(
    name = "vero",
    version,
    about = "Finnish sole-trader tax, pension and bank reconciliation calculations",
    long_about = "A CLI for the bookkeeping arithmetic of a Finnish sole trader \
                  (toiminimi) with decimal precision. Supports progressive income \
                  tax, YEL pension premiums, ennakkovero tracking, Form 5 line \
                  items, tax card checks, bank reconciliation and tosite compliance."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Statutory rates file (JSON or YAML list of fiscal-year bundles)
    #[arg(long, global = true)]
    rates: Option<String>,

    /// Fiscal year whose rates apply (defaults to the latest configured)
    #[arg(long, global = true)]
    year: Option<i32>,

    /// Log to stderr; repeat for more detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Progressive state tax plus municipal and church tax
    Tax(TaxArgs),
    /// YEL pension insurance premium
    Yel(YelArgs),
    /// Compare the ennakkovero schedule with the income trajectory
    Ennakkovero(EnnakkoveroArgs),
    /// Form 5 (elinkeinotoiminnan veroilmoitus) line items
    Form5(Form5Args),
    /// Year-to-date tax estimate from ledger entries
    Estimate(EstimateArgs),
    /// Compare a tax card withholding rate with the effective rate
    TaxCard(TaxCardArgs),
    /// Suggest matches between bank records and ledger entries
    Reconcile(ReconcileArgs),
    /// Tosite coverage, depreciation and prepayment register checks
    Compliance(ComplianceArgs),
    /// Validate a new ledger entry
    Validate(ValidateArgs),
    /// Scan text for Finnish personal identity codes
    Hetu(HetuArgs),
    /// List bookkeeping categories
    Categories(CategoriesArgs),
    /// Show the statutory rates for a fiscal year
    Rates(RatesArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let ctx = RatesContext::load(cli.rates.as_deref(), cli.year)?;

    match cli.command {
        Commands::Tax(args) => commands::tax::run_tax(args, &ctx),
        Commands::Yel(args) => commands::tax::run_yel(args, &ctx),
        Commands::Ennakkovero(args) => commands::tax::run_ennakkovero(args),
        Commands::Form5(args) => commands::tax::run_form5(args, &ctx),
        Commands::Estimate(args) => commands::tax::run_estimate(args, &ctx),
        Commands::TaxCard(args) => commands::tax::run_tax_card(args),
        Commands::Reconcile(args) => commands::reconcile::run_reconcile(args),
        Commands::Compliance(args) => commands::compliance::run_compliance(args, &ctx),
        Commands::Validate(args) => commands::compliance::run_validate(args, &ctx),
        Commands::Hetu(args) => commands::compliance::run_hetu(args),
        Commands::Categories(args) => commands::reference::run_categories(args),
        Commands::Rates(args) => commands::reference::run_rates(args, &ctx),
        Commands::Version => Ok(serde_json::Value::Null),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if matches!(cli.command, Commands::Version) {
        println!("vero {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let format = cli.output.clone();
    match run(cli) {
        Ok(value) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
