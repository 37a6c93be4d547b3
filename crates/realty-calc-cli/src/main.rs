mod commands;
mod config;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::fair_price::FairPriceArgs;
use commands::gap::GapArgs;
use commands::jeonse::JeonseRatioArgs;
use commands::leads::LeadRefArgs;
use commands::loan::LoanArgs;
use commands::roi::RoiArgs;
use realty_calc_core::RealtyCalcError;

/// Real-estate investment calculators
#[derive(Parser)]
#[command(
    name = "rrc",
    version,
    about = "Real-estate investment calculators",
    long_about = "A CLI for Korean apartment investment calculations with decimal \
                  precision. Supports loan amortization, gap investment returns, \
                  jeonse ratio safety scoring, fair price estimation and multi-scenario \
                  ROI simulation. Amounts are entered in 만원 as on the website forms."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Calculator assumptions file (YAML, or JSON by extension)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Mortgage repayment schedule and comparisons
    Loan(LoanArgs),
    /// Gap investment cash flow and return
    Gap(GapArgs),
    /// Jeonse ratio, safety score and regional comparison
    JeonseRatio(JeonseRatioArgs),
    /// Fair price estimate from a recent transaction
    FairPrice(FairPriceArgs),
    /// Four-scenario ROI simulation
    Roi(RoiArgs),
    /// Generate an order or sample-request reference, or submit a request
    LeadRef(LeadRefArgs),
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

fn main() {
    let cli = Cli::parse();
    logging::init_tracing();

    let settings = match config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Loan(args) => commands::loan::run_loan(args, &settings),
        Commands::Gap(args) => commands::gap::run_gap(args, &settings),
        Commands::JeonseRatio(args) => commands::jeonse::run_jeonse_ratio(args, &settings),
        Commands::FairPrice(args) => commands::fair_price::run_fair_price(args, &settings),
        Commands::Roi(args) => commands::roi::run_roi(args, &settings),
        Commands::LeadRef(args) => commands::leads::run_lead_ref(args),
        Commands::Version => {
            println!("rrc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            match e.downcast_ref::<RealtyCalcError>() {
                Some(RealtyCalcError::Validation(fields)) => {
                    eprintln!("{}: invalid input", "error".red().bold());
                    for (field, message) in fields.iter() {
                        eprintln!("  {}: {}", field.yellow(), message);
                    }
                }
                _ => eprintln!("{}: {}", "error".red().bold(), e),
            }
            process::exit(1);
        }
    }
}
