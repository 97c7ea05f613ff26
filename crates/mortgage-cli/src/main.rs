mod commands;
mod config;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::counties::CountiesArgs;
use commands::estimate::{CalculateArgs, ManualArgs, PurchaseArgs, RefinanceArgs};

/// Monthly mortgage payment estimates
#[derive(Parser)]
#[command(
    name = "mortgage",
    version,
    about = "Monthly mortgage payment estimates",
    long_about = "Estimate a monthly mortgage payment with decimal precision. Breaks the \
                  payment into principal & interest, property tax, homeowners insurance, \
                  HOA dues, mortgage insurance and PMI for purchases and refinances. \
                  Numeric flags accept form text: '20%', '$1,250' and blanks all work."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Calculator configuration file (JSON or TOML): term, insurance rate, county tax table
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log calculation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the payment on a home purchase
    Purchase(PurchaseArgs),
    /// Estimate the payment after refinancing an existing balance
    Refinance(RefinanceArgs),
    /// Total a breakdown entered line by line
    Manual(ManualArgs),
    /// Calculate a form submitted as JSON (file or stdin)
    Calculate(CalculateArgs),
    /// Show the county property tax table
    Counties(CountiesArgs),
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
    logging::init(cli.verbose);

    let calculator_config = match config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Purchase(args) => commands::estimate::run_purchase(args, calculator_config),
        Commands::Refinance(args) => commands::estimate::run_refinance(args, calculator_config),
        Commands::Manual(args) => commands::estimate::run_manual(args, calculator_config),
        Commands::Calculate(args) => commands::estimate::run_calculate(args, calculator_config),
        Commands::Counties(args) => commands::counties::run_counties(args, calculator_config),
        Commands::Version => {
            println!("mortgage {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
