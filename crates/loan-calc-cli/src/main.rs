mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::Value;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::loans::{LoanArgs, ValidateArgs};
use commands::micro::SuggestPeriodArgs;
use commands::products::RoundArgs;
use loan_calc_core::LoanProduct;

/// Loan installment calculations
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Loan installment calculations",
    long_about = "A CLI for calculating loan installments with decimal precision. \
                  Supports daily, speed, micro, finance and poli loans, with the \
                  same validation rules the loan officers' calculator applies."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to a loancalc.toml configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log validation and calculation steps to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily Loan installment (period in days)
    Daily(LoanArgs),
    /// Speed Loan installment (period unit from configuration)
    Speed(LoanArgs),
    /// Micro Loan weekly installment (18 or 26 weeks)
    Micro(LoanArgs),
    /// Finance Loan monthly installment (flat interest)
    Finance(LoanArgs),
    /// Poli Loan monthly installment (interest only)
    Poli(LoanArgs),
    /// Validate raw input for a product without calculating
    Validate(ValidateArgs),
    /// Suggest the Micro Loan period for an amount
    SuggestPeriod(SuggestPeriodArgs),
    /// Round a value to the nearest 10
    Round(RoundArgs),
    /// List the loan products
    Products,
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

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Commands, config_path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = || config::LoanCalcConfig::load(config_path).map(|cfg| cfg.speed);

    match command {
        Commands::Daily(args) => commands::loans::run_quote(LoanProduct::Daily, args, &terms()?),
        Commands::Speed(args) => commands::loans::run_quote(LoanProduct::Speed, args, &terms()?),
        Commands::Micro(args) => commands::loans::run_quote(LoanProduct::Micro, args, &terms()?),
        Commands::Finance(args) => {
            commands::loans::run_quote(LoanProduct::Finance, args, &terms()?)
        }
        Commands::Poli(args) => commands::loans::run_quote(LoanProduct::Poli, args, &terms()?),
        Commands::Validate(args) => commands::loans::run_validate(args, &terms()?),
        Commands::SuggestPeriod(args) => commands::micro::run_suggest_period(args),
        Commands::Round(args) => commands::products::run_round(args),
        Commands::Products => commands::products::run_products(&terms()?),
        Commands::Version => Ok(serde_json::json!({
            "name": "loancalc",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command, cli.config.as_deref()) {
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
