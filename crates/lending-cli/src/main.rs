mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::schedule::{LateFeeArgs, ScheduleArgs};

/// Loan amortization schedule calculations
#[derive(Parser)]
#[command(
    name = "lend",
    version,
    about = "Loan amortization schedule calculations",
    long_about = "A CLI for computing loan installment schedules with decimal \
                  precision. Supports simple and compound (Price) interest, \
                  fixed-offset due-date projection, and daily late-fee accrual."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a full amortization schedule
    Schedule(ScheduleArgs),
    /// Accrue the daily late fee for an overdue installment
    LateFee(LateFeeArgs),
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

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::LateFee(args) => commands::schedule::run_late_fee(args),
        Commands::Version => {
            println!("lend {}", env!("CARGO_PKG_VERSION"));
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
