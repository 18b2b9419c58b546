mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::calculate::{CalculateArgs, ValidateArgs};
use commands::catalog::{ScheduleArgs, TemplateArgs};
use commands::compare::CompareArgs;

/// Real-estate payment plan calculations
#[derive(Parser)]
#[command(
    name = "payplan",
    version,
    about = "Real-estate payment plan calculations",
    long_about = "Price a property under an installment plan with decimal precision: \
                  discounts, GST, interest credited on early payments and its settlement, \
                  registry and possession charges, and present value at a cost of money."
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
    /// Calculate a full installment schedule with interest, charges and NPV
    Calculate(CalculateArgs),
    /// Validate a plan configuration
    Validate(ValidateArgs),
    /// List the built-in plan templates
    Templates,
    /// Show one built-in template
    Template(TemplateArgs),
    /// Percent-of-price schedule for a template
    Schedule(ScheduleArgs),
    /// Compare several plans for the same unit
    Compare(CompareArgs),
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
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::calculate::run_calculate(args),
        Commands::Validate(args) => commands::calculate::run_validate(args),
        Commands::Templates => commands::catalog::run_templates(),
        Commands::Template(args) => commands::catalog::run_template(args),
        Commands::Schedule(args) => commands::catalog::run_schedule(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Version => {
            println!("payplan {}", env!("CARGO_PKG_VERSION"));
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
