//! `bill-split` command line front end.

mod error;
mod input;
mod report;

use std::path::{Path, PathBuf};

use bill_split_config::{get_config, Config};
use bill_split_input::{decode, encode, share_url, token_from_url, SharedInput};
use bill_split_telemetry::setup_telemetry;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::error::CliError;
use crate::input::read_input;
use crate::report::{build_report, write_csv};

#[derive(Parser, Debug)]
#[command(name = "bill-split", version, about = "Split a shared bill by role coefficients")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate the amount every participant pays
    Calculate {
        /// `.toml` or `.json` file with participants and amounts
        input: PathBuf,
        /// Also write a CSV report to this file or directory
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Print a share link for an input file
    Share {
        input: PathBuf,
    },
    /// Calculate the split contained in a share link or token
    Open {
        link: String,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn calculate(input: &SharedInput, config: &Config, csv: Option<&Path>) -> Result<(), CliError> {
    let generated_at = Local::now().naive_local();
    let report = build_report(input, config, generated_at)?;
    println!("{}", report.summary);
    if let Some(warning) = &report.warning {
        eprintln!("{warning}");
    }
    if let Some(target) = csv {
        let event_name = input.event_name.as_deref().unwrap_or_default();
        let path = write_csv(&report, target, event_name, generated_at)?;
        println!("CSV: {}", path.display());
    }
    Ok(())
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = get_config()?;
    setup_telemetry(config.log_filter.as_deref())?;

    match cli.command {
        Command::Calculate { input, csv } => {
            calculate(&read_input(&input)?, &config, csv.as_deref())
        }
        Command::Share { input } => {
            let input = read_input(&input)?;
            input.validate(&config.limits)?;
            let token = encode(&input)?;
            info!(length = token.len(), "encoded share token");
            println!("{}", share_url(&config.share_base_url, &token));
            Ok(())
        }
        Command::Open { link, csv } => {
            let input = decode(token_from_url(&link)?)?;
            calculate(&input, &config, csv.as_deref())
        }
    }
}
