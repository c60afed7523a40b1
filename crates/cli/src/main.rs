// hgrid - French hotel table enrichment (CLI)

mod enrich;
mod exit_codes;
mod logging;
mod report;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use hotelgrid_enrich::EnrichError;
use hotelgrid_io::IoError;

use exit_codes::{enrich_exit_code, io_exit_code, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "hgrid")]
#[command(about = "Append location, size, ownership and positioning columns to French hotel tables")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich a hotel table and write CSV + XLSX outputs
    #[command(after_help = "\
Examples:
  hgrid run hotels.csv
  hgrid run hotels.xlsx --output-dir out --config data/config.yaml
  hgrid run hotels.csv --reference-dir data --strict-reference --jobs 4
  hgrid run hotels.csv --no-xlsx --json > report.json")]
    Run(enrich::RunArgs),

    /// Check config, reference tables and (optionally) an input's columns without enriching
    #[command(after_help = "\
Examples:
  hgrid validate --config data/config.yaml
  hgrid validate --reference-dir data --strict-reference hotels.csv")]
    Validate(enrich::ValidateArgs),

    /// Copy the first N rows of a table into a small CSV for trial runs
    #[command(after_help = "\
Examples:
  hgrid sample contacts.csv
  hgrid sample contacts.xlsx --rows 50
  hgrid sample contacts.csv --rows 10 --output small.csv")]
    Sample(enrich::SampleArgs),
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  hotelgrid-enrich ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  hotelgrid-enrich ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => enrich::cmd_run(args),
        Commands::Validate(args) => enrich::cmd_validate(args),
        Commands::Sample(args) => enrich::cmd_sample(args),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<EnrichError> for CliError {
    fn from(err: EnrichError) -> Self {
        let code = enrich_exit_code(&err);
        let hint = match &err {
            EnrichError::MissingColumns { available, .. } => {
                Some(format!("available columns: {}", available.join(", ")))
            }
            EnrichError::Reference(_) => {
                Some("point --reference-dir at the directory holding the lookup files".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        Self::new(io_exit_code(&err), err.to_string())
    }
}
