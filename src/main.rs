//! books-api command line.
//!
//! # Commands
//!
//! ```text
//!   validate <FILE>   JSON CreateBookRequest → validation report (exit 1 if invalid)
//!   import <FILE>     JSON array of CreateBookRequest → summary + in-memory catalogue
//!   check-config      load + validate the config file, print effective TOML
//! ```
//!
//! Logs go to stderr; command output goes to stdout.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use books_api::config::{load_or_default, AppConfig};
use books_api::models::CreateBookRequest;
use books_api::observability::{logging, metrics};
use books_api::service::{BookService, MemoryStorage};
use books_api::validation::Validator;

#[derive(Parser)]
#[command(name = "books-api")]
#[command(about = "Validate and import book records", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults are used when omitted).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a single book request
    Validate {
        /// JSON file holding one CreateBookRequest
        file: PathBuf,
    },
    /// Import book requests into an in-memory catalogue
    Import {
        /// JSON file holding an array of CreateBookRequest
        file: PathBuf,
    },
    /// Check the configuration file
    CheckConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!(
        max_string_len = config.validator.max_string_len,
        max_depth = config.validator.max_depth,
        "Configuration loaded"
    );

    let metrics_handle = if config.observability.metrics_enabled {
        Some(metrics::init_metrics()?)
    } else {
        None
    };

    let code = match cli.command {
        Commands::Validate { file } => run_validate(&config, &file)?,
        Commands::Import { file } => run_import(&config, &file)?,
        Commands::CheckConfig => {
            println!("{}", toml::to_string_pretty(&config)?);
            ExitCode::SUCCESS
        }
    };

    if let Some(handle) = metrics_handle {
        print!("{}", handle.render());
    }

    Ok(code)
}

fn run_validate(config: &AppConfig, file: &Path) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file)?;
    let request: CreateBookRequest = serde_json::from_str(&content)?;

    let validator = Validator::new(&config.validator);
    let report = validator.validate(&request)?;

    if report.is_valid() {
        println!("{}: valid", file.display());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}: invalid", file.display());
        print!("{}", report);
        Ok(ExitCode::FAILURE)
    }
}

fn run_import(config: &AppConfig, file: &Path) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file)?;
    let requests: Vec<CreateBookRequest> = serde_json::from_str(&content)?;

    let storage = Arc::new(MemoryStorage::new(config.storage.max_books));
    let validator = Arc::new(Validator::new(&config.validator));
    let service = BookService::new(storage, validator);

    let total = requests.len();
    let mut rejected = 0;
    for (index, request) in requests.into_iter().enumerate() {
        if let Err(e) = service.create_book(request) {
            rejected += 1;
            eprintln!("record {}: [{}] {}", index, e.status_code(), e);
        }
    }

    tracing::info!(total, rejected, "Import finished");
    println!(
        "{}",
        ImportSummary {
            accepted: total - rejected,
            rejected,
        }
    );
    println!("{}", serde_json::to_string_pretty(&service.get_books()?)?);

    if rejected > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Counts printed after an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ImportSummary {
    accepted: usize,
    rejected: usize,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "accepted: {}, rejected: {}", self.accepted, self.rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_summary_line() {
        let summary = ImportSummary {
            accepted: 3,
            rejected: 1,
        };
        assert_eq!(summary.to_string(), "accepted: 3, rejected: 1");
    }

    #[test]
    fn test_cli_parses_import() {
        let cli = Cli::parse_from(["books-api", "--config", "app.toml", "import", "books.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("app.toml")));
        assert!(matches!(cli.command, Commands::Import { ref file } if file == Path::new("books.json")));
    }
}
