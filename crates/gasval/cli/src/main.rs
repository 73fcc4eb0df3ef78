//! Gasval CLI - analytical validation of natural-gas chromatography reports
//!
//! This CLI provides laboratory operators with a terminal interface to:
//! - Validate a report: gas quality tier, AGA-8 / GERG-2008 method, operating range
//! - Inspect the active reference tables
//! - Monitor historical results with I-MR control charts
//! - Correct stored samples through audited edits

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use gasval_cep::{CepMonitor, JsonFileStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use commands::{cep, tables, validate};
use config::CliConfig;
use error::CliResult;

/// Gasval CLI application
#[derive(Parser)]
#[command(name = "gasval")]
#[command(about = "Gasval - analytical validation engine for natural-gas reports", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "GASVAL_CONFIG")]
    config: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Validate a report document (JSON or YAML)
    Validate {
        /// Report file
        file: PathBuf,
    },

    /// Show the active reference tables
    Tables,

    /// CEP statistical monitoring
    Cep {
        #[command(subcommand)]
        command: cep::CepCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(cli) {
        output::print_error(&err.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    // Load config
    let config = CliConfig::load(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Validate { file } => validate::execute(&file, config.tables()?, cli.output),
        Commands::Tables => {
            let tables = config.tables()?;
            tables::execute(&tables, cli.output)
        }
        Commands::Cep { command } => {
            let store = JsonFileStore::new(config.store_path()?);
            tracing::debug!(path = %store.path().display(), "Using historical store");
            let monitor = CepMonitor::new(Arc::new(store));
            cep::execute(command, &monitor, cli.output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    struct Workspace {
        dir: PathBuf,
        config: String,
    }

    impl Workspace {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("gasval_cli_run_{}", uuid::Uuid::new_v4()));
            std::fs::create_dir_all(&dir).unwrap();
            let config = dir.join("config.toml");
            std::fs::write(
                &config,
                format!("store_path = '{}'\n", dir.join("samples.json").display()),
            )
            .unwrap();
            Self {
                config: config.display().to_string(),
                dir,
            }
        }

        fn run(&self, args: &[&str]) -> CliResult<()> {
            let mut argv = vec!["gasval", "--config", self.config.as_str()];
            argv.extend_from_slice(args);
            run(Cli::try_parse_from(argv).unwrap())
        }
    }

    impl Drop for Workspace {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    #[test]
    fn tables_command_runs_with_configured_tables() {
        let ws = Workspace::new();
        ws.run(&["tables"]).unwrap();
        ws.run(&["--output", "json", "tables"]).unwrap();
    }

    #[test]
    fn validate_command_reads_the_report() {
        let ws = Workspace::new();
        let report = ws.dir.join("report.json");
        std::fs::write(
            &report,
            r#"{"components":[{"name":"methane","molar_percent":95}],"temperature_c":20,"pressure_kpa":500}"#,
        )
        .unwrap();
        ws.run(&["--output", "json", "validate", report.to_str().unwrap()])
            .unwrap();

        let missing = ws.dir.join("absent.json");
        assert!(matches!(
            ws.run(&["validate", missing.to_str().unwrap()]),
            Err(CliError::Io(_))
        ));
    }

    #[test]
    fn cep_commands_use_the_configured_store() {
        let ws = Workspace::new();
        let sample = ws.dir.join("sample.json");
        std::fs::write(
            &sample,
            r#"{"bulletin_number":"BOL-1","collection_date":"2024-03-01","components":{"methane":90.1}}"#,
        )
        .unwrap();
        ws.run(&["cep", "ingest", sample.to_str().unwrap()]).unwrap();
        assert!(ws.dir.join("samples.json").exists());
        ws.run(&["--output", "json", "cep", "stats", "methane"]).unwrap();

        assert!(matches!(
            ws.run(&["cep", "clear"]),
            Err(CliError::InvalidInput(_))
        ));
        ws.run(&["cep", "clear", "--yes"]).unwrap();
    }
}
