//! Binary entry point for promptmenu.
//!
//! This binary provides the CLI for managing prompt menus and moving them in
//! and out of CSV files.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use commands::{ImportArgs, cmd_config, cmd_export, cmd_import, cmd_list, cmd_restore_defaults};
use promptmenu::PromptMenuConfig;
use promptmenu::observability;
use promptmenu::storage::FilesystemMenuStore;

/// promptmenu - hierarchical prompt menus with CSV import and export.
#[derive(Parser)]
#[command(name = "promptmenu")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Menu store file (overrides configuration).
    #[arg(long, global = true, env = "PROMPTMENU_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Export all menus to a CSV file.
    Export {
        /// Output `.csv` file or directory (default: configured export directory).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the CSV text instead of writing a file.
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Import menus from a CSV file.
    Import {
        /// CSV file to import.
        file: PathBuf,

        /// Top-level folder receiving the menus.
        #[arg(short, long)]
        folder: Option<String>,

        /// Fail if the target folder does not exist.
        #[arg(long)]
        no_create: bool,

        /// Import menus even when the title already exists in the folder.
        #[arg(long)]
        overwrite: bool,

        /// Validate and report without saving.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the menu tree.
    List,

    /// Re-add missing default menus.
    RestoreDefaults,

    /// Show configuration.
    Config {
        /// Print the effective configuration.
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match PromptMenuConfig::discover(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(Some(&config.logging), cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
async fn run_command(cli: Cli, config: PromptMenuConfig) -> anyhow::Result<()> {
    let store = FilesystemMenuStore::new(cli.store.unwrap_or_else(|| config.store_path()));
    tracing::debug!(store = %store.path().display(), "using menu store");

    match cli.command {
        Commands::Export { output, stdout } => cmd_export(&config, &store, output, stdout).await,

        Commands::Import {
            file,
            folder,
            no_create,
            overwrite,
            dry_run,
        } => {
            let args = ImportArgs {
                file,
                folder,
                no_create,
                overwrite,
                dry_run,
            };
            cmd_import(&config, &store, args).await
        },

        Commands::List => cmd_list(&store),

        Commands::RestoreDefaults => cmd_restore_defaults(&store),

        Commands::Config { show } => cmd_config(&config, show),
    }
}
