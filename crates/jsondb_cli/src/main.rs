//! jsondb CLI
//!
//! Command-line tools for jsondb database files.
//!
//! # Commands
//!
//! - `inspect` - Display collection and file statistics
//! - `verify` - Verify that the file parses and ids are unique
//! - `sweep` - Remove expired documents from every collection
//! - `backup` - Create, restore, or describe backup files

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// jsondb command-line database tools.
#[derive(Parser)]
#[command(name = "jsondb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display database statistics
    Inspect {
        /// Show per-collection counts
        #[arg(short, long)]
        collections: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Verify database integrity
    Verify,

    /// Remove expired documents
    Sweep {
        /// Dry run - report what would be removed
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Backup and restore
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum BackupAction {
    /// Copy the database file to OUTPUT
    Create {
        /// Backup file to write
        output: PathBuf,
    },

    /// Replace the database contents with INPUT
    Restore {
        /// Backup file to read
        input: PathBuf,
    },

    /// Describe a backup file without restoring it
    Info {
        /// Backup file to read
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Inspect {
            collections,
            format,
        } => {
            let path = cli.path.ok_or("Database path required for inspect")?;
            commands::inspect::run(&path, collections, &format)?;
        }
        Commands::Verify => {
            let path = cli.path.ok_or("Database path required for verify")?;
            commands::verify::run(&path)?;
        }
        Commands::Sweep { dry_run } => {
            let path = cli.path.ok_or("Database path required for sweep")?;
            commands::sweep::run(&path, dry_run)?;
        }
        Commands::Backup { action } => match action {
            BackupAction::Create { output } => {
                let path = cli.path.ok_or("Database path required for backup create")?;
                commands::backup::create(&path, &output)?;
            }
            BackupAction::Restore { input } => {
                let path = cli.path.ok_or("Database path required for backup restore")?;
                commands::backup::restore(&path, &input)?;
            }
            BackupAction::Info { input } => {
                commands::backup::info(&input)?;
            }
        },
        Commands::Version => {
            println!("jsondb CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("jsondb Core v{}", jsondb_core::VERSION);
        }
    }

    Ok(())
}
