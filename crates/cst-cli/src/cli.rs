//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// csTimer export analyzer.
///
/// Converts a raw csTimer export into a normalized session/solve model and
/// derives summary statistics from it.
#[derive(Debug, Parser)]
#[command(name = "cst", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the sessions in an export file.
    Sessions {
        /// Path to the export file. Falls back to `export_path` from config.
        file: Option<PathBuf>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show summary statistics across the whole export.
    Stats {
        /// Path to the export file. Falls back to `export_path` from config.
        file: Option<PathBuf>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Write the normalized model as JSON to stdout.
    Convert {
        /// Path to the export file. Falls back to `export_path` from config.
        file: Option<PathBuf>,

        /// Embed the unified timestamp index in the output.
        #[arg(long)]
        index: bool,
    },
}
