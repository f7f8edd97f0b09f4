use std::io::stdout;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cst_cli::commands::{self, convert, sessions, stats};
use cst_cli::{Cli, Commands, Config};

/// Load config, resolve the export path, and normalize the file.
fn load_data(config_path: Option<&Path>, file: Option<&Path>) -> Result<cst_core::NormalizedData> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let path = commands::resolve_export_path(file, &config)?;
    commands::load_export(&path)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Sessions { file, json }) => {
            let data = load_data(cli.config.as_deref(), file.as_deref())?;
            sessions::run(&mut stdout().lock(), &data, *json)?;
        }
        Some(Commands::Stats { file, json }) => {
            let data = load_data(cli.config.as_deref(), file.as_deref())?;
            stats::run(&mut stdout().lock(), &data, *json)?;
        }
        Some(Commands::Convert { file, index }) => {
            let data = load_data(cli.config.as_deref(), file.as_deref())?;
            convert::run(&mut stdout().lock(), &data, *index)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
