//! CLI subcommand implementations.

pub mod convert;
pub mod sessions;
pub mod stats;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cst_core::{NormalizedData, normalize_export};

use crate::Config;

/// Resolves the export path from the CLI argument or configuration.
pub fn resolve_export_path(file: Option<&Path>, config: &Config) -> Result<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| config.export_path.clone())
        .context("no export file given; pass a path or set export_path in config")
}

/// Reads and normalizes an export file.
///
/// Non-fatal conversion warnings are emitted as tracing events by the core;
/// only decode failures surface here.
pub fn load_export(path: &Path) -> Result<NormalizedData> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let outcome =
        normalize_export(&raw).with_context(|| format!("failed to convert {}", path.display()))?;
    Ok(outcome.data)
}
