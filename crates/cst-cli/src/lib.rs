//! csTimer export analyzer CLI library.
//!
//! This crate provides the CLI interface over the `cst-core` pipeline.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
