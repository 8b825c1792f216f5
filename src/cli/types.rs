//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::check::CheckArgs;
use super::commands::show::ShowArgs;

#[derive(Parser, Debug)]
#[command(name = "appenv")]
#[command(about = "appenv - validate application environment configuration", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Settings file for appenv itself (defaults to ./appenv.yaml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the configured log level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate an environment and report every problem
    Check(CheckArgs),

    /// Print the validated configuration with secrets redacted
    Show(ShowArgs),

    /// List recognized keys with their defaults
    Keys,
}
