//! Command-line interface for appenv.

pub mod commands;
pub mod display;
pub mod output;
pub mod types;

pub use commands::Verdict;
pub use types::{Cli, Commands};

use colored::Colorize;

/// Print a top-level failure and return the exit code for it.
///
/// Operational failures (unreadable env file, bad settings) exit with 1, the
/// same as an invalid environment.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> u8 {
    tracing::error!(error = %format!("{err:#}"), "command failed");
    if json_mode {
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        let body = serde_json::json!({ "error": err.to_string(), "causes": chain });
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );
    } else {
        eprintln!("{} {err:#}", "Error:".red().bold());
    }
    Verdict::Invalid.exit_code()
}
