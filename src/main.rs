//! appenv CLI entry point.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use appenv::cli::commands::{check, keys, show};
use appenv::cli::{Cli, Commands, Verdict};
use appenv::infrastructure::config::SettingsLoader;
use appenv::infrastructure::logging::LoggerImpl;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_mode = cli.json;

    match run(cli) {
        Ok(verdict) => ExitCode::from(verdict.exit_code()),
        Err(err) => ExitCode::from(appenv::cli::handle_error(&err, json_mode)),
    }
}

fn run(cli: Cli) -> Result<Verdict> {
    let mut settings = SettingsLoader::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
        SettingsLoader::validate(&settings)?;
    }

    // Keep the guard alive so buffered file logs flush on exit.
    let _logger = LoggerImpl::init(&settings.logging)?;

    match cli.command {
        Commands::Check(args) => check::execute(args, &settings, cli.json),
        Commands::Show(args) => show::execute(args, &settings, cli.json),
        Commands::Keys => keys::execute(cli.json),
    }
}
