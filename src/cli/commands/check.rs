//! Implementation of the `appenv check` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::{CollectedEnvironment, SourceArgs, Verdict};
use crate::cli::display::{error_marker, ok_marker, section_header, warning_marker};
use crate::cli::output::{output, CommandOutput};
use crate::domain::errors::{ConfigError, SettingError};
use crate::domain::models::config::AppenvSettings;
use crate::domain::models::{PolicyWarning, SettingKey};
use crate::infrastructure::config::ConfigLoader;

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Treat policy warnings as failures (exit code 2)
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorEntry {
    #[serde(flatten)]
    pub error: SettingError,
    pub message: String,
}

impl From<SettingError> for ErrorEntry {
    fn from(error: SettingError) -> Self {
        let message = error.to_string();
        Self { error, message }
    }
}

#[derive(Debug, Serialize)]
pub struct WarningEntry {
    #[serde(flatten)]
    pub warning: PolicyWarning,
    pub keys: Vec<SettingKey>,
    pub message: String,
}

impl From<&PolicyWarning> for WarningEntry {
    fn from(warning: &PolicyWarning) -> Self {
        Self {
            keys: warning.keys(),
            message: warning.to_string(),
            warning: warning.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub source: String,
    pub verdict: Verdict,
    pub strict: bool,
    pub errors: Vec<ErrorEntry>,
    pub warnings: Vec<WarningEntry>,
    pub unrecognized_keys: Vec<String>,
}

impl CheckOutput {
    /// Report for an environment the loader rejected.
    pub fn rejected(collected: CollectedEnvironment, error: ConfigError) -> Self {
        Self {
            source: collected.origin,
            verdict: Verdict::Invalid,
            strict: false,
            errors: error.into_errors().into_iter().map(ErrorEntry::from).collect(),
            warnings: Vec::new(),
            unrecognized_keys: collected.unrecognized_keys,
        }
    }
}

impl CommandOutput for CheckOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();

        match self.verdict {
            Verdict::Valid => lines.push(format!("{} {} is valid", ok_marker(), self.source)),
            Verdict::Invalid => lines.push(format!(
                "{} {} is invalid: {} problem(s)",
                error_marker(),
                self.source,
                self.errors.len()
            )),
            Verdict::WarningsInStrict => lines.push(format!(
                "{} {} is valid but has {} warning(s) in strict mode",
                error_marker(),
                self.source,
                self.warnings.len()
            )),
        }

        if !self.errors.is_empty() {
            lines.push(section_header("Errors"));
            for entry in &self.errors {
                lines.push(format!("  {} {}", error_marker(), entry.message));
            }
        }

        if !self.warnings.is_empty() {
            lines.push(section_header("Warnings"));
            for entry in &self.warnings {
                lines.push(format!("  {} {}", warning_marker(), entry.message));
            }
        }

        if !self.unrecognized_keys.is_empty() {
            lines.push(section_header("Unrecognized keys"));
            for key in &self.unrecognized_keys {
                lines.push(format!("  - {key}"));
            }
        }

        lines.join("\n")
    }
}

/// Validate the environment and build the report without printing it.
pub fn run(args: &CheckArgs, settings: &AppenvSettings) -> Result<CheckOutput> {
    let collected = args.source.collect(settings)?;
    let strict = args.strict || settings.strict;

    let config = match ConfigLoader::load_raw(&collected.environment) {
        Ok(config) => config,
        Err(error) => {
            let mut report = CheckOutput::rejected(collected, error);
            report.strict = strict;
            return Ok(report);
        }
    };

    let warnings: Vec<WarningEntry> = config.warnings().iter().map(WarningEntry::from).collect();
    let verdict = if strict && !warnings.is_empty() {
        Verdict::WarningsInStrict
    } else {
        Verdict::Valid
    };

    Ok(CheckOutput {
        source: collected.origin,
        verdict,
        strict,
        errors: Vec::new(),
        warnings,
        unrecognized_keys: collected.unrecognized_keys,
    })
}

pub fn execute(args: CheckArgs, settings: &AppenvSettings, json_mode: bool) -> Result<Verdict> {
    let report = run(&args, settings)?;
    output(&report, json_mode);
    Ok(report.verdict)
}
