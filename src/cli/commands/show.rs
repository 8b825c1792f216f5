//! Implementation of the `appenv show` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::check::{CheckOutput, WarningEntry};
use super::{SourceArgs, Verdict};
use crate::cli::display::{colorize_value, list_table, section_header, warning_marker};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::config::AppenvSettings;
use crate::domain::models::{SettingKey, TypedConfig};
use crate::infrastructure::config::{ConfigLoader, RawEnvironment};

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Whether a value was supplied or filled in from the documented default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueOrigin {
    Set,
    Default,
}

#[derive(Debug, Serialize)]
pub struct SettingRow {
    pub key: SettingKey,
    pub value: String,
    pub origin: ValueOrigin,
    pub sensitive: bool,
}

#[derive(Debug, Serialize)]
pub struct ShowOutput {
    pub source: String,
    pub settings: Vec<SettingRow>,
    pub warnings: Vec<WarningEntry>,
}

impl ShowOutput {
    pub fn new(source: String, environment: &RawEnvironment, config: &TypedConfig) -> Self {
        let settings = SettingKey::ALL
            .into_iter()
            .map(|key| {
                let supplied = environment.get(key).is_some_and(|v| !v.trim().is_empty());
                SettingRow {
                    key,
                    value: config.render_value(key),
                    origin: if supplied {
                        ValueOrigin::Set
                    } else {
                        ValueOrigin::Default
                    },
                    sensitive: key.is_sensitive(),
                }
            })
            .collect();

        Self {
            source,
            settings,
            warnings: config.warnings().iter().map(WarningEntry::from).collect(),
        }
    }
}

impl CommandOutput for ShowOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["key", "value", "origin"]);
        for row in &self.settings {
            let is_default = row.origin == ValueOrigin::Default;
            table.add_row(vec![
                row.key.to_string(),
                colorize_value(&row.value, is_default).to_string(),
                if is_default { "default" } else { "set" }.to_string(),
            ]);
        }

        let mut lines = vec![format!("Configuration from {}", self.source), table.to_string()];
        if !self.warnings.is_empty() {
            lines.push(section_header("Warnings"));
            for entry in &self.warnings {
                lines.push(format!("  {} {}", warning_marker(), entry.message));
            }
        }
        lines.join("\n")
    }
}

pub fn execute(args: ShowArgs, settings: &AppenvSettings, json_mode: bool) -> Result<Verdict> {
    let collected = args.source.collect(settings)?;

    match ConfigLoader::load_raw(&collected.environment) {
        Ok(config) => {
            output(
                &ShowOutput::new(collected.origin, &collected.environment, &config),
                json_mode,
            );
            Ok(Verdict::Valid)
        }
        Err(error) => {
            output(&CheckOutput::rejected(collected, error), json_mode);
            Ok(Verdict::Invalid)
        }
    }
}
