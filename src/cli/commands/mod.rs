//! Command implementations and the pieces they share.

pub mod check;
pub mod keys;
pub mod show;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::domain::models::config::AppenvSettings;
use crate::infrastructure::config::RawEnvironment;

/// Where the raw key/value pairs come from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Dotenv file to validate (defaults to the process environment)
    #[arg(short = 'f', long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Overlay the process environment on top of the env file
    #[arg(long)]
    pub process_env: bool,
}

/// Raw environment plus a description of where it came from.
#[derive(Debug)]
pub struct CollectedEnvironment {
    pub environment: RawEnvironment,
    pub origin: String,
    /// Keys in the env file the loader never reads
    pub unrecognized_keys: Vec<String>,
}

impl SourceArgs {
    /// Resolve flags against the tool settings and read the environment.
    ///
    /// Command-line flags win over settings. Without any env file the process
    /// environment is checked on its own.
    pub fn collect(&self, settings: &AppenvSettings) -> Result<CollectedEnvironment> {
        let env_file = self.env_file.as_ref().or(settings.env_file.as_ref());
        let overlay_process = self.process_env || settings.process_env;

        let Some(path) = env_file else {
            return Ok(CollectedEnvironment {
                environment: RawEnvironment::from_process_env(),
                origin: "process environment".to_string(),
                unrecognized_keys: Vec::new(),
            });
        };

        let file_env = RawEnvironment::from_env_file(path)
            .with_context(|| format!("Failed to read env file {}", path.display()))?;
        let unrecognized_keys = file_env
            .unrecognized_keys()
            .into_iter()
            .map(str::to_string)
            .collect();

        let (environment, origin) = if overlay_process {
            (
                file_env.merge(RawEnvironment::from_process_env()),
                format!("{} + process environment", path.display()),
            )
        } else {
            (file_env, path.display().to_string())
        };

        Ok(CollectedEnvironment {
            environment,
            origin,
            unrecognized_keys,
        })
    }
}

/// Outcome of a command, mapped onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Valid,
    Invalid,
    WarningsInStrict,
}

impl Verdict {
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Valid => 0,
            Self::Invalid => 1,
            Self::WarningsInStrict => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_verdict_exit_codes() {
        assert_eq!(Verdict::Valid.exit_code(), 0);
        assert_eq!(Verdict::Invalid.exit_code(), 1);
        assert_eq!(Verdict::WarningsInStrict.exit_code(), 2);
    }

    #[test]
    fn test_collect_env_file_only() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "SECRET_KEY=abc\nLEGACY_FLAG=1").unwrap();
        file.flush().unwrap();

        let args = SourceArgs {
            env_file: Some(file.path().to_path_buf()),
            process_env: false,
        };
        let collected = args.collect(&AppenvSettings::default()).unwrap();

        assert_eq!(collected.environment.len(), 2);
        assert_eq!(collected.unrecognized_keys, vec!["LEGACY_FLAG".to_string()]);
        assert_eq!(collected.origin, file.path().display().to_string());
    }

    #[test]
    fn test_collect_uses_settings_env_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "DEBUG=true").unwrap();
        file.flush().unwrap();

        let settings = AppenvSettings {
            env_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let collected = SourceArgs::default().collect(&settings).unwrap();
        assert_eq!(
            collected.environment.get(crate::domain::models::SettingKey::Debug),
            Some("true")
        );
    }

    #[test]
    fn test_collect_process_env_overlay_wins() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "EMAIL_PORT=25").unwrap();
        file.flush().unwrap();

        temp_env::with_var("EMAIL_PORT", Some("587"), || {
            let args = SourceArgs {
                env_file: Some(file.path().to_path_buf()),
                process_env: true,
            };
            let collected = args.collect(&AppenvSettings::default()).unwrap();
            assert_eq!(
                collected.environment.get(crate::domain::models::SettingKey::EmailPort),
                Some("587")
            );
            assert!(collected.origin.ends_with("+ process environment"));
            assert!(collected.unrecognized_keys.is_empty());
        });
    }

    #[test]
    fn test_collect_missing_file_is_error() {
        let args = SourceArgs {
            env_file: Some(PathBuf::from("/nonexistent/.env")),
            process_env: false,
        };
        let err = args.collect(&AppenvSettings::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to read env file"));
    }
}
