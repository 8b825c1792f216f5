use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::AppenvSettings;

/// Default project-local settings file.
pub const SETTINGS_FILE: &str = "appenv.yaml";

/// Prefix for environment overrides of tool settings.
pub const ENV_PREFIX: &str = "APPENV_";

/// Tool settings validation errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Env file path cannot be empty")]
    EmptyEnvFile,

    #[error("Log directory path cannot be empty")]
    EmptyLogDir,
}

/// Loader for `appenv`'s own settings with hierarchical merging
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `appenv.yaml` in the working directory, or `path` when given
    /// 3. Environment variables (`APPENV_*` prefix, `__` separates nesting)
    pub fn load(path: Option<&Path>) -> Result<AppenvSettings> {
        let file = path.unwrap_or_else(|| Path::new(SETTINGS_FILE));
        let settings: AppenvSettings = Self::figment(file)
            .extract()
            .with_context(|| format!("Failed to load appenv settings from {}", file.display()))?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    fn figment(file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(AppenvSettings::default()))
            .merge(Yaml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate settings after loading
    pub fn validate(settings: &AppenvSettings) -> Result<(), SettingsError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&settings.logging.level.to_lowercase().as_str()) {
            return Err(SettingsError::InvalidLogLevel(settings.logging.level.clone()));
        }

        if settings
            .env_file
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(SettingsError::EmptyEnvFile);
        }

        if settings
            .logging
            .log_dir
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(SettingsError::EmptyLogDir);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::{LogFormat, RotationPolicy};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_settings() {
        let settings = AppenvSettings::default();
        assert_eq!(settings.env_file, None);
        assert!(!settings.strict);
        assert_eq!(settings.logging.level, "warn");
        assert_eq!(settings.logging.format, LogFormat::Pretty);
        SettingsLoader::validate(&settings).expect("Default settings should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
env_file: deploy/.env.production
strict: true
logging:
  level: debug
  format: json
  log_dir: /var/log/appenv
  rotation: hourly
";

        let settings: AppenvSettings = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(
            settings.env_file,
            Some(PathBuf::from("deploy/.env.production"))
        );
        assert!(settings.strict);
        assert!(!settings.process_env);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.logging.rotation, RotationPolicy::Hourly);
        assert!(settings.logging.enable_console);

        SettingsLoader::validate(&settings).expect("Parsed settings should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut settings = AppenvSettings::default();
        settings.logging.level = "verbose".to_string();

        match SettingsLoader::validate(&settings).unwrap_err() {
            SettingsError::InvalidLogLevel(level) => assert_eq!(level, "verbose"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_empty_paths() {
        let settings = AppenvSettings {
            env_file: Some(PathBuf::new()),
            ..Default::default()
        };
        assert!(matches!(
            SettingsLoader::validate(&settings),
            Err(SettingsError::EmptyEnvFile)
        ));

        let mut settings = AppenvSettings::default();
        settings.logging.log_dir = Some(PathBuf::new());
        assert!(matches!(
            SettingsLoader::validate(&settings),
            Err(SettingsError::EmptyLogDir)
        ));
    }

    #[test]
    fn test_hierarchical_merging() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "strict: false\nlogging:\n  level: info\n  format: json").unwrap();
        file.flush().unwrap();

        temp_env::with_vars(
            [
                ("APPENV_STRICT", Some("true")),
                ("APPENV_LOGGING__LEVEL", Some("debug")),
            ],
            || {
                let settings = SettingsLoader::load(Some(file.path())).unwrap();
                assert!(settings.strict, "Env should win over file");
                assert_eq!(settings.logging.level, "debug", "Env should win for nested fields");
                assert_eq!(
                    settings.logging.format,
                    LogFormat::Json,
                    "File value should persist when not overridden"
                );
            },
        );
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        temp_env::with_vars_unset(["APPENV_STRICT", "APPENV_LOGGING__LEVEL"], || {
            let settings =
                SettingsLoader::load(Some(Path::new("/nonexistent/appenv.yaml"))).unwrap();
            assert!(!settings.strict);
            assert_eq!(settings.logging.level, "warn");
        });
    }
}
