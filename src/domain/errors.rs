//! Validation errors produced while loading environment configuration.

use serde::Serialize;
use thiserror::Error;

use super::models::keys::SettingKey;

/// A single problem with one environment key.
///
/// Variants never carry the value of a sensitive key.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SettingError {
    #[error("{key} is required but not set (expected {expected})")]
    MissingKey {
        key: SettingKey,
        expected: &'static str,
    },

    #[error("{key} has invalid boolean {value:?} (expected {expected})")]
    InvalidBoolean {
        key: SettingKey,
        value: String,
        expected: &'static str,
    },

    #[error("{key} has invalid port {value:?}: {reason} (expected {expected})")]
    InvalidPort {
        key: SettingKey,
        value: String,
        reason: String,
        expected: &'static str,
    },

    #[error("{key} is not a valid list: {reason} (expected {expected})")]
    InvalidListSyntax {
        key: SettingKey,
        reason: String,
        expected: &'static str,
    },

    #[error("{key} contains unknown HTTP method {method:?} (expected {expected})")]
    UnknownHttpMethod {
        key: SettingKey,
        method: String,
        expected: &'static str,
    },

    #[error("{key} has invalid format: {detail} (expected {expected})")]
    InvalidFormat {
        key: SettingKey,
        detail: String,
        expected: &'static str,
    },
}

impl SettingError {
    /// The key this error is about.
    pub const fn key(&self) -> SettingKey {
        match self {
            Self::MissingKey { key, .. }
            | Self::InvalidBoolean { key, .. }
            | Self::InvalidPort { key, .. }
            | Self::InvalidListSyntax { key, .. }
            | Self::UnknownHttpMethod { key, .. }
            | Self::InvalidFormat { key, .. } => *key,
        }
    }

    /// Description of the shape the key should have had.
    pub const fn expected(&self) -> &'static str {
        match self {
            Self::MissingKey { expected, .. }
            | Self::InvalidBoolean { expected, .. }
            | Self::InvalidPort { expected, .. }
            | Self::InvalidListSyntax { expected, .. }
            | Self::UnknownHttpMethod { expected, .. }
            | Self::InvalidFormat { expected, .. } => expected,
        }
    }

    /// Stable snake_case name of the variant.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingKey { .. } => "missing_key",
            Self::InvalidBoolean { .. } => "invalid_boolean",
            Self::InvalidPort { .. } => "invalid_port",
            Self::InvalidListSyntax { .. } => "invalid_list_syntax",
            Self::UnknownHttpMethod { .. } => "unknown_http_method",
            Self::InvalidFormat { .. } => "invalid_format",
        }
    }
}

fn format_errors(errors: &[SettingError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn count_label(errors: &[SettingError]) -> String {
    match errors.len() {
        1 => "1 problem".to_string(),
        n => format!("{n} problems"),
    }
}

/// Every problem found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "invalid environment configuration ({}):\n{}",
    count_label(.errors),
    format_errors(.errors)
)]
pub struct ConfigError {
    errors: Vec<SettingError>,
}

impl ConfigError {
    pub(crate) const fn new(errors: Vec<SettingError>) -> Self {
        Self { errors }
    }

    /// All collected errors, in validation order.
    pub fn errors(&self) -> &[SettingError] {
        &self.errors
    }

    /// Errors about one key.
    pub fn for_key(&self, key: SettingKey) -> impl Iterator<Item = &SettingError> {
        self.errors.iter().filter(move |e| e.key() == key)
    }

    /// Keys with at least one error, without repeats.
    pub fn keys(&self) -> Vec<SettingKey> {
        let mut keys: Vec<SettingKey> = Vec::new();
        for error in &self.errors {
            if !keys.contains(&error.key()) {
                keys.push(error.key());
            }
        }
        keys
    }

    pub fn into_errors(self) -> Vec<SettingError> {
        self.errors
    }
}
