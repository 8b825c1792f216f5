use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::models::keys::SettingKey;

/// Errors raised while collecting raw key/value pairs.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read environment file {}: {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Flat, unvalidated key/value mapping handed to the loader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEnvironment {
    values: BTreeMap<String, String>,
}

impl RawEnvironment {
    /// Build from explicit pairs. Later duplicates win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Snapshot the current process environment. Non UTF-8 entries are skipped.
    pub fn from_process_env() -> Self {
        let values = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { values }
    }

    /// Read a dotenv file without touching the process environment.
    ///
    /// Quoting follows shell rules, except that an unquoted value starting
    /// with `[` keeps its literal text so JSON lists survive as written.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let to_error = |source| SourceError::EnvFile {
            path: path.to_path_buf(),
            source,
        };

        let contents = std::fs::read_to_string(path)
            .map_err(|e| to_error(dotenvy::Error::Io(e)))?;
        let contents = quote_bare_lists(&contents);

        let mut values = BTreeMap::new();
        for item in dotenvy::from_read_iter(contents.as_bytes()) {
            let (key, value) = item.map_err(to_error)?;
            values.insert(key, value);
        }
        tracing::debug!(path = %path.display(), entries = values.len(), "read environment file");
        Ok(Self { values })
    }

    /// Overlay `other` on top of `self`.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.values.extend(other.values);
        self
    }

    pub fn get(&self, key: SettingKey) -> Option<&str> {
        self.values.get(key.as_str()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys present that the loader does not read.
    ///
    /// Only meaningful for env files; a process environment carries plenty of
    /// unrelated variables.
    pub fn unrecognized_keys(&self) -> Vec<&str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|k| k.parse::<SettingKey>().is_err())
            .collect()
    }
}

/// Single-quote every unquoted `KEY=[...]` value.
fn quote_bare_lists(contents: &str) -> String {
    contents
        .lines()
        .map(quote_bare_list_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote_bare_list_line(line: &str) -> Cow<'_, str> {
    let Some((assignment, value)) = line.split_once('=') else {
        return Cow::Borrowed(line);
    };
    let key = assignment.trim();
    let key = key.strip_prefix("export ").map_or(key, str::trim_start);
    let is_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.'));

    let value = value.trim();
    if !is_key || !value.starts_with('[') || value.contains('\'') {
        return Cow::Borrowed(line);
    }
    let Some(end) = value.rfind(']') else {
        return Cow::Borrowed(line);
    };
    let (literal, comment) = value.split_at(end + 1);
    let comment = comment.trim();
    if !comment.is_empty() && !comment.starts_with('#') {
        return Cow::Borrowed(line);
    }
    Cow::Owned(
        format!("{assignment}='{literal}' {comment}")
            .trim_end()
            .to_string(),
    )
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
