//! Implementation of the `appenv keys` command.

use anyhow::Result;
use serde::Serialize;

use super::Verdict;
use crate::cli::display::{list_table, render_list};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{SettingKey, ValueShape};

#[derive(Debug, Serialize)]
pub struct KeyEntry {
    pub key: SettingKey,
    pub shape: ValueShape,
    pub required: bool,
    pub default: Option<&'static str>,
    pub sensitive: bool,
    pub expected: &'static str,
}

impl From<SettingKey> for KeyEntry {
    fn from(key: SettingKey) -> Self {
        Self {
            key,
            shape: key.shape(),
            required: key.is_required(),
            default: key.default_literal(),
            sensitive: key.is_sensitive(),
            expected: key.expected(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KeysOutput {
    pub keys: Vec<KeyEntry>,
}

impl CommandOutput for KeysOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["key", "shape", "default", "sensitive"]);
        for entry in &self.keys {
            let default = match entry.default {
                None => "(required)".to_string(),
                Some("") => "\"\"".to_string(),
                Some(literal) => literal.to_string(),
            };
            table.add_row(vec![
                entry.key.to_string(),
                format!("{:?}", entry.shape).to_lowercase(),
                default,
                if entry.sensitive { "yes" } else { "" }.to_string(),
            ]);
        }
        render_list("key", &table, self.keys.len())
    }
}

pub fn execute(json_mode: bool) -> Result<Verdict> {
    let out = KeysOutput {
        keys: SettingKey::ALL.into_iter().map(KeyEntry::from).collect(),
    };
    output(&out, json_mode);
    Ok(Verdict::Valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_keys_have_no_default() {
        let entries: Vec<KeyEntry> = SettingKey::ALL.into_iter().map(KeyEntry::from).collect();
        let required: Vec<SettingKey> = entries
            .iter()
            .filter(|e| e.required)
            .map(|e| e.key)
            .collect();

        assert_eq!(
            required,
            vec![
                SettingKey::SecretKey,
                SettingKey::EmailHost,
                SettingKey::DefaultFromEmail,
                SettingKey::FrontendUrl,
            ]
        );
        assert!(entries.iter().filter(|e| e.required).all(|e| e.default.is_none()));
    }

    #[test]
    fn test_json_lists_all_keys() {
        let out = KeysOutput {
            keys: SettingKey::ALL.into_iter().map(KeyEntry::from).collect(),
        };
        let json = out.to_json();
        let keys = json["keys"].as_array().unwrap();
        assert_eq!(keys.len(), 18);
        assert_eq!(keys[0]["key"], "SECRET_KEY");
        assert_eq!(keys[0]["sensitive"], true);
        assert_eq!(keys[0]["shape"], "text");
    }
}
