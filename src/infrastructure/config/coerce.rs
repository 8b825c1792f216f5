//! String-to-typed coercion for individual environment values.
//!
//! Every function takes the raw (already trimmed, non-blank) value and the key
//! it came from, and returns a [`SettingError`] naming that key on failure.

use std::net::Ipv4Addr;

use url::{Host, Url};

use crate::domain::errors::SettingError;
use crate::domain::models::keys::SettingKey;
use crate::domain::models::settings::HttpMethod;

/// `true`/`false`, `1`/`0`, `yes`/`no`, any case.
pub fn parse_bool(key: SettingKey, raw: &str) -> Result<bool, SettingError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(SettingError::InvalidBoolean {
            key,
            value: raw.to_string(),
            expected: key.expected(),
        }),
    }
}

/// Base-10 digits only, 1 through 65535.
pub fn parse_port(key: SettingKey, raw: &str) -> Result<u16, SettingError> {
    let invalid = |reason: &str| SettingError::InvalidPort {
        key,
        value: raw.to_string(),
        reason: reason.to_string(),
        expected: key.expected(),
    };

    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("not a base-10 integer"));
    }
    // Digits only, so the only parse failure left is overflow.
    let value: u64 = digits.parse().map_err(|_| invalid("out of range"))?;
    match u16::try_from(value) {
        Ok(0) | Err(_) => Err(invalid("out of range")),
        Ok(port) => Ok(port),
    }
}

/// Parse a JSON array of strings, trimming each entry.
///
/// Anything else (objects, numbers, nested arrays, Python-style quotes) is
/// rejected rather than guessed at.
pub fn parse_list(key: SettingKey, raw: &str) -> Result<Vec<String>, SettingError> {
    let invalid = |reason: String| SettingError::InvalidListSyntax {
        key,
        reason,
        expected: key.expected(),
    };

    let literal = raw.trim();
    let items: Vec<String> = serde_json::from_str(literal).map_err(|e| {
        if looks_unquoted(literal) {
            invalid(format!(
                "array elements must be double-quoted strings ({e}); \
                 when exporting from a shell wrap the whole value in single quotes"
            ))
        } else {
            invalid(e.to_string())
        }
    })?;

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let trimmed = item.trim();
            if trimmed.is_empty() {
                Err(invalid(format!("entry {index} is blank")))
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}

/// `[a, b]` with no double quotes: usually a shell or dotenv ate them.
fn looks_unquoted(literal: &str) -> bool {
    literal.starts_with('[')
        && literal.ends_with(']')
        && literal.len() > 2
        && !literal.contains('"')
}

/// Drop repeats, keeping the first occurrence.
pub fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    dedup_by_key(items, String::clone)
}

/// Drop repeats under ASCII case folding, keeping the first spelling.
pub fn dedup_case_insensitive(items: Vec<String>) -> Vec<String> {
    dedup_by_key(items, |item| item.to_ascii_lowercase())
}

fn dedup_by_key<F>(items: Vec<String>, key: F) -> Vec<String>
where
    F: Fn(&String) -> String,
{
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// Map every entry to an [`HttpMethod`], reporting each unknown entry.
pub fn parse_methods(
    key: SettingKey,
    items: &[String],
) -> Result<Vec<HttpMethod>, Vec<SettingError>> {
    let mut methods = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for item in items {
        match item.parse::<HttpMethod>() {
            Ok(method) if !methods.contains(&method) => methods.push(method),
            Ok(_) => {}
            Err(_) => errors.push(SettingError::UnknownHttpMethod {
                key,
                method: item.clone(),
                expected: key.expected(),
            }),
        }
    }
    if errors.is_empty() {
        Ok(methods)
    } else {
        Err(errors)
    }
}

fn invalid_format(key: SettingKey, detail: String) -> SettingError {
    SettingError::InvalidFormat {
        key,
        detail,
        expected: key.expected(),
    }
}

/// Absolute URL with a scheme and a host.
pub fn check_absolute_url(key: SettingKey, value: &str) -> Result<(), SettingError> {
    let url = Url::parse(value)
        .map_err(|e| invalid_format(key, format!("{value:?} is not an absolute URL ({e})")))?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid_format(key, format!("{value:?} has no host"))),
    }
}

/// Either an absolute URL, or a bare host pattern: `*`, a domain, a
/// `.domain` wildcard, an IPv4 address, or a bracketed IPv6 address.
pub fn check_host_entry(key: SettingKey, value: &str) -> Result<(), SettingError> {
    if value.contains("://") {
        return check_host_url(key, value);
    }
    if value == "*" {
        return Ok(());
    }

    let not_a_host = || invalid_format(key, format!("{value:?} is not a host name"));
    let host = value.strip_prefix('.').unwrap_or(value);
    if host.starts_with('[') {
        return Host::parse(host)
            .map(|_| ())
            .map_err(|e| invalid_format(key, format!("{value:?} is not a host name ({e})")));
    }
    if host.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return host.parse::<Ipv4Addr>().map(|_| ()).map_err(|_| not_a_host());
    }
    if is_domain_name(host) {
        Ok(())
    } else {
        Err(not_a_host())
    }
}

/// URL form of a host entry. Credentials are rejected without echoing them.
fn check_host_url(key: SettingKey, value: &str) -> Result<(), SettingError> {
    let url = Url::parse(value)
        .map_err(|e| invalid_format(key, format!("entry is not an absolute URL ({e})")))?;
    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid_format(
            key,
            "URL entry must not carry user credentials".to_string(),
        ));
    }
    match url.host() {
        Some(Host::Domain(domain)) if is_domain_name(domain) => Ok(()),
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => Ok(()),
        Some(Host::Domain(_)) => Err(invalid_format(
            key,
            format!("{value:?} does not name a valid host"),
        )),
        None => Err(invalid_format(key, format!("{value:?} has no host"))),
    }
}

/// Dot-separated labels of letters, digits and inner hyphens. One trailing
/// dot is allowed.
fn is_domain_name(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    !host.is_empty()
        && host.len() <= 253
        && host.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
}

/// `local@domain` or `Display Name <local@domain>`.
pub fn check_email(key: SettingKey, value: &str) -> Result<(), SettingError> {
    let address = match (value.rfind('<'), value.strip_suffix('>')) {
        (Some(open), Some(inner)) => &inner[open + 1..],
        (None, None) => value,
        _ => {
            return Err(invalid_format(
                key,
                format!("{value:?} has an unbalanced <address> part"),
            ))
        }
    };

    let Some((local, domain)) = address.rsplit_once('@') else {
        return Err(invalid_format(key, format!("{value:?} has no '@'")));
    };
    let bad_char = |s: &str| s.chars().any(|c| c.is_whitespace() || c == '@');
    if local.is_empty() || bad_char(local) {
        return Err(invalid_format(key, format!("{value:?} has an invalid local part")));
    }
    if domain.is_empty() || bad_char(domain) || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid_format(key, format!("{value:?} has an invalid domain")));
    }
    Ok(())
}

/// Dotted identifier path such as `package.module.Class`.
pub fn check_dotted_path(key: SettingKey, value: &str) -> Result<(), SettingError> {
    let valid_segment = |s: &str| {
        let mut chars = s.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    if value.contains('.') && value.split('.').all(valid_segment) {
        Ok(())
    } else {
        Err(invalid_format(
            key,
            format!("{value:?} is not a dotted identifier path"),
        ))
    }
}
