//! Cross-field policy checks.
//!
//! These run only on an otherwise valid [`TypedConfig`] and never fail the
//! load; findings are logged and attached to the config.

use crate::domain::models::settings::{host_of, TypedConfig};
use crate::domain::models::warning::PolicyWarning;

/// Implicit-TLS SMTP submission port.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Evaluate every soft rule against `config`.
pub fn evaluate(config: &TypedConfig) -> Vec<PolicyWarning> {
    let mut warnings = Vec::new();
    let cors = config.cors();

    if config.debug() {
        let public: Vec<String> = config
            .allowed_hosts()
            .iter()
            .filter(|entry| !is_local_host_entry(entry))
            .cloned()
            .collect();
        if !public.is_empty() {
            warnings.push(PolicyWarning::DebugWithPublicHosts { hosts: public });
        }
    } else if config.allowed_hosts().is_empty() {
        warnings.push(PolicyWarning::NoAllowedHosts);
    }

    if cors.allow_all_origins() && !cors.allowed_origins().is_empty() {
        warnings.push(PolicyWarning::AllowedOriginsIgnored {
            origins: cors.allowed_origins().len(),
        });
    }

    if cors.allow_credentials() && cors.allow_all_origins() {
        warnings.push(PolicyWarning::CredentialsWithWildcardOrigins);
    }

    let email = config.email();
    if email.use_tls() && email.port() == IMPLICIT_TLS_PORT {
        warnings.push(PolicyWarning::StartTlsOnImplicitTlsPort { port: email.port() });
    }

    if !config.debug() && !email.transport().delivers() {
        warnings.push(PolicyWarning::MailNotDelivered {
            backend: email.backend().to_string(),
        });
    }

    warnings
}

/// Whether an allow-list entry only admits the local machine.
pub fn is_local_host_entry(entry: &str) -> bool {
    let host = host_of(entry).unwrap_or_else(|| entry.to_string());
    let host = host.trim_start_matches('[').trim_end_matches(']');
    host.eq_ignore_ascii_case("localhost")
        || host.to_ascii_lowercase().ends_with(".localhost")
        || matches!(host, "127.0.0.1" | "::1" | "0.0.0.0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_host_entries() {
        for local in [
            "localhost",
            "LOCALHOST",
            "api.localhost",
            "127.0.0.1",
            "[::1]",
            "0.0.0.0",
            "http://localhost:8000",
            "http://127.0.0.1",
            "http://[::1]:8000",
        ] {
            assert!(is_local_host_entry(local), "{local}");
        }
        for public in ["example.com", "*", ".example.com", "http://example.com", "10.0.0.5"] {
            assert!(!is_local_host_entry(public), "{public}");
        }
    }
}
