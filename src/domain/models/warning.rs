use serde::Serialize;
use std::fmt;

use super::keys::SettingKey;

/// Soft cross-field finding. Logged at startup, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyWarning {
    /// `DEBUG` is on while the host allow-list names non-local hosts.
    DebugWithPublicHosts { hosts: Vec<String> },

    /// `CORS_ALLOWED_ORIGINS` is set but allow-all overrides it.
    AllowedOriginsIgnored { origins: usize },

    /// Credentials are allowed for every origin.
    CredentialsWithWildcardOrigins,

    /// `DEBUG` is off and no host is allowed, so host checking rejects everything.
    NoAllowedHosts,

    /// STARTTLS requested on the implicit-TLS port.
    StartTlsOnImplicitTlsPort { port: u16 },

    /// `DEBUG` is off but the mail backend never sends anything.
    MailNotDelivered { backend: String },
}

impl PolicyWarning {
    /// Keys involved in the finding.
    pub fn keys(&self) -> Vec<SettingKey> {
        match self {
            Self::DebugWithPublicHosts { .. } => vec![SettingKey::Debug, SettingKey::AllowedHosts],
            Self::AllowedOriginsIgnored { .. } => {
                vec![SettingKey::CorsAllowAllOrigins, SettingKey::CorsAllowedOrigins]
            }
            Self::CredentialsWithWildcardOrigins => {
                vec![SettingKey::CorsAllowCredentials, SettingKey::CorsAllowAllOrigins]
            }
            Self::NoAllowedHosts => vec![SettingKey::Debug, SettingKey::AllowedHosts],
            Self::StartTlsOnImplicitTlsPort { .. } => {
                vec![SettingKey::EmailUseTls, SettingKey::EmailPort]
            }
            Self::MailNotDelivered { .. } => vec![SettingKey::Debug, SettingKey::EmailBackend],
        }
    }
}

impl fmt::Display for PolicyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DebugWithPublicHosts { hosts } => write!(
                f,
                "debug mode with public host allow-list ({})",
                hosts.join(", ")
            ),
            Self::AllowedOriginsIgnored { origins } => write!(
                f,
                "explicit origin list is ignored while allow-all is enabled ({origins} origin(s) listed)"
            ),
            Self::CredentialsWithWildcardOrigins => f.write_str(
                "credentialed requests with wildcard origins is a common misconfiguration",
            ),
            Self::NoAllowedHosts => f.write_str(
                "no allowed hosts while debug is off; every request will be rejected",
            ),
            Self::StartTlsOnImplicitTlsPort { port } => write!(
                f,
                "EMAIL_USE_TLS requests STARTTLS but port {port} expects implicit TLS"
            ),
            Self::MailNotDelivered { backend } => write!(
                f,
                "mail backend {backend} does not deliver mail while debug is off"
            ),
        }
    }
}
