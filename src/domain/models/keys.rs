//! Recognized environment keys and their value shapes.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Shape of the raw string a key carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    /// Free-form string
    Text,
    /// Closed boolean vocabulary
    Boolean,
    /// Base-10 TCP port
    Port,
    /// JSON array of strings, deduplicated
    Set,
    /// JSON array of strings, order and duplicates kept
    Sequence,
}

/// Every environment key the loader reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKey {
    SecretKey,
    Debug,
    AllowedHosts,
    CorsAllowAllOrigins,
    CorsAllowCredentials,
    CorsAllowedOrigins,
    CorsAllowHeaders,
    CorsAllowMethods,
    InternalIps,
    CsrfTrustedOrigins,
    EmailBackend,
    EmailHost,
    EmailPort,
    EmailUseTls,
    EmailHostUser,
    EmailHostPassword,
    DefaultFromEmail,
    FrontendUrl,
}

/// Conventional header allow-list when `CORS_ALLOW_HEADERS` is unset.
pub const DEFAULT_CORS_HEADERS: &str = r#"["accept","authorization","content-type","user-agent","x-csrftoken","x-requested-with"]"#;

/// Conventional method allow-list when `CORS_ALLOW_METHODS` is unset.
pub const DEFAULT_CORS_METHODS: &str = r#"["DELETE","GET","OPTIONS","PATCH","POST","PUT"]"#;

/// SMTP transport identifier used when `EMAIL_BACKEND` is unset.
pub const DEFAULT_EMAIL_BACKEND: &str = "django.core.mail.backends.smtp.EmailBackend";

impl SettingKey {
    /// All keys in declaration order.
    pub const ALL: [Self; 18] = [
        Self::SecretKey,
        Self::Debug,
        Self::AllowedHosts,
        Self::CorsAllowAllOrigins,
        Self::CorsAllowCredentials,
        Self::CorsAllowedOrigins,
        Self::CorsAllowHeaders,
        Self::CorsAllowMethods,
        Self::InternalIps,
        Self::CsrfTrustedOrigins,
        Self::EmailBackend,
        Self::EmailHost,
        Self::EmailPort,
        Self::EmailUseTls,
        Self::EmailHostUser,
        Self::EmailHostPassword,
        Self::DefaultFromEmail,
        Self::FrontendUrl,
    ];

    /// The verbatim environment variable name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SecretKey => "SECRET_KEY",
            Self::Debug => "DEBUG",
            Self::AllowedHosts => "ALLOWED_HOSTS",
            Self::CorsAllowAllOrigins => "CORS_ALLOW_ALL_ORIGINS",
            Self::CorsAllowCredentials => "CORS_ALLOW_CREDENTIALS",
            Self::CorsAllowedOrigins => "CORS_ALLOWED_ORIGINS",
            Self::CorsAllowHeaders => "CORS_ALLOW_HEADERS",
            Self::CorsAllowMethods => "CORS_ALLOW_METHODS",
            Self::InternalIps => "INTERNAL_IPS",
            Self::CsrfTrustedOrigins => "CSRF_TRUSTED_ORIGINS",
            Self::EmailBackend => "EMAIL_BACKEND",
            Self::EmailHost => "EMAIL_HOST",
            Self::EmailPort => "EMAIL_PORT",
            Self::EmailUseTls => "EMAIL_USE_TLS",
            Self::EmailHostUser => "EMAIL_HOST_USER",
            Self::EmailHostPassword => "EMAIL_HOST_PASSWORD",
            Self::DefaultFromEmail => "DEFAULT_FROM_EMAIL",
            Self::FrontendUrl => "FRONTEND_URL",
        }
    }

    /// Shape of the raw value.
    pub const fn shape(self) -> ValueShape {
        match self {
            Self::Debug
            | Self::CorsAllowAllOrigins
            | Self::CorsAllowCredentials
            | Self::EmailUseTls => ValueShape::Boolean,
            Self::EmailPort => ValueShape::Port,
            Self::AllowedHosts
            | Self::CorsAllowHeaders
            | Self::CorsAllowMethods
            | Self::InternalIps => ValueShape::Set,
            Self::CorsAllowedOrigins | Self::CsrfTrustedOrigins => ValueShape::Sequence,
            Self::SecretKey
            | Self::EmailBackend
            | Self::EmailHost
            | Self::EmailHostUser
            | Self::EmailHostPassword
            | Self::DefaultFromEmail
            | Self::FrontendUrl => ValueShape::Text,
        }
    }

    /// Values of sensitive keys never appear in any rendering or error.
    pub const fn is_sensitive(self) -> bool {
        matches!(self, Self::SecretKey | Self::EmailHostPassword)
    }

    /// Documented default literal, or `None` when the key is required.
    pub const fn default_literal(self) -> Option<&'static str> {
        match self {
            Self::SecretKey | Self::EmailHost | Self::DefaultFromEmail | Self::FrontendUrl => None,
            Self::Debug
            | Self::CorsAllowAllOrigins
            | Self::CorsAllowCredentials
            | Self::EmailUseTls => Some("false"),
            Self::AllowedHosts
            | Self::CorsAllowedOrigins
            | Self::InternalIps
            | Self::CsrfTrustedOrigins => Some("[]"),
            Self::CorsAllowHeaders => Some(DEFAULT_CORS_HEADERS),
            Self::CorsAllowMethods => Some(DEFAULT_CORS_METHODS),
            Self::EmailBackend => Some(DEFAULT_EMAIL_BACKEND),
            Self::EmailPort => Some("25"),
            Self::EmailHostUser | Self::EmailHostPassword => Some(""),
        }
    }

    pub const fn is_required(self) -> bool {
        self.default_literal().is_none()
    }

    /// Human-readable description of the accepted value.
    pub const fn expected(self) -> &'static str {
        match self {
            Self::SecretKey => "a non-empty secret string",
            Self::Debug
            | Self::CorsAllowAllOrigins
            | Self::CorsAllowCredentials
            | Self::EmailUseTls => "one of true, false, 1, 0, yes, no",
            Self::AllowedHosts => {
                "a JSON array of host patterns or absolute URLs, e.g. [\"example.com\"]"
            }
            Self::CorsAllowedOrigins | Self::CsrfTrustedOrigins => {
                "a JSON array of absolute origins, e.g. [\"https://app.example.com\"]"
            }
            Self::CorsAllowHeaders => "a JSON array of header names",
            Self::CorsAllowMethods => {
                "a JSON array of GET, POST, PUT, PATCH, DELETE, OPTIONS, HEAD"
            }
            Self::InternalIps => "a JSON array of addresses",
            Self::EmailBackend => "a dotted transport path, e.g. django.core.mail.backends.smtp.EmailBackend",
            Self::EmailHost => "a mail server hostname",
            Self::EmailPort => "a base-10 integer between 1 and 65535",
            Self::EmailHostUser => "a mail account name",
            Self::EmailHostPassword => "a mail account password",
            Self::DefaultFromEmail => "an address like name@example.com or Name <name@example.com>",
            Self::FrontendUrl => "an absolute URL with scheme and host, e.g. https://app.example.com",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SettingKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Returned when a name is not one of the recognized keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized setting key: {0}")]
pub struct UnknownKey(pub String);

impl FromStr for SettingKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for key in SettingKey::ALL {
            assert_eq!(key.as_str().parse::<SettingKey>().unwrap(), key);
        }
        assert!("SECRET".parse::<SettingKey>().is_err());
    }

    #[test]
    fn test_only_secrets_are_sensitive() {
        let sensitive: Vec<_> = SettingKey::ALL
            .into_iter()
            .filter(|k| k.is_sensitive())
            .collect();
        assert_eq!(
            sensitive,
            vec![SettingKey::SecretKey, SettingKey::EmailHostPassword]
        );
    }

    #[test]
    fn test_required_keys() {
        let required: Vec<_> = SettingKey::ALL
            .into_iter()
            .filter(|k| k.is_required())
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
    }

    #[test]
    fn test_list_keys_default_to_arrays() {
        for key in SettingKey::ALL {
            if matches!(key.shape(), ValueShape::Set | ValueShape::Sequence) {
                let default = key.default_literal().unwrap();
                assert!(default.starts_with('['), "{key} default should be an array");
            }
        }
    }
}
