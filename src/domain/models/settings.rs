//! Validated, immutable runtime settings.
//!
//! A [`TypedConfig`] is only ever produced by the loader after every key has
//! passed validation. It has no setters; share it by reference or behind an
//! `Arc` for the lifetime of the process.

use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};

use super::keys::SettingKey;
use super::warning::PolicyWarning;

/// Marker printed in place of sensitive values.
pub const REDACTED: &str = "[REDACTED]";

/// A secret value that renders as [`REDACTED`] everywhere.
pub struct Sensitive(SecretString);

impl Sensitive {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// Borrow the underlying value. Callers must not log it.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}

impl Clone for Sensitive {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl PartialEq for Sensitive {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for Sensitive {}

impl fmt::Debug for Sensitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for Sensitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for Sensitive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

/// HTTP verbs accepted in `CORS_ALLOW_METHODS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
}

impl HttpMethod {
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Options,
        Self::Head,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HttpMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Returned for a verb outside [`HttpMethod::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// Mail transport strategy named by `EMAIL_BACKEND`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailTransport {
    Smtp,
    Console,
    File,
    Locmem,
    Dummy,
    /// Any identifier outside the conventional backend paths.
    Custom(String),
}

impl EmailTransport {
    const BUILTIN_PREFIX: &'static str = "django.core.mail.backends.";
    const BUILTIN_SUFFIX: &'static str = ".EmailBackend";

    /// Classify a dotted backend identifier.
    pub fn from_identifier(identifier: &str) -> Self {
        let name = identifier
            .strip_prefix(Self::BUILTIN_PREFIX)
            .and_then(|rest| rest.strip_suffix(Self::BUILTIN_SUFFIX));
        match name {
            Some("smtp") => Self::Smtp,
            Some("console") => Self::Console,
            Some("filebased") => Self::File,
            Some("locmem") => Self::Locmem,
            Some("dummy") => Self::Dummy,
            _ => Self::Custom(identifier.to_string()),
        }
    }

    /// Whether mail actually leaves the process.
    pub const fn delivers(&self) -> bool {
        matches!(self, Self::Smtp | Self::Custom(_))
    }
}

/// CORS policy handed to the CORS middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorsSettings {
    pub(crate) allow_all_origins: bool,
    pub(crate) allow_credentials: bool,
    pub(crate) allowed_origins: Vec<String>,
    pub(crate) allow_headers: Vec<String>,
    pub(crate) allow_methods: Vec<HttpMethod>,
}

impl CorsSettings {
    pub const fn allow_all_origins(&self) -> bool {
        self.allow_all_origins
    }

    pub const fn allow_credentials(&self) -> bool {
        self.allow_credentials
    }

    /// Explicit origins. Consumers ignore these when
    /// [`allow_all_origins`](Self::allow_all_origins) is set.
    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    /// Header names, deduplicated case-insensitively, first spelling kept.
    pub fn allow_headers(&self) -> &[String] {
        &self.allow_headers
    }

    pub fn allow_methods(&self) -> &[HttpMethod] {
        &self.allow_methods
    }
}

/// Outbound mail transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailSettings {
    pub(crate) backend: String,
    pub(crate) transport: EmailTransport,
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) use_tls: bool,
    pub(crate) host_user: String,
    pub(crate) host_password: Sensitive,
    pub(crate) default_from_email: String,
}

impl EmailSettings {
    /// Raw backend identifier as configured.
    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub const fn transport(&self) -> &EmailTransport {
        &self.transport
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    pub const fn use_tls(&self) -> bool {
        self.use_tls
    }

    pub fn host_user(&self) -> &str {
        &self.host_user
    }

    pub const fn host_password(&self) -> &Sensitive {
        &self.host_password
    }

    pub fn default_from_email(&self) -> &str {
        &self.default_from_email
    }
}

/// The validated configuration for one process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypedConfig {
    pub(crate) secret_key: Sensitive,
    pub(crate) debug: bool,
    pub(crate) allowed_hosts: Vec<String>,
    pub(crate) internal_ips: Vec<String>,
    pub(crate) csrf_trusted_origins: Vec<String>,
    pub(crate) frontend_url: String,
    pub(crate) cors: CorsSettings,
    pub(crate) email: EmailSettings,
    #[serde(skip)]
    pub(crate) warnings: Vec<PolicyWarning>,
}

impl TypedConfig {
    pub const fn secret_key(&self) -> &Sensitive {
        &self.secret_key
    }

    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Host allow-list entries exactly as configured (URLs or host patterns).
    pub fn allowed_hosts(&self) -> &[String] {
        &self.allowed_hosts
    }

    /// Host names of [`allowed_hosts`](Self::allowed_hosts), with URL entries
    /// reduced to their host.
    pub fn allowed_host_names(&self) -> Vec<String> {
        self.allowed_hosts
            .iter()
            .map(|entry| host_of(entry).unwrap_or_else(|| entry.clone()))
            .collect()
    }

    pub fn internal_ips(&self) -> &[String] {
        &self.internal_ips
    }

    pub fn csrf_trusted_origins(&self) -> &[String] {
        &self.csrf_trusted_origins
    }

    pub fn frontend_url(&self) -> &str {
        &self.frontend_url
    }

    pub const fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub const fn email(&self) -> &EmailSettings {
        &self.email
    }

    /// Soft policy findings from the load that produced this config.
    pub fn warnings(&self) -> &[PolicyWarning] {
        &self.warnings
    }

    /// Render one field back into its environment literal.
    ///
    /// Lists render as JSON arrays; sensitive keys render as [`REDACTED`].
    pub fn render_value(&self, key: SettingKey) -> String {
        match key {
            SettingKey::SecretKey | SettingKey::EmailHostPassword => REDACTED.to_string(),
            SettingKey::Debug => self.debug.to_string(),
            SettingKey::AllowedHosts => list_literal(&self.allowed_hosts),
            SettingKey::CorsAllowAllOrigins => self.cors.allow_all_origins.to_string(),
            SettingKey::CorsAllowCredentials => self.cors.allow_credentials.to_string(),
            SettingKey::CorsAllowedOrigins => list_literal(&self.cors.allowed_origins),
            SettingKey::CorsAllowHeaders => list_literal(&self.cors.allow_headers),
            SettingKey::CorsAllowMethods => list_literal(
                &self
                    .cors
                    .allow_methods
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect::<Vec<_>>(),
            ),
            SettingKey::InternalIps => list_literal(&self.internal_ips),
            SettingKey::CsrfTrustedOrigins => list_literal(&self.csrf_trusted_origins),
            SettingKey::EmailBackend => self.email.backend.clone(),
            SettingKey::EmailHost => self.email.host.clone(),
            SettingKey::EmailPort => self.email.port.to_string(),
            SettingKey::EmailUseTls => self.email.use_tls.to_string(),
            SettingKey::EmailHostUser => self.email.host_user.clone(),
            SettingKey::DefaultFromEmail => self.email.default_from_email.clone(),
            SettingKey::FrontendUrl => self.frontend_url.clone(),
        }
    }
}

/// Diagnostic dump, one `KEY=value` line per recognized key.
impl fmt::Display for TypedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in SettingKey::ALL {
            writeln!(f, "{key}={}", self.render_value(key))?;
        }
        Ok(())
    }
}

/// Serialize strings as a JSON array literal.
pub fn list_literal(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Host portion of an absolute URL entry, `None` for bare host patterns.
pub fn host_of(entry: &str) -> Option<String> {
    let url = url::Url::parse(entry).ok()?;
    url.host_str().map(str::to_string)
}
