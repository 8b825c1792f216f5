use std::collections::HashMap;

use crate::domain::errors::{ConfigError, SettingError};
use crate::domain::models::keys::SettingKey;
use crate::domain::models::settings::{
    CorsSettings, EmailSettings, EmailTransport, Sensitive, TypedConfig,
};

use super::coerce;
use super::policy;
use super::source::RawEnvironment;

/// Turns raw environment strings into a [`TypedConfig`].
///
/// Validation is exhaustive: every key is checked and every problem is
/// returned in one [`ConfigError`]. No config is produced if any key fails.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from a plain string mapping.
    pub fn load(environment: &HashMap<String, String>) -> Result<TypedConfig, ConfigError> {
        Self::load_raw(&environment.iter().collect())
    }

    /// Load from a collected [`RawEnvironment`].
    pub fn load_raw(environment: &RawEnvironment) -> Result<TypedConfig, ConfigError> {
        let mut validation = Validation::new(environment);
        let assembled = validation.assemble();

        match (assembled, validation.errors) {
            (Some(mut config), errors) if errors.is_empty() => {
                config.warnings = policy::evaluate(&config);
                for warning in &config.warnings {
                    tracing::warn!(
                        keys = ?warning.keys().iter().map(|k| k.as_str()).collect::<Vec<_>>(),
                        "{warning}"
                    );
                }
                tracing::info!(
                    debug = config.debug,
                    allowed_hosts = config.allowed_hosts.len(),
                    warnings = config.warnings.len(),
                    "environment configuration loaded"
                );
                Ok(config)
            }
            (_, errors) => {
                tracing::error!(problems = errors.len(), "environment configuration rejected");
                Err(ConfigError::new(errors))
            }
        }
    }

    /// Load from the current process environment.
    pub fn from_process_env() -> Result<TypedConfig, ConfigError> {
        Self::load_raw(&RawEnvironment::from_process_env())
    }
}

/// One validation pass over a raw environment, collecting every error.
struct Validation<'a> {
    env: &'a RawEnvironment,
    errors: Vec<SettingError>,
}

impl<'a> Validation<'a> {
    const fn new(env: &'a RawEnvironment) -> Self {
        Self {
            env,
            errors: Vec::new(),
        }
    }

    /// Build the config. `None` means at least one error was recorded.
    ///
    /// Every field is evaluated before any `?` so that all errors land in
    /// `self.errors`.
    fn assemble(&mut self) -> Option<TypedConfig> {
        let secret_key = self.secret(SettingKey::SecretKey);
        let debug = self.boolean(SettingKey::Debug);
        let allowed_hosts = self.host_set(SettingKey::AllowedHosts);
        let internal_ips = self.set(SettingKey::InternalIps);
        let csrf_trusted_origins = self.origin_sequence(SettingKey::CsrfTrustedOrigins);
        let frontend_url = self.url(SettingKey::FrontendUrl);
        let cors = self.cors();
        let email = self.email();

        Some(TypedConfig {
            secret_key: secret_key?,
            debug: debug?,
            allowed_hosts: allowed_hosts?,
            internal_ips: internal_ips?,
            csrf_trusted_origins: csrf_trusted_origins?,
            frontend_url: frontend_url?,
            cors: cors?,
            email: email?,
            warnings: Vec::new(),
        })
    }

    fn cors(&mut self) -> Option<CorsSettings> {
        let allow_all_origins = self.boolean(SettingKey::CorsAllowAllOrigins);
        let allow_credentials = self.boolean(SettingKey::CorsAllowCredentials);
        let allowed_origins = self.origin_sequence(SettingKey::CorsAllowedOrigins);
        let allow_headers = self
            .list(SettingKey::CorsAllowHeaders)
            .map(coerce::dedup_case_insensitive);
        let allow_methods = self.list(SettingKey::CorsAllowMethods).and_then(|items| {
            coerce::parse_methods(SettingKey::CorsAllowMethods, &items)
                .map_err(|errors| self.errors.extend(errors))
                .ok()
        });

        Some(CorsSettings {
            allow_all_origins: allow_all_origins?,
            allow_credentials: allow_credentials?,
            allowed_origins: allowed_origins?,
            allow_headers: allow_headers?,
            allow_methods: allow_methods?,
        })
    }

    fn email(&mut self) -> Option<EmailSettings> {
        let backend = self.text(SettingKey::EmailBackend).and_then(|value| {
            self.check(coerce::check_dotted_path(SettingKey::EmailBackend, &value))
                .map(|()| value)
        });
        let host = self.text(SettingKey::EmailHost);
        let port = self.port(SettingKey::EmailPort);
        let use_tls = self.boolean(SettingKey::EmailUseTls);
        let host_user = self.text(SettingKey::EmailHostUser);
        let host_password = self.secret(SettingKey::EmailHostPassword);
        let default_from_email = self.text(SettingKey::DefaultFromEmail).and_then(|value| {
            self.check(coerce::check_email(SettingKey::DefaultFromEmail, &value))
                .map(|()| value)
        });

        let backend = backend?;
        Some(EmailSettings {
            transport: EmailTransport::from_identifier(&backend),
            backend,
            host: host?,
            port: port?,
            use_tls: use_tls?,
            host_user: host_user?,
            host_password: host_password?,
            default_from_email: default_from_email?,
        })
    }

    /// Record a failed check, returning `Some(())` on success.
    fn check(&mut self, result: Result<(), SettingError>) -> Option<()> {
        result.map_err(|e| self.errors.push(e)).ok()
    }

    fn coerce<T>(&mut self, result: Result<T, SettingError>) -> Option<T> {
        result.map_err(|e| self.errors.push(e)).ok()
    }

    /// The configured value, falling back to the documented default.
    ///
    /// Whitespace-only values count as absent. Records `MissingKey` for a
    /// required key with nothing set.
    fn raw(&mut self, key: SettingKey) -> Option<String> {
        let configured = self
            .env
            .get(key)
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string);
        match (configured, key.default_literal()) {
            (Some(value), _) => Some(value),
            (None, Some(default)) => Some(default.to_string()),
            (None, None) => {
                self.errors.push(SettingError::MissingKey {
                    key,
                    expected: key.expected(),
                });
                None
            }
        }
    }

    fn text(&mut self, key: SettingKey) -> Option<String> {
        self.raw(key).map(|value| value.trim().to_string())
    }

    /// Sensitive values are kept verbatim and never echoed into errors.
    fn secret(&mut self, key: SettingKey) -> Option<Sensitive> {
        self.raw(key).map(Sensitive::new)
    }

    fn boolean(&mut self, key: SettingKey) -> Option<bool> {
        let raw = self.raw(key)?;
        self.coerce(coerce::parse_bool(key, &raw))
    }

    fn port(&mut self, key: SettingKey) -> Option<u16> {
        let raw = self.raw(key)?;
        self.coerce(coerce::parse_port(key, &raw))
    }

    fn url(&mut self, key: SettingKey) -> Option<String> {
        let value = self.text(key)?;
        self.check(coerce::check_absolute_url(key, &value))
            .map(|()| value)
    }

    fn list(&mut self, key: SettingKey) -> Option<Vec<String>> {
        let raw = self.raw(key)?;
        self.coerce(coerce::parse_list(key, &raw))
    }

    fn set(&mut self, key: SettingKey) -> Option<Vec<String>> {
        self.list(key).map(coerce::dedup_preserving_order)
    }

    /// Set of host entries; every invalid entry is reported.
    fn host_set(&mut self, key: SettingKey) -> Option<Vec<String>> {
        let items = self.set(key)?;
        self.check_each(&items, |entry| coerce::check_host_entry(key, entry))
            .map(|()| items)
    }

    /// Ordered origins; every invalid entry is reported.
    fn origin_sequence(&mut self, key: SettingKey) -> Option<Vec<String>> {
        let items = self.list(key)?;
        self.check_each(&items, |entry| coerce::check_absolute_url(key, entry))
            .map(|()| items)
    }

    fn check_each<F>(&mut self, items: &[String], check: F) -> Option<()>
    where
        F: Fn(&str) -> Result<(), SettingError>,
    {
        let before = self.errors.len();
        for item in items {
            if let Err(e) = check(item.as_str()) {
                self.errors.push(e);
            }
        }
        (self.errors.len() == before).then_some(())
    }
}
