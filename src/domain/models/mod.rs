pub mod config;
pub mod keys;
pub mod settings;
pub mod warning;

pub use config::{AppenvSettings, LogFormat, LoggingConfig, RotationPolicy};
pub use keys::{SettingKey, UnknownKey, ValueShape};
pub use settings::{
    CorsSettings, EmailSettings, EmailTransport, HttpMethod, Sensitive, TypedConfig, REDACTED,
};
pub use warning::PolicyWarning;
