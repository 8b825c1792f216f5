//! appenv - environment configuration loader and validator
//!
//! Reads the string-valued settings a web application is deployed with
//! (secrets, host allow-lists, CORS policy, outbound mail) and turns them into
//! one immutable, typed [`TypedConfig`]. Every problem in the environment is
//! reported at once in a [`ConfigError`]; risky but legal combinations become
//! [`PolicyWarning`]s.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): keys, the typed settings model, warnings and errors
//! - **Infrastructure Layer** (`infrastructure`): environment sources, coercion,
//!   policy checks, tool settings and logging
//! - **CLI Layer** (`cli`): the `appenv` command-line interface
//!
//! # Example
//!
//! ```no_run
//! use appenv::{ConfigLoader, RawEnvironment};
//!
//! let env = RawEnvironment::from_env_file(".env")?;
//! match ConfigLoader::load_raw(&env) {
//!     Ok(config) => println!("{config}"),
//!     Err(err) => eprintln!("{err}"),
//! }
//! # Ok::<(), appenv::SourceError>(())
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::errors::{ConfigError, SettingError};
pub use domain::models::{
    AppenvSettings, CorsSettings, EmailSettings, EmailTransport, HttpMethod, LoggingConfig,
    PolicyWarning, Sensitive, SettingKey, TypedConfig, ValueShape, REDACTED,
};
pub use infrastructure::config::{
    ConfigLoader, RawEnvironment, SettingsError, SettingsLoader, SourceError,
};
