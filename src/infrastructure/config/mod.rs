//! Configuration management infrastructure
//!
//! - Raw environment collection (explicit pairs, process env, dotenv files)
//! - Per-key coercion and validation into a `TypedConfig`
//! - Cross-field policy warnings
//! - Hierarchical settings for the `appenv` tool itself (figment)

pub mod coerce;
pub mod loader;
pub mod policy;
pub mod settings;
pub mod source;

pub use loader::ConfigLoader;
pub use settings::{SettingsError, SettingsLoader};
pub use source::{RawEnvironment, SourceError};
