//! Domain layer for appenv
//!
//! Recognized keys, the validated settings model, policy warnings and the
//! validation error taxonomy. Nothing here reads the environment.

pub mod errors;
pub mod models;

pub use errors::{ConfigError, SettingError};
