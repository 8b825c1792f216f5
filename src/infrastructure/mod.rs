//! Infrastructure layer module
//!
//! - Environment collection and configuration loading
//! - Logging infrastructure
//!
//! Everything that reads the process environment or the filesystem lives here.

pub mod config;
pub mod logging;
