//! Display framework for CLI output formatting.
//!
//! Shared primitives for colors and tables used by every command.

pub mod colors;
pub mod table;

pub use colors::*;
pub use table::*;
