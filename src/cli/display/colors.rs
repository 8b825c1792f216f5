//! Severity coloring for CLI output.
//!
//! All coloring respects `NO_COLOR` env var automatically via the `colored` crate.

use colored::Colorize;

/// Red bold marker for a hard validation failure.
pub fn error_marker() -> colored::ColoredString {
    "\u{2717}".red().bold()
}

/// Yellow marker for a soft policy warning.
pub fn warning_marker() -> colored::ColoredString {
    "!".yellow().bold()
}

/// Green bold marker for success.
pub fn ok_marker() -> colored::ColoredString {
    "\u{2713}".green().bold()
}

/// Color a rendered setting value: dim for defaults, plain otherwise.
pub fn colorize_value(value: &str, is_default: bool) -> colored::ColoredString {
    if is_default {
        value.dimmed()
    } else {
        value.normal()
    }
}

/// Section header with underline.
pub fn section_header(title: &str) -> String {
    format!("\n{}", title.bold().underline())
}
