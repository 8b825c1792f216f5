//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
#[allow(dead_code)]
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write a dotenv file into a fresh temporary directory
#[allow(dead_code)]
pub fn write_env_file(contents: &str) -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join(".env");
    std::fs::write(&path, contents).expect("Failed to write env file");
    (dir, path)
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Secret value used by fixtures; must never show up in any rendering.
#[allow(dead_code)]
pub const FIXTURE_SECRET: &str = "fixture-secret-8f2d1c";

/// Mail password used by fixtures; must never show up in any rendering.
#[allow(dead_code)]
pub const FIXTURE_PASSWORD: &str = "fixture-mail-pass-41aa";

/// Minimal environment that loads without errors or warnings.
#[allow(dead_code)]
pub fn valid_environment() -> HashMap<String, String> {
    [
        ("SECRET_KEY", FIXTURE_SECRET),
        ("EMAIL_HOST", "smtp.example.com"),
        ("EMAIL_HOST_PASSWORD", FIXTURE_PASSWORD),
        ("DEFAULT_FROM_EMAIL", "noreply@example.com"),
        ("FRONTEND_URL", "https://app.example.com"),
        ("ALLOWED_HOSTS", r#"["api.example.com"]"#),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// `valid_environment` with some keys overridden.
#[allow(dead_code)]
pub fn environment_with(overrides: &[(&str, &str)]) -> HashMap<String, String> {
    let mut env = valid_environment();
    for (key, value) in overrides {
        env.insert((*key).to_string(), (*value).to_string());
    }
    env
}
