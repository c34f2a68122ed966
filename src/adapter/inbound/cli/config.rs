//! Configuration loading for CLI commands.

use std::fs;
use std::path::Path;

use crate::adapter::inbound::cli::diagnostic::ConfigDiagnostic;
use crate::error::{ConfigError, Error, Result};
use crate::infrastructure::config::settings::Config;

/// Load the configuration file if one was given, else defaults plus
/// environment.
///
/// # Errors
///
/// Returns the underlying configuration error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::from_env(),
    }
}

/// Render a configuration error for the terminal.
///
/// TOML syntax errors are shown against the file content with the offending
/// region labeled; everything else falls back to the error message.
#[must_use]
pub fn describe_error(error: &Error, path: Option<&Path>) -> String {
    if let (Error::Config(ConfigError::Parse(parse)), Some(path)) = (error, path) {
        if let Ok(src) = fs::read_to_string(path) {
            if let Some(diagnostic) = ConfigDiagnostic::from_toml(parse, &src) {
                return diagnostic.render();
            }
        }
    }
    error.to_string()
}
