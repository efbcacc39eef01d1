//! Error types for settings loading and profile parsing.

// Variant fields are read by the derive macros.
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading connection profiles.
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    /// Error reading a settings file.
    #[error("failed to read settings file: {path}")]
    #[diagnostic(code(tether::config::io_error))]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML.
    #[error("failed to parse settings file")]
    #[diagnostic(code(tether::config::toml_error))]
    TomlError {
        #[source]
        source: toml::de::Error,
    },

    /// A profile entry has a shape that cannot be used as a connection profile.
    #[error("invalid profile `{name}`: {message}")]
    #[diagnostic(
        code(tether::config::invalid_profile),
        help("profiles are either a table of scalar values or a string naming another profile or URL")
    )]
    InvalidProfile { name: String, message: String },

    /// Any other configuration problem.
    #[error("configuration error: {message}")]
    #[diagnostic(code(tether::config::config_error))]
    Invalid { message: String },
}

impl ConfigError {
    /// Create an invalid profile error.
    pub fn invalid_profile(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidProfile {
            name: name.into(),
            message: message.into(),
        }
    }
}
