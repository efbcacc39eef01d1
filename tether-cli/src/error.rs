//! CLI error types and result alias.

// Variant fields are read by the derive macros.
#![allow(unused_assignments)]

use miette::Diagnostic;
use tether_config::ConfigError;
use tether_connect::ConnectionError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(tether::io))]
    Io(#[from] std::io::Error),

    /// Settings file error
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// Resolution or connection error
    #[error(transparent)]
    #[diagnostic(transparent)]
    Connection(#[from] ConnectionError),

    /// Output error
    #[error("Output error: {0}")]
    #[diagnostic(code(tether::output))]
    Output(String),
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Output(format!("Failed to serialize JSON: {}", err))
    }
}
