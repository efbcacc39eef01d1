//! Errors raised while resolving a descriptor and establishing a connection.
//!
//! Every error is terminal for the call that produced it: nothing here is
//! retried or recovered internally.
//!
//! ```rust
//! use tether_connect::ConnectionError;
//!
//! let err = ConnectionError::not_configured("reporting");
//! assert!(err.to_string().contains("reporting"));
//! assert!(err.is_adapter_not_specified());
//! ```

// Variant fields are read by the derive macros.
#![allow(unused_assignments)]

use miette::Diagnostic;
use tether_config::ConfigError;
use thiserror::Error;

/// Boxed error produced by adapter code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for connection operations.
pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// Errors that can occur during connection resolution.
#[derive(Error, Debug, Diagnostic)]
pub enum ConnectionError {
    /// No usable descriptor could be determined.
    #[error("{message}")]
    #[diagnostic(
        code(tether::adapter_not_specified),
        help("pass a profile name, a URL, or a configuration with an `adapter` key, or set TETHER_ENV")
    )]
    AdapterNotSpecified { message: String },

    /// A descriptor was interpreted as a URL but could not be parsed.
    #[error("invalid connection URL `{url}`: {source}")]
    #[diagnostic(code(tether::malformed_url))]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The adapter implementation could not be made available.
    #[error("Please install the {adapter} adapter: add `{package}` to your dependencies and register it ({source})")]
    #[diagnostic(code(tether::adapter_load_error))]
    AdapterLoadError {
        adapter: String,
        package: String,
        #[source]
        source: BoxError,
    },

    /// The adapter loaded but exposes no construction entry point.
    #[error("database configuration specifies nonexistent {adapter} adapter")]
    #[diagnostic(code(tether::adapter_not_found))]
    AdapterNotFound { adapter: String },

    /// Profile references loop back on themselves.
    #[error("cyclic connection profile: {}", chain.join(" -> "))]
    #[diagnostic(
        code(tether::cyclic_configuration),
        help("a profile may reference another profile, but the references must end in a configuration or URL")
    )]
    CyclicConfiguration { chain: Vec<String> },

    /// The adapter's construction entry point failed.
    #[error("connection `{name}` could not be opened by the {adapter} adapter: {source}")]
    #[diagnostic(code(tether::connection_failed))]
    ConnectionFailed {
        name: String,
        adapter: String,
        #[source]
        source: BoxError,
    },

    /// No connection is registered under the name.
    #[error("no connection established for `{name}`")]
    #[diagnostic(code(tether::connection_not_established))]
    ConnectionNotEstablished { name: String },

    /// Loading connection profiles failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

impl ConnectionError {
    /// Create an adapter-not-specified error.
    pub fn not_specified(message: impl Into<String>) -> Self {
        Self::AdapterNotSpecified {
            message: message.into(),
        }
    }

    /// Create the error for a name that is neither a profile nor a URL.
    pub fn not_configured(name: &str) -> Self {
        Self::not_specified(format!("`{}` database is not configured", name))
    }

    /// Attribute an adapter-not-specified error to the profile that produced it.
    pub(crate) fn in_profile(self, name: &str) -> Self {
        match self {
            Self::AdapterNotSpecified { message } => Self::not_specified(format!("`{}` {}", name, message)),
            other => other,
        }
    }

    /// Check whether this is an [`ConnectionError::AdapterNotSpecified`].
    pub fn is_adapter_not_specified(&self) -> bool {
        matches!(self, Self::AdapterNotSpecified { .. })
    }
}
