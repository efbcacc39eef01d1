//! Logging infrastructure for Tether.
//!
//! Structured logging is controlled by environment variables and is silent
//! unless requested.
//!
//! # Environment Variables
//!
//! - `TETHER_DEBUG=true` (or `1`, `yes`) - Enable debug logging
//! - `TETHER_LOG_LEVEL=debug|info|warn|error|trace` - Set specific log level
//! - `TETHER_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use tether_connect::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//!
//! // Or with explicit settings
//! logging::init_with_level("debug");
//! ```
//!
//! Within Tether, use the standard tracing macros:
//!
//! ```rust,ignore
//! use tracing::{debug, info, warn};
//!
//! debug!(kind = descriptor.kind(), "Resolving descriptor");
//! info!(name, adapter = config.adapter(), "Connection established");
//! warn!(name, error = %e, "Error while disconnecting removed connection");
//! ```

use std::sync::Once;
use tether_config::{EnvSource, StdEnvSource};

/// Enables debug logging.
pub const DEBUG_VAR: &str = "TETHER_DEBUG";
/// Overrides the log level.
pub const LOG_LEVEL_VAR: &str = "TETHER_LOG_LEVEL";
/// Selects the output format.
pub const LOG_FORMAT_VAR: &str = "TETHER_LOG_FORMAT";

/// Targets the filter applies the configured level to.
const TARGETS: [&str; 5] = ["tether", "tether_config", "tether_connect", "tether_sqlite", "tether_cli"];

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line human readable output.
    Pretty,
    /// Single-line human readable output.
    Compact,
}

impl LogFormat {
    fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "compact" => Self::Compact,
            _ => Self::Json,
        }
    }

    /// Format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        }
    }
}

/// Logging settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Whether `TETHER_DEBUG` is set.
    pub debug: bool,
    /// Level applied to the Tether targets.
    pub level: &'static str,
    /// Output format.
    pub format: LogFormat,
    /// Whether logging was requested at all.
    pub enabled: bool,
}

impl LogSettings {
    /// Read settings from an environment source.
    ///
    /// The level defaults to `debug` when `TETHER_DEBUG` is enabled and to
    /// `warn` otherwise; an unknown `TETHER_LOG_LEVEL` falls back the same way.
    pub fn from_env(source: &impl EnvSource) -> Self {
        let debug = source
            .get(DEBUG_VAR)
            .is_some_and(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"));
        let fallback = if debug { "debug" } else { "warn" };

        let requested = source.get(LOG_LEVEL_VAR);
        let level = requested.as_deref().map_or(fallback, |level| {
            match level.trim().to_lowercase().as_str() {
                "trace" => "trace",
                "debug" => "debug",
                "info" => "info",
                "warn" => "warn",
                "error" => "error",
                _ => fallback,
            }
        });

        Self {
            debug,
            level,
            format: source
                .get(LOG_FORMAT_VAR)
                .map_or(LogFormat::default(), |f| LogFormat::parse(&f)),
            enabled: debug || requested.is_some(),
        }
    }

    /// Settings for an explicit level.
    pub fn with_level(level: &str) -> Self {
        let mut settings = Self::from_env(&StdEnvSource);
        settings.level = match level.trim().to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "error" => "error",
            _ => "warn",
        };
        settings.enabled = true;
        settings
    }

    /// The `EnvFilter` directive for these settings.
    pub fn filter_directive(&self) -> String {
        TARGETS
            .iter()
            .map(|target| format!("{}={}", target, self.level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Check if debug logging is enabled via `TETHER_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    LogSettings::from_env(&StdEnvSource).debug
}

/// Initialize the Tether logging system from the process environment.
///
/// Subsequent calls are no-ops. Nothing is installed unless `TETHER_DEBUG` or
/// `TETHER_LOG_LEVEL` is set.
pub fn init() {
    init_with(LogSettings::from_env(&StdEnvSource));
}

/// Initialize logging at a specific level, regardless of the environment.
pub fn init_with_level(level: &str) {
    init_with(LogSettings::with_level(level));
}

/// Initialize logging with explicit settings.
pub fn init_with(settings: LogSettings) {
    INIT.call_once(|| {
        if !settings.enabled {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let filter = EnvFilter::try_new(settings.filter_directive())
                .unwrap_or_else(|_| EnvFilter::new("warn"));

            // A subscriber installed by the host application wins.
            let installed = match settings.format {
                LogFormat::Json => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json())
                    .try_init(),
                LogFormat::Compact => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().compact())
                    .try_init(),
                LogFormat::Pretty => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().pretty())
                    .try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level = settings.level,
                    format = settings.format.as_str(),
                    "Tether logging initialized"
                );
            }
        }
    });
}
