//! # tether-config
//!
//! Connection profiles and configuration values for Tether.
//!
//! This crate owns the data that connection resolution reads:
//! - [`Value`] and [`RawConfig`]: scalar values and not-yet-validated
//!   configuration maps, with key normalization
//! - [`ConfigurationRegistry`]: named [`Profile`]s, loaded from a
//!   `tether.toml` settings file or built in code
//! - [`EnvSource`]: where environment variables come from, used for
//!   `${VAR}` expansion and for the current environment name
//!
//! ## Building a registry
//!
//! ```rust
//! use tether_config::{ConfigurationRegistry, Profile, raw_config};
//!
//! let registry = ConfigurationRegistry::new()
//!     .with_profile("development", raw_config! {
//!         "adapter" => "sqlite",
//!         "database" => "db/development.sqlite3",
//!     })
//!     .with_profile("test", "development");
//!
//! assert!(registry.get("development").and_then(Profile::as_config).is_some());
//! assert_eq!(registry.get("test").and_then(Profile::as_reference), Some("development"));
//! ```
//!
//! ## Loading a settings file
//!
//! ```rust
//! use tether_config::{ConfigurationRegistry, MapEnvSource};
//!
//! let toml = r#"
//!     [production]
//!     adapter = "postgresql"
//!     host = "${DB_HOST:-localhost}"
//! "#;
//!
//! let registry = ConfigurationRegistry::from_toml_with(toml, &MapEnvSource::new()).unwrap();
//! let production = registry.get("production").unwrap().as_config().unwrap();
//! assert_eq!(production.get_str("host"), Some("localhost"));
//! ```

pub mod env;
pub mod error;
pub mod raw;
pub mod registry;
pub mod value;

pub use env::{
    CONFIG_PATH_VAR, DATABASE_URL_VAR, ENVIRONMENT_VAR, EnvSource, MapEnvSource, StdEnvSource,
    current_environment, expand_env_vars,
};
pub use error::{ConfigError, ConfigResult};
pub use raw::{RawConfig, normalize_key};
pub use registry::{CONFIG_FILE_NAME, ConfigurationRegistry, Profile};
pub use value::Value;
