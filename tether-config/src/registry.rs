//! Named connection profiles and the `tether.toml` settings file.
//!
//! Every top-level key of the settings file is a profile. A table becomes a
//! configuration map; a string is a reference to another profile or a URL.
//! `${VAR}` references are expanded inside string values after parsing, so
//! variable contents are never read as TOML.
//!
//! ```toml
//! test = "development"
//!
//! [development]
//! adapter = "sqlite"
//! database = "db/development.sqlite3"
//!
//! [production]
//! adapter = "postgresql"
//! host = "${DB_HOST:-localhost}"
//! database = "app"
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::env::{EnvSource, StdEnvSource, expand_env_vars, has_variables};
use crate::error::{ConfigError, ConfigResult};
use crate::raw::RawConfig;
use crate::value::Value;

/// Default settings file name.
pub const CONFIG_FILE_NAME: &str = "tether.toml";

/// A registered connection profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Profile {
    /// A configuration map.
    Config(RawConfig),
    /// The name of another profile, or a connection URL.
    Reference(String),
}

impl Profile {
    /// Get the configuration map, if this profile holds one.
    pub fn as_config(&self) -> Option<&RawConfig> {
        match self {
            Self::Config(raw) => Some(raw),
            Self::Reference(_) => None,
        }
    }

    /// Get the referenced name or URL, if this profile is a reference.
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Self::Reference(target) => Some(target),
            Self::Config(_) => None,
        }
    }
}

impl From<RawConfig> for Profile {
    fn from(raw: RawConfig) -> Self {
        Self::Config(raw)
    }
}

impl From<&str> for Profile {
    fn from(target: &str) -> Self {
        Self::Reference(target.to_string())
    }
}

impl From<String> for Profile {
    fn from(target: String) -> Self {
        Self::Reference(target)
    }
}

/// Process-wide mapping of profile names to profiles.
///
/// Populated once during application bootstrap and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigurationRegistry {
    profiles: IndexMap<String, Profile>,
}

impl ConfigurationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a profile (builder style).
    pub fn with_profile(mut self, name: impl Into<String>, profile: impl Into<Profile>) -> Self {
        self.insert(name, profile);
        self
    }

    /// Insert a profile, returning any profile previously registered under the name.
    pub fn insert(&mut self, name: impl Into<String>, profile: impl Into<Profile>) -> Option<Profile> {
        self.profiles.insert(name.into(), profile.into())
    }

    /// Look up a profile by name.
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Check whether a profile is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// Registered profile names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Iterate over all profiles.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.profiles.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Check whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Load profiles from a settings file, expanding variables from the
    /// process environment.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::from_file_with(path, &StdEnvSource)
    }

    /// Load profiles from a settings file with a custom environment source.
    pub fn from_file_with(path: impl AsRef<Path>, source: &impl EnvSource) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let registry = Self::from_toml_with(&content, source)?;
        info!(
            path = %path.display(),
            profiles = registry.len(),
            "Connection profiles loaded"
        );
        Ok(registry)
    }

    /// Parse profiles from TOML, expanding variables from the process environment.
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Self::from_toml_with(content, &StdEnvSource)
    }

    /// Parse profiles from TOML with a custom environment source.
    pub fn from_toml_with(content: &str, source: &impl EnvSource) -> ConfigResult<Self> {
        let table: toml::Table =
            toml::from_str(content).map_err(|e| ConfigError::TomlError { source: e })?;

        let mut registry = Self::new();
        for (name, entry) in table {
            let profile = profile_from_toml(&name, entry, source)?;
            debug!(profile = %name, reference = profile.as_reference().is_some(), "Profile parsed");
            registry.insert(name, profile);
        }
        Ok(registry)
    }
}

fn profile_from_toml(name: &str, entry: toml::Value, source: &impl EnvSource) -> ConfigResult<Profile> {
    match entry {
        toml::Value::String(target) => {
            let target = expand(target, source)?;
            if target.trim().is_empty() {
                return Err(ConfigError::invalid_profile(name, "reference is empty"));
            }
            Ok(Profile::Reference(target))
        }
        toml::Value::Table(table) => {
            let mut raw = RawConfig::new();
            for (key, value) in table {
                let value = scalar_from_toml(name, &key, value, source)?;
                raw.insert(key, value);
            }
            Ok(Profile::Config(raw))
        }
        other => Err(ConfigError::invalid_profile(
            name,
            format!("expected a table or a string, found {}", other.type_str()),
        )),
    }
}

fn scalar_from_toml(profile: &str, key: &str, value: toml::Value, source: &impl EnvSource) -> ConfigResult<Value> {
    match value {
        toml::Value::String(s) => Ok(Value::String(expand(s, source)?)),
        toml::Value::Integer(i) => Ok(Value::Integer(i)),
        toml::Value::Float(x) => Ok(Value::Float(x)),
        toml::Value::Boolean(b) => Ok(Value::Boolean(b)),
        toml::Value::Datetime(dt) => Ok(Value::String(dt.to_string())),
        other => Err(ConfigError::invalid_profile(
            profile,
            format!("key `{}` holds a {}; only scalar values are supported", key, other.type_str()),
        )),
    }
}

fn expand(value: String, source: &impl EnvSource) -> ConfigResult<String> {
    if has_variables(&value) {
        expand_env_vars(&value, source)
    } else {
        Ok(value)
    }
}
