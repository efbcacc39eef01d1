//! Connection descriptors: every shape a caller may pass to establish a connection.

use std::fmt;
use tether_config::{DATABASE_URL_VAR, EnvSource, RawConfig};

use crate::config::ConnectionConfig;

/// Caller-supplied description of how to connect.
///
/// Strings convert to [`Descriptor::ProfileName`]: a string is looked up as a
/// profile first and only read as a URL when no such profile exists. Use
/// [`Descriptor::Url`] to skip the profile lookup.
///
/// ```rust
/// use tether_config::raw_config;
/// use tether_connect::Descriptor;
///
/// assert_eq!(Descriptor::from("production"), Descriptor::ProfileName("production".into()));
/// assert_eq!(Descriptor::from(None::<&str>), Descriptor::Absent);
/// assert!(matches!(
///     Descriptor::from(raw_config! { "adapter" => "sqlite" }),
///     Descriptor::RawConfig(_)
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Descriptor {
    /// Nothing given; fall back to the current environment name.
    #[default]
    Absent,
    /// A profile name, or a URL when no profile of that name exists.
    ProfileName(String),
    /// A connection URL.
    Url(String),
    /// A configuration map.
    RawConfig(RawConfig),
}

impl Descriptor {
    /// Create a profile-name descriptor.
    pub fn profile(name: impl Into<String>) -> Self {
        Self::ProfileName(name.into())
    }

    /// Create a URL descriptor.
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// The default descriptor: the value of `DATABASE_URL` if set, otherwise absent.
    pub fn from_env(source: &impl EnvSource) -> Self {
        source
            .get_non_empty(DATABASE_URL_VAR)
            .map_or(Self::Absent, Self::ProfileName)
    }

    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::ProfileName(_) => "profile",
            Self::Url(_) => "url",
            Self::RawConfig(_) => "config",
        }
    }

    /// Check whether no descriptor was given.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("(none)"),
            Self::ProfileName(name) => f.write_str(name),
            Self::Url(url) => f.write_str(url),
            Self::RawConfig(raw) => write!(f, "configuration with {} key(s)", raw.len()),
        }
    }
}

impl From<&str> for Descriptor {
    fn from(name: &str) -> Self {
        Self::ProfileName(name.to_string())
    }
}

impl From<String> for Descriptor {
    fn from(name: String) -> Self {
        Self::ProfileName(name)
    }
}

impl From<&String> for Descriptor {
    fn from(name: &String) -> Self {
        Self::ProfileName(name.clone())
    }
}

impl From<RawConfig> for Descriptor {
    fn from(raw: RawConfig) -> Self {
        Self::RawConfig(raw)
    }
}

impl From<ConnectionConfig> for Descriptor {
    fn from(config: ConnectionConfig) -> Self {
        Self::RawConfig(config.into_raw())
    }
}

impl<T: Into<Descriptor>> From<Option<T>> for Descriptor {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}
