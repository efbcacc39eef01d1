//! Canonical connection configuration.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Serialize, Serializer};
use std::fmt;
use tether_config::{RawConfig, Value, normalize_key};
use tracing::debug;
use url::Url;

use crate::error::{ConnectionError, ConnectionResult};

/// Canonical configuration keys.
pub mod keys {
    /// Adapter identifier (required).
    pub const ADAPTER: &str = "adapter";
    /// Server host.
    pub const HOST: &str = "host";
    /// Server port.
    pub const PORT: &str = "port";
    /// Login name.
    pub const USERNAME: &str = "username";
    /// Login password.
    pub const PASSWORD: &str = "password";
    /// Database name or file path.
    pub const DATABASE: &str = "database";

    /// Keys with a fixed meaning across adapters.
    pub const STRUCTURAL: [&str; 6] = [ADAPTER, HOST, PORT, USERNAME, PASSWORD, DATABASE];
}

/// Bytes escaped in query keys and values; `+` included so it decodes back literally.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// A validated, canonical connection configuration.
///
/// Keys are normalized and `adapter` is always present and non-empty; the
/// only way to build one is [`ConnectionConfig::from_raw`].
///
/// ```rust
/// use tether_config::raw_config;
/// use tether_connect::ConnectionConfig;
///
/// let config = ConnectionConfig::from_raw(raw_config! {
///     ":adapter" => "postgresql",
///     "Host" => "localhost",
///     "port" => 5432,
/// })
/// .unwrap();
///
/// assert_eq!(config.adapter(), "postgresql");
/// assert_eq!(config.host(), Some("localhost"));
/// assert_eq!(config.port(), Some(5432));
/// ```
#[derive(Clone, PartialEq)]
pub struct ConnectionConfig {
    adapter: String,
    entries: RawConfig,
}

impl ConnectionConfig {
    /// Normalize a raw map and check that it names an adapter.
    pub fn from_raw(raw: RawConfig) -> ConnectionResult<Self> {
        let mut entries = raw.normalized();
        let adapter = match entries.get(keys::ADAPTER) {
            Some(Value::String(adapter)) if !adapter.trim().is_empty() => adapter.trim().to_string(),
            Some(other) if other.as_str().is_none() => {
                return Err(ConnectionError::not_specified(format!(
                    "database configuration adapter must be a string, found {}",
                    other.type_name()
                )));
            }
            _ => {
                return Err(ConnectionError::not_specified(
                    "database configuration does not specify adapter",
                ));
            }
        };
        entries.insert(keys::ADAPTER, adapter.as_str());

        Ok(Self { adapter, entries })
    }

    /// The adapter identifier.
    pub fn adapter(&self) -> &str {
        &self.adapter
    }

    /// Look up a value; the key is normalized first.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(&normalize_key(key))
    }

    /// Look up a text value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Server host.
    pub fn host(&self) -> Option<&str> {
        self.get_str(keys::HOST)
    }

    /// Server port, accepting integers or numeric text.
    pub fn port(&self) -> Option<u16> {
        self.get(keys::PORT)
            .and_then(Value::to_integer)
            .and_then(|p| u16::try_from(p).ok())
    }

    /// Login name.
    pub fn username(&self) -> Option<&str> {
        self.get_str(keys::USERNAME)
    }

    /// Login password.
    pub fn password(&self) -> Option<&str> {
        self.get_str(keys::PASSWORD)
    }

    /// Database name or file path.
    pub fn database(&self) -> Option<&str> {
        self.get_str(keys::DATABASE)
    }

    /// Iterate over all entries, including `adapter`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter()
    }

    /// Iterate over adapter-specific entries (everything but the structural keys).
    pub fn options(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .filter(|(key, _)| !keys::STRUCTURAL.contains(key))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: `adapter` is always present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow the underlying map.
    pub fn as_raw(&self) -> &RawConfig {
        &self.entries
    }

    /// Consume the configuration, returning the underlying map.
    pub fn into_raw(self) -> RawConfig {
        self.entries
    }

    /// Re-encode the configuration as a connection URL.
    ///
    /// Structural keys map back to their URL parts and the remaining entries
    /// become query parameters. Absent parts are left out.
    ///
    /// ```rust
    /// use tether_connect::{ConnectionConfig, decode_url};
    ///
    /// let config = ConnectionConfig::from_raw(decode_url("mysql://root@db:3307/app?ssl=true").unwrap()).unwrap();
    /// assert_eq!(config.to_url().unwrap(), "mysql://root@db:3307/app?ssl=true");
    /// ```
    pub fn to_url(&self) -> ConnectionResult<String> {
        let base = format!("{}://{}", self.adapter, self.host().unwrap_or_default());
        let mut url = Url::parse(&base).map_err(|source| ConnectionError::MalformedUrl {
            url: base.clone(),
            source,
        })?;

        // The setters only refuse hostless and `file:` URLs, both excluded here.
        let has_authority = url.host_str().is_some_and(|h| !h.is_empty()) && url.scheme() != "file";
        if has_authority {
            if let Some(user) = self.username() {
                let _ = url.set_username(user);
            }
            if let Some(password) = self.password() {
                let _ = url.set_password(Some(password));
            }
            if let Some(port) = self.port() {
                let _ = url.set_port(Some(port));
            }
        } else if self.username().is_some() || self.password().is_some() || self.port().is_some() {
            debug!(adapter = %self.adapter, "No host to attach userinfo or port to, leaving them out of the URL");
        }

        if let Some(database) = self.database() {
            url.set_path(&format!("/{}", database));
        }

        let query = self
            .options()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, QUERY_COMPONENT),
                    utf8_percent_encode(&value.to_string(), QUERY_COMPONENT)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        if !query.is_empty() {
            url.set_query(Some(&query));
        }

        Ok(url.to_string())
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self.entries.iter() {
            if key == keys::PASSWORD {
                map.entry(&key, &"[redacted]");
            } else {
                map.entry(&key, value);
            }
        }
        map.finish()
    }
}

impl Serialize for ConnectionConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl TryFrom<RawConfig> for ConnectionConfig {
    type Error = ConnectionError;

    fn try_from(raw: RawConfig) -> ConnectionResult<Self> {
        Self::from_raw(raw)
    }
}

impl From<ConnectionConfig> for RawConfig {
    fn from(config: ConnectionConfig) -> Self {
        config.into_raw()
    }
}
