//! Raw, not yet validated configuration maps.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Normalize a configuration key to its canonical form.
///
/// Keys written symbol-style (`:adapter`), padded, or in another case all map
/// to the same canonical key.
///
/// ```rust
/// use tether_config::normalize_key;
///
/// assert_eq!(normalize_key(":adapter"), "adapter");
/// assert_eq!(normalize_key(" Host "), "host");
/// assert_eq!(normalize_key("database"), "database");
/// ```
pub fn normalize_key(key: &str) -> String {
    key.trim().trim_start_matches(':').trim().to_ascii_lowercase()
}

/// An insertion-ordered map of configuration keys to values.
///
/// Keys are stored exactly as given until [`RawConfig::normalized`] is called.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawConfig {
    entries: IndexMap<String, Value>,
}

impl RawConfig {
    /// Create an empty configuration map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder style).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert an entry, returning the previous value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Get a value by its exact key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Get a text value by its exact key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Remove an entry, preserving the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Check whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Merge another map into this one; entries from `other` win.
    pub fn merge(&mut self, other: RawConfig) {
        self.entries.extend(other.entries);
    }

    /// Convert every key to its canonical form.
    ///
    /// When two keys collapse to the same canonical key, the one inserted
    /// later wins.
    ///
    /// ```rust
    /// use tether_config::RawConfig;
    ///
    /// let raw = RawConfig::new()
    ///     .with(":adapter", "sqlite")
    ///     .with("Database", "app.db")
    ///     .normalized();
    ///
    /// assert_eq!(raw.get_str("adapter"), Some("sqlite"));
    /// assert_eq!(raw.get_str("database"), Some("app.db"));
    /// ```
    pub fn normalized(self) -> Self {
        self.entries
            .into_iter()
            .map(|(key, value)| (normalize_key(&key), value))
            .collect()
    }

    /// Consume the map, returning the underlying entries.
    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.entries
    }
}

impl<K, V> FromIterator<(K, V)> for RawConfig
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut raw = Self::new();
        raw.extend(iter);
        raw
    }
}

impl<K, V> Extend<(K, V)> for RawConfig
where
    K: Into<String>,
    V: Into<Value>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            // Remove first so a re-inserted key moves to the end, matching
            // "last wins" in both value and position.
            let key = key.into();
            self.entries.shift_remove(&key);
            self.entries.insert(key, value.into());
        }
    }
}

impl IntoIterator for RawConfig {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<IndexMap<String, Value>> for RawConfig {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Self { entries }
    }
}

/// Build a [`RawConfig`] from `key => value` pairs.
///
/// ```rust
/// use tether_config::raw_config;
///
/// let raw = raw_config! {
///     "adapter" => "sqlite",
///     "database" => "/tmp/a.db",
///     "pool" => 5,
/// };
/// assert_eq!(raw.len(), 3);
/// ```
#[macro_export]
macro_rules! raw_config {
    () => {
        $crate::RawConfig::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::RawConfig::new()$(.with($key, $value))+
    };
}
