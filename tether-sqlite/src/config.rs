//! SQLite configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tether_config::Value;
use tether_connect::ConnectionConfig;

use crate::error::{SqliteError, SqliteResult};

/// SQLite database configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SqliteConfig {
    /// Database path (or ":memory:" for in-memory).
    pub path: DatabasePath,
    /// Enable foreign keys.
    pub foreign_keys: bool,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: Option<u32>,
    /// Cache size (in pages, negative for KB).
    pub cache_size: Option<i32>,
    /// Synchronous mode.
    pub synchronous: SynchronousMode,
    /// Journal mode.
    pub journal_mode: JournalMode,
}

/// Database path configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DatabasePath {
    /// In-memory database.
    #[default]
    Memory,
    /// File-based database.
    File(PathBuf),
}

impl DatabasePath {
    /// Interpret a `database` value.
    pub fn parse(database: &str) -> Self {
        match database.trim() {
            ":memory:" | "" => Self::Memory,
            path => Self::File(PathBuf::from(path)),
        }
    }

    /// Path as shown in logs.
    pub fn display(&self) -> String {
        match self {
            Self::Memory => ":memory:".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Check if this is an in-memory database.
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

/// SQLite synchronous mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SynchronousMode {
    /// Synchronous OFF - Fastest but unsafe.
    Off,
    /// Synchronous NORMAL - Good balance.
    #[default]
    Normal,
    /// Synchronous FULL - Safe but slower.
    Full,
    /// Synchronous EXTRA - Maximum safety.
    Extra,
}

impl SynchronousMode {
    /// Get the SQLite pragma value.
    pub fn as_pragma(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Normal => "NORMAL",
            Self::Full => "FULL",
            Self::Extra => "EXTRA",
        }
    }
}

impl FromStr for SynchronousMode {
    type Err = SqliteError;

    fn from_str(s: &str) -> SqliteResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "off" | "0" => Ok(Self::Off),
            "normal" | "1" => Ok(Self::Normal),
            "full" | "2" => Ok(Self::Full),
            "extra" | "3" => Ok(Self::Extra),
            other => Err(SqliteError::config(format!("unknown synchronous mode `{}`", other))),
        }
    }
}

/// SQLite journal mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JournalMode {
    /// DELETE - Default mode, deletes journal after transaction.
    Delete,
    /// TRUNCATE - Truncates journal instead of deleting.
    Truncate,
    /// PERSIST - Keep journal file, zero out on commit.
    Persist,
    /// MEMORY - Keep journal in memory.
    Memory,
    /// WAL - Write-Ahead Logging (best for concurrent access).
    #[default]
    Wal,
    /// OFF - No journal (dangerous).
    Off,
}

impl JournalMode {
    /// Get the SQLite pragma value.
    pub fn as_pragma(&self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Truncate => "TRUNCATE",
            Self::Persist => "PERSIST",
            Self::Memory => "MEMORY",
            Self::Wal => "WAL",
            Self::Off => "OFF",
        }
    }
}

impl FromStr for JournalMode {
    type Err = SqliteError;

    fn from_str(s: &str) -> SqliteResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "delete" => Ok(Self::Delete),
            "truncate" => Ok(Self::Truncate),
            "persist" => Ok(Self::Persist),
            "memory" => Ok(Self::Memory),
            "wal" => Ok(Self::Wal),
            "off" => Ok(Self::Off),
            other => Err(SqliteError::config(format!("unknown journal mode `{}`", other))),
        }
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: DatabasePath::Memory,
            foreign_keys: true,
            busy_timeout_ms: Some(5000),
            cache_size: Some(-2000), // 2MB cache
            synchronous: SynchronousMode::Normal,
            journal_mode: JournalMode::Wal,
        }
    }
}

impl SqliteConfig {
    /// Create a new configuration for an in-memory database.
    pub fn memory() -> Self {
        Self {
            path: DatabasePath::Memory,
            ..Default::default()
        }
    }

    /// Create a new configuration for a file-based database.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            path: DatabasePath::File(path.as_ref().to_path_buf()),
            ..Default::default()
        }
    }

    /// Build the adapter configuration from a resolved connection configuration.
    ///
    /// `database` is required and names the file (or `:memory:`). Recognized
    /// options:
    /// - `foreign_keys` - `true`/`false`
    /// - `busy_timeout` (or `timeout`) - milliseconds
    /// - `cache_size` - pages, negative for KB
    /// - `synchronous` - `off`, `normal`, `full`, `extra`
    /// - `journal_mode` - `delete`, `truncate`, `persist`, `memory`, `wal`, `off`
    /// - `mode=memory` - force an in-memory database
    ///
    /// Other options are ignored.
    pub fn from_connection_config(config: &ConnectionConfig) -> SqliteResult<Self> {
        let database = config
            .database()
            .ok_or_else(|| SqliteError::config("database path is required"))?;

        let mut sqlite = Self {
            path: DatabasePath::parse(database),
            ..Default::default()
        };

        for (key, value) in config.options() {
            match key {
                "mode" if value.as_str() == Some("memory") => {
                    sqlite.path = DatabasePath::Memory;
                }
                "foreign_keys" => {
                    sqlite.foreign_keys = flag(key, value)?;
                }
                "busy_timeout" | "timeout" => {
                    sqlite.busy_timeout_ms = Some(integer(key, value)?);
                }
                "cache_size" => {
                    sqlite.cache_size = Some(integer(key, value)?);
                }
                "synchronous" => {
                    sqlite.synchronous = value.to_string().parse()?;
                }
                "journal_mode" => {
                    sqlite.journal_mode = value.to_string().parse()?;
                }
                _ => {}
            }
        }

        Ok(sqlite)
    }

    /// Generate the initialization SQL for this configuration.
    pub fn init_sql(&self) -> String {
        let mut sql = String::new();

        if self.foreign_keys {
            sql.push_str("PRAGMA foreign_keys = ON;\n");
        }

        sql.push_str(&format!(
            "PRAGMA journal_mode = {};\n",
            self.journal_mode.as_pragma()
        ));

        sql.push_str(&format!(
            "PRAGMA synchronous = {};\n",
            self.synchronous.as_pragma()
        ));

        if let Some(timeout) = self.busy_timeout_ms {
            sql.push_str(&format!("PRAGMA busy_timeout = {};\n", timeout));
        }

        if let Some(cache) = self.cache_size {
            sql.push_str(&format!("PRAGMA cache_size = {};\n", cache));
        }

        sql
    }

    /// Enable or disable foreign keys.
    pub fn foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    /// Set the busy timeout in milliseconds.
    pub fn busy_timeout(mut self, ms: u32) -> Self {
        self.busy_timeout_ms = Some(ms);
        self
    }

    /// Set the journal mode.
    pub fn journal_mode(mut self, mode: JournalMode) -> Self {
        self.journal_mode = mode;
        self
    }
}

fn flag(key: &str, value: &Value) -> SqliteResult<bool> {
    value
        .to_flag()
        .ok_or_else(|| SqliteError::config(format!("`{}` must be true or false, found `{}`", key, value)))
}

fn integer<T: TryFrom<i64>>(key: &str, value: &Value) -> SqliteResult<T> {
    value
        .to_integer()
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| SqliteError::config(format!("`{}` must be an integer in range, found `{}`", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_config::raw_config;
    use tether_connect::decode_url;

    fn resolved(raw: tether_config::RawConfig) -> ConnectionConfig {
        ConnectionConfig::from_raw(raw).unwrap()
    }

    #[test]
    fn test_config_memory() {
        let config = SqliteConfig::memory();
        assert!(config.path.is_memory());
        assert_eq!(config.path.display(), ":memory:");
    }

    #[test]
    fn test_config_file() {
        let config = SqliteConfig::file("test.db");
        assert!(!config.path.is_memory());
        assert_eq!(config.path.display(), "test.db");
    }

    #[test]
    fn test_from_raw_config() {
        let config = SqliteConfig::from_connection_config(&resolved(raw_config! {
            "adapter" => "sqlite",
            "database" => "path/to/dbfile",
            "foreign_keys" => false,
            "timeout" => 250,
        }))
        .unwrap();

        assert_eq!(config.path, DatabasePath::File(PathBuf::from("path/to/dbfile")));
        assert!(!config.foreign_keys);
        assert_eq!(config.busy_timeout_ms, Some(250));
    }

    #[test]
    fn test_from_url_memory() {
        let config =
            SqliteConfig::from_connection_config(&resolved(decode_url("sqlite::memory:").unwrap())).unwrap();
        assert!(config.path.is_memory());
    }

    #[test]
    fn test_from_url_with_options() {
        let raw = decode_url("sqlite:///data/app.db?foreign_keys=1&busy_timeout=10000&synchronous=full").unwrap();
        let config = SqliteConfig::from_connection_config(&resolved(raw)).unwrap();

        assert_eq!(config.path, DatabasePath::File(PathBuf::from("data/app.db")));
        assert!(config.foreign_keys);
        assert_eq!(config.busy_timeout_ms, Some(10000));
        assert_eq!(config.synchronous, SynchronousMode::Full);
    }

    #[test]
    fn test_mode_memory_overrides_path() {
        let raw = decode_url("sqlite:///app.db?mode=memory").unwrap();
        let config = SqliteConfig::from_connection_config(&resolved(raw)).unwrap();
        assert!(config.path.is_memory());
    }

    #[test]
    fn test_missing_database() {
        let err = SqliteConfig::from_connection_config(&resolved(raw_config! { "adapter" => "sqlite" }))
            .unwrap_err();
        assert!(err.to_string().contains("database path is required"));
    }

    #[test]
    fn test_invalid_options() {
        let cases = [
            raw_config! { "adapter" => "sqlite", "database" => "a.db", "foreign_keys" => "maybe" },
            raw_config! { "adapter" => "sqlite", "database" => "a.db", "busy_timeout" => -1 },
            raw_config! { "adapter" => "sqlite", "database" => "a.db", "journal_mode" => "fast" },
        ];

        for raw in cases {
            assert!(SqliteConfig::from_connection_config(&resolved(raw)).is_err());
        }
    }

    #[test]
    fn test_init_sql() {
        let config = SqliteConfig::default();
        let sql = config.init_sql();

        assert!(sql.contains("foreign_keys = ON"));
        assert!(sql.contains("journal_mode = WAL"));
        assert!(sql.contains("synchronous = NORMAL"));
        assert!(sql.contains("busy_timeout = 5000"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = SqliteConfig::memory()
            .foreign_keys(false)
            .busy_timeout(3000)
            .journal_mode(JournalMode::Memory);

        assert!(!config.foreign_keys);
        assert_eq!(config.busy_timeout_ms, Some(3000));
        assert_eq!(config.journal_mode, JournalMode::Memory);
        assert!(!config.init_sql().contains("foreign_keys"));
    }
}
