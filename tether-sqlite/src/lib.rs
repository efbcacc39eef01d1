//! SQLite adapter for Tether.
//!
//! Registers the `sqlite` adapter (alias `sqlite3`) with an
//! [`AdapterLoader`](tether_connect::AdapterLoader). Connections are opened
//! through `rusqlite` the first time a handle is used.
//!
//! # Example
//!
//! ```rust
//! use tether_config::{ConfigurationRegistry, raw_config};
//! use tether_connect::{AdapterLoader, ConnectionManager, PRIMARY};
//!
//! let mut loader = AdapterLoader::new();
//! tether_sqlite::register(&mut loader);
//!
//! let mut manager = ConnectionManager::new(ConfigurationRegistry::new(), loader);
//! manager
//!     .establish_connection(raw_config! { "adapter" => "sqlite", "database" => ":memory:" })
//!     .unwrap();
//!
//! manager.connection(PRIMARY).unwrap().ping().unwrap();
//! ```

pub mod adapter;
pub mod config;
pub mod connection;
pub mod error;

pub use adapter::{ADAPTER_ALIAS, ADAPTER_NAME, SqliteAdapter, SqliteConnector, register};
pub use config::{DatabasePath, JournalMode, SqliteConfig, SynchronousMode};
pub use connection::SqliteConnection;
pub use error::{SqliteError, SqliteResult};
