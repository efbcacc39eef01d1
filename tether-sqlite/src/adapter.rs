//! Adapter registration.

use std::sync::Arc;

use tether_connect::{AdapterLoader, AdapterModule, BoxError, Connection, ConnectionConfig, Connector};
use tracing::debug;

use crate::config::SqliteConfig;
use crate::connection::SqliteConnection;

/// Adapter identifier.
pub const ADAPTER_NAME: &str = "sqlite";

/// Alternative identifier accepted for the same adapter.
pub const ADAPTER_ALIAS: &str = "sqlite3";

/// Construction entry point for SQLite connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteConnector;

impl Connector for SqliteConnector {
    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Connection>, BoxError> {
        let sqlite = SqliteConfig::from_connection_config(config)?;
        Ok(Box::new(SqliteConnection::open(&sqlite)?))
    }
}

/// The SQLite adapter module.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteAdapter;

impl AdapterModule for SqliteAdapter {
    fn name(&self) -> &str {
        ADAPTER_NAME
    }

    fn load(&self) -> Result<(), BoxError> {
        debug!(version = rusqlite::version(), "SQLite library available");
        Ok(())
    }

    fn connector(&self) -> Option<Arc<dyn Connector>> {
        Some(Arc::new(SqliteConnector))
    }
}

/// Register the SQLite adapter under `sqlite` and `sqlite3`.
pub fn register(loader: &mut AdapterLoader) {
    loader.register(SqliteAdapter);
    loader.register_alias(ADAPTER_ALIAS, ADAPTER_NAME);
}
