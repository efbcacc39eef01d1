//! Named connection handles.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::adapter::{Connection, Connector};
use crate::config::ConnectionConfig;
use crate::error::{BoxError, ConnectionError, ConnectionResult};

/// Name of the default connection handle.
pub const PRIMARY: &str = "primary";

/// A registered connection: a configuration bound to its adapter's
/// construction entry point.
///
/// The live connection is opened on first use and kept until the handle is
/// disconnected or removed.
pub struct ConnectionHandle {
    name: String,
    config: ConnectionConfig,
    connector: Arc<dyn Connector>,
    connection: Option<Box<dyn Connection>>,
}

impl ConnectionHandle {
    /// Bind a configuration to a connector under a name.
    pub fn new(name: impl Into<String>, config: ConnectionConfig, connector: Arc<dyn Connector>) -> Self {
        Self {
            name: name.into(),
            config,
            connector,
            connection: None,
        }
    }

    /// Handle name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Adapter identifier.
    pub fn adapter(&self) -> &str {
        self.config.adapter()
    }

    /// Whether a live connection is currently open.
    pub fn is_connected(&self) -> bool {
        self.connection.as_ref().is_some_and(|c| c.is_active())
    }

    /// Get the live connection, opening it through the adapter if needed.
    pub fn connection(&mut self) -> ConnectionResult<&mut dyn Connection> {
        let conn = match self.connection.take() {
            Some(conn) if conn.is_active() => conn,
            _ => {
                debug!(name = %self.name, adapter = self.config.adapter(), "Opening connection");
                self.connector
                    .connect(&self.config)
                    .map_err(|source| ConnectionError::ConnectionFailed {
                        name: self.name.clone(),
                        adapter: self.config.adapter().to_string(),
                        source,
                    })?
            }
        };
        Ok(self.connection.insert(conn).as_mut())
    }

    /// Close the live connection, if any.
    pub fn disconnect(&mut self) -> Result<(), BoxError> {
        match self.connection.take() {
            Some(mut conn) => {
                debug!(name = %self.name, "Closing connection");
                conn.disconnect()
            }
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// The table of registered handles, as used by resolution.
pub trait ConnectionHandler {
    /// Remove and disconnect the handle registered under `name`.
    ///
    /// Removing a name that has no handle is a no-op.
    fn remove_connection(&mut self, name: &str) -> Option<ConnectionHandle>;

    /// Register a handle under its name.
    fn register_connection(&mut self, handle: ConnectionHandle);

    /// Look up a handle.
    fn connection_handle(&self, name: &str) -> Option<&ConnectionHandle>;

    /// Look up a handle mutably.
    fn connection_handle_mut(&mut self, name: &str) -> Option<&mut ConnectionHandle>;
}

/// In-memory handle table holding at most one handle per name.
#[derive(Debug, Default)]
pub struct ConnectionTable {
    handles: IndexMap<String, ConnectionHandle>,
}

impl ConnectionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Check whether no handle is registered.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Registered handle names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handles.keys().map(String::as_str)
    }

    /// Check whether a handle is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.handles.contains_key(name)
    }

    /// Disconnect and remove every handle.
    pub fn clear(&mut self) {
        let names: Vec<String> = self.handles.keys().cloned().collect();
        for name in names {
            self.remove_connection(&name);
        }
    }
}

impl ConnectionHandler for ConnectionTable {
    fn remove_connection(&mut self, name: &str) -> Option<ConnectionHandle> {
        let mut handle = self.handles.shift_remove(name)?;
        if let Err(e) = handle.disconnect() {
            warn!(name, error = %e, "Error while disconnecting removed connection");
        }
        Some(handle)
    }

    fn register_connection(&mut self, handle: ConnectionHandle) {
        if let Some(mut previous) = self.handles.insert(handle.name.clone(), handle) {
            if let Err(e) = previous.disconnect() {
                warn!(name = previous.name(), error = %e, "Error while disconnecting replaced connection");
            }
        }
    }

    fn connection_handle(&self, name: &str) -> Option<&ConnectionHandle> {
        self.handles.get(name)
    }

    fn connection_handle_mut(&mut self, name: &str) -> Option<&mut ConnectionHandle> {
        self.handles.get_mut(name)
    }
}
