//! SQLite connection wrapper.

use std::fmt;

use tether_connect::{BoxError, Connection};
use tracing::{debug, trace};

use crate::config::{DatabasePath, SqliteConfig};
use crate::error::{SqliteError, SqliteResult};

/// An open SQLite database.
pub struct SqliteConnection {
    conn: Option<rusqlite::Connection>,
    path: DatabasePath,
}

impl SqliteConnection {
    /// Open the database and apply the configured pragmas.
    pub fn open(config: &SqliteConfig) -> SqliteResult<Self> {
        let conn = match &config.path {
            DatabasePath::Memory => rusqlite::Connection::open_in_memory()?,
            DatabasePath::File(path) => rusqlite::Connection::open(path)?,
        };

        let init_sql = config.init_sql();
        trace!(sql = %init_sql, "Applying connection pragmas");
        conn.execute_batch(&init_sql)?;

        debug!(path = %config.path.display(), "SQLite database opened");
        Ok(Self {
            conn: Some(conn),
            path: config.path.clone(),
        })
    }

    /// The database path.
    pub fn path(&self) -> &DatabasePath {
        &self.path
    }

    /// Borrow the underlying driver connection.
    pub fn inner(&self) -> SqliteResult<&rusqlite::Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| SqliteError::connection("connection already closed"))
    }

    /// Execute one or more statements.
    pub fn execute_batch(&self, sql: &str) -> SqliteResult<()> {
        debug!(sql = %sql, "Executing batch");
        Ok(self.inner()?.execute_batch(sql)?)
    }

    /// Run a query returning a single integer.
    pub fn query_scalar(&self, sql: &str) -> SqliteResult<i64> {
        debug!(sql = %sql, "Executing scalar query");
        Ok(self.inner()?.query_row(sql, [], |row| row.get(0))?)
    }

    /// Close the database, reporting any error SQLite raises while closing.
    pub fn close(&mut self) -> SqliteResult<()> {
        match self.conn.take() {
            Some(conn) => conn.close().map_err(|(_, e)| SqliteError::from(e)),
            None => Ok(()),
        }
    }
}

impl Connection for SqliteConnection {
    fn adapter(&self) -> &str {
        "sqlite"
    }

    fn is_active(&self) -> bool {
        self.conn.is_some()
    }

    fn ping(&mut self) -> Result<(), BoxError> {
        self.query_scalar("SELECT 1")?;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), BoxError> {
        debug!(path = %self.path.display(), "Closing SQLite database");
        Ok(self.close()?)
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.path)
            .field("open", &self.conn.is_some())
            .finish()
    }
}
