//! Connection manager: the registry, the adapter loader and the handle table
//! held together.

use tether_config::{ConfigurationRegistry, DATABASE_URL_VAR, EnvSource, current_environment};
use tracing::{debug, info};

use crate::adapter::{AdapterLoader, Connection};
use crate::config::ConnectionConfig;
use crate::descriptor::Descriptor;
use crate::error::{ConnectionError, ConnectionResult};
use crate::handler::{ConnectionHandle, ConnectionHandler, ConnectionTable, PRIMARY};
use crate::resolver::Resolver;

/// Entry point for establishing connections.
///
/// ```rust
/// use tether_config::{ConfigurationRegistry, raw_config};
/// use tether_connect::{AdapterLoader, BoxError, Connection, ConnectionConfig, ConnectionManager};
///
/// #[derive(Debug)]
/// struct NullConnection;
///
/// impl Connection for NullConnection {
///     fn adapter(&self) -> &str {
///         "sqlite"
///     }
/// }
///
/// let registry = ConfigurationRegistry::new().with_profile("development", raw_config! {
///     "adapter" => "sqlite",
///     "database" => "db/development.sqlite3",
/// });
///
/// let mut loader = AdapterLoader::new();
/// loader.register_connector("sqlite", |_: &ConnectionConfig| -> Result<Box<dyn Connection>, BoxError> {
///     Ok(Box::new(NullConnection))
/// });
///
/// let mut manager = ConnectionManager::new(registry, loader).with_environment("development");
/// let config = manager.establish_connection(None::<&str>).unwrap();
///
/// assert_eq!(config.database(), Some("db/development.sqlite3"));
/// assert!(manager.is_established("primary"));
/// ```
#[derive(Debug, Default)]
pub struct ConnectionManager {
    registry: ConfigurationRegistry,
    loader: AdapterLoader,
    handles: ConnectionTable,
    environment: Option<String>,
}

impl ConnectionManager {
    /// Create a manager with no environment fallback.
    pub fn new(registry: ConfigurationRegistry, loader: AdapterLoader) -> Self {
        Self {
            registry,
            loader,
            handles: ConnectionTable::new(),
            environment: None,
        }
    }

    /// Use `name` as the profile when no descriptor is given.
    pub fn with_environment(mut self, name: impl Into<String>) -> Self {
        self.environment = Some(name.into());
        self
    }

    /// Read the environment fallback from `TETHER_ENV`.
    pub fn with_env_source(mut self, source: &impl EnvSource) -> Self {
        self.environment = current_environment(source);
        self
    }

    /// The environment fallback, if any.
    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// The configuration registry.
    pub fn registry(&self) -> &ConfigurationRegistry {
        &self.registry
    }

    /// Mutable access to the configuration registry.
    pub fn registry_mut(&mut self) -> &mut ConfigurationRegistry {
        &mut self.registry
    }

    /// The adapter loader.
    pub fn loader(&self) -> &AdapterLoader {
        &self.loader
    }

    /// Mutable access to the adapter loader, for registering adapters.
    pub fn loader_mut(&mut self) -> &mut AdapterLoader {
        &mut self.loader
    }

    /// A resolver over this manager's registry and loader.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.registry, &self.loader).with_optional_environment(self.environment.clone())
    }

    /// Resolve a descriptor without establishing anything.
    pub fn resolve(&self, descriptor: impl Into<Descriptor>) -> ConnectionResult<ConnectionConfig> {
        self.resolver().resolve(descriptor)
    }

    /// Establish the primary connection.
    pub fn establish_connection(
        &mut self,
        descriptor: impl Into<Descriptor>,
    ) -> ConnectionResult<ConnectionConfig> {
        self.establish_named(PRIMARY, descriptor)
    }

    /// Establish a connection under `name`, replacing any existing handle.
    pub fn establish_named(
        &mut self,
        name: &str,
        descriptor: impl Into<Descriptor>,
    ) -> ConnectionResult<ConnectionConfig> {
        Resolver::new(&self.registry, &self.loader)
            .with_optional_environment(self.environment.clone())
            .establish(&mut self.handles, name, descriptor)
    }

    /// Establish the primary connection from `DATABASE_URL`, falling back to
    /// the current environment when it is unset.
    pub fn establish_from_env(&mut self, source: &impl EnvSource) -> ConnectionResult<ConnectionConfig> {
        let descriptor = Descriptor::from_env(source);
        if descriptor.is_absent() {
            debug!(var = DATABASE_URL_VAR, "Not set, using current environment");
        }
        self.establish_connection(descriptor)
    }

    /// The handle registered under `name`.
    pub fn handle(&self, name: &str) -> Option<&ConnectionHandle> {
        self.handles.connection_handle(name)
    }

    /// Check whether a handle is registered under `name`.
    pub fn is_established(&self, name: &str) -> bool {
        self.handles.contains(name)
    }

    /// Names of the registered handles.
    pub fn handles(&self) -> impl Iterator<Item = &str> {
        self.handles.names()
    }

    /// The live connection for `name`, opened on first use.
    pub fn connection(&mut self, name: &str) -> ConnectionResult<&mut dyn Connection> {
        self.handles
            .connection_handle_mut(name)
            .ok_or_else(|| ConnectionError::ConnectionNotEstablished {
                name: name.to_string(),
            })?
            .connection()
    }

    /// Remove and disconnect the handle under `name`, returning its configuration.
    pub fn remove_connection(&mut self, name: &str) -> Option<ConnectionConfig> {
        let handle = self.handles.remove_connection(name)?;
        info!(name, adapter = handle.adapter(), "Connection removed");
        Some(handle.config().clone())
    }

    /// Disconnect and remove every handle.
    pub fn clear(&mut self) {
        self.handles.clear();
    }
}
