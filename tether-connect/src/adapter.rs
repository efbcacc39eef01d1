//! Pluggable adapters.
//!
//! An adapter crate makes itself available by registering an
//! [`AdapterModule`] with an [`AdapterLoader`] during bootstrap. Resolution
//! then asks the loader for the module matching the configuration's
//! `adapter` key and takes its [`Connector`], the construction entry point
//! that turns a [`ConnectionConfig`] into a live [`Connection`].
//!
//! ```rust
//! use tether_connect::{AdapterLoader, BoxError, Connection, ConnectionConfig};
//!
//! #[derive(Debug)]
//! struct NullConnection;
//!
//! impl Connection for NullConnection {
//!     fn adapter(&self) -> &str {
//!         "null"
//!     }
//! }
//!
//! let mut loader = AdapterLoader::new();
//! loader.register_connector("null", |_: &ConnectionConfig| -> Result<Box<dyn Connection>, BoxError> {
//!     Ok(Box::new(NullConnection))
//! });
//!
//! assert!(loader.load("null").is_ok());
//! assert!(loader.load("oracle").is_err());
//! ```

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::config::ConnectionConfig;
use crate::error::{BoxError, ConnectionError, ConnectionResult};

/// A live connection produced by an adapter.
///
/// What a connection can do is up to the adapter; resolution only needs to
/// know which adapter made it and how to close it.
pub trait Connection: Send + fmt::Debug {
    /// Identifier of the adapter that opened this connection.
    fn adapter(&self) -> &str;

    /// Whether the connection is still usable.
    fn is_active(&self) -> bool {
        true
    }

    /// Round-trip to the server to check the connection works.
    fn ping(&mut self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Close the connection.
    fn disconnect(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Construction entry point of an adapter.
pub trait Connector: Send + Sync {
    /// Open a connection for the given configuration.
    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Connection>, BoxError>;
}

impl<F> Connector for F
where
    F: Fn(&ConnectionConfig) -> Result<Box<dyn Connection>, BoxError> + Send + Sync,
{
    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Connection>, BoxError> {
        self(config)
    }
}

/// An adapter implementation as seen by the loader.
pub trait AdapterModule: Send + Sync {
    /// Adapter identifier, matched against the `adapter` configuration key.
    fn name(&self) -> &str;

    /// Make the implementation available (check native libraries, warm up
    /// drivers). Called on every load; failures surface as load errors.
    fn load(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// The construction entry point, if this module provides one.
    fn connector(&self) -> Option<Arc<dyn Connector>>;
}

/// Module wrapping a bare connector.
struct ConnectorModule {
    name: String,
    connector: Arc<dyn Connector>,
}

impl AdapterModule for ConnectorModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn connector(&self) -> Option<Arc<dyn Connector>> {
        Some(Arc::clone(&self.connector))
    }
}

/// Registry of adapter identifier to adapter module.
#[derive(Clone, Default)]
pub struct AdapterLoader {
    modules: IndexMap<String, Arc<dyn AdapterModule>>,
}

impl AdapterLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module under its own name, replacing any previous module
    /// of the same name.
    pub fn register<M: AdapterModule + 'static>(&mut self, module: M) -> &mut Self {
        let module: Arc<dyn AdapterModule> = Arc::new(module);
        debug!(adapter = module.name(), "Adapter registered");
        self.modules.insert(module.name().to_string(), module);
        self
    }

    /// Register a bare connector as an adapter.
    pub fn register_connector<C: Connector + 'static>(
        &mut self,
        name: impl Into<String>,
        connector: C,
    ) -> &mut Self {
        self.register(ConnectorModule {
            name: name.into(),
            connector: Arc::new(connector),
        })
    }

    /// Make an already registered adapter reachable under another identifier.
    ///
    /// Returns `false` if `target` is not registered.
    pub fn register_alias(&mut self, alias: impl Into<String>, target: &str) -> bool {
        match self.modules.get(target).cloned() {
            Some(module) => {
                self.modules.insert(alias.into(), module);
                true
            }
            None => false,
        }
    }

    /// Check whether an adapter is registered.
    pub fn contains(&self, adapter: &str) -> bool {
        self.modules.contains_key(adapter)
    }

    /// Registered adapter identifiers, in registration order.
    pub fn adapters(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Number of registered identifiers (aliases included).
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check whether no adapter is registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Load an adapter and return its construction entry point.
    ///
    /// # Errors
    ///
    /// - [`ConnectionError::AdapterLoadError`] when no module is registered
    ///   under `adapter` or the module's load hook fails
    /// - [`ConnectionError::AdapterNotFound`] when the module provides no
    ///   construction entry point
    pub fn load(&self, adapter: &str) -> ConnectionResult<Arc<dyn Connector>> {
        debug!(adapter, "AdapterLoader::load()");

        let module = self.modules.get(adapter).ok_or_else(|| {
            load_error(
                adapter,
                BoxError::from(format!("no adapter named `{}` is registered", adapter)),
            )
        })?;

        module.load().map_err(|source| load_error(adapter, source))?;

        module
            .connector()
            .ok_or_else(|| ConnectionError::AdapterNotFound {
                adapter: adapter.to_string(),
            })
    }
}

impl fmt::Debug for AdapterLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterLoader")
            .field("adapters", &self.modules.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Name of the package expected to provide an adapter.
pub fn package_name(adapter: &str) -> String {
    format!("tether-{}", adapter)
}

fn load_error(adapter: &str, source: BoxError) -> ConnectionError {
    ConnectionError::AdapterLoadError {
        adapter: adapter.to_string(),
        package: package_name(adapter),
        source,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    pub(crate) struct MockConnection {
        pub adapter: String,
        pub database: Option<String>,
    }

    impl Connection for MockConnection {
        fn adapter(&self) -> &str {
            &self.adapter
        }
    }

    /// Connector recording how many connections it opened.
    #[derive(Default)]
    pub(crate) struct CountingConnector {
        pub opened: Arc<AtomicUsize>,
    }

    impl Connector for CountingConnector {
        fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Connection>, BoxError> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(MockConnection {
                adapter: config.adapter().to_string(),
                database: config.database().map(String::from),
            }))
        }
    }

    struct BrokenModule;

    impl AdapterModule for BrokenModule {
        fn name(&self) -> &str {
            "broken"
        }

        fn load(&self) -> Result<(), BoxError> {
            Err("libbroken.so: cannot open shared object file".into())
        }

        fn connector(&self) -> Option<Arc<dyn Connector>> {
            None
        }
    }

    struct EmptyModule;

    impl AdapterModule for EmptyModule {
        fn name(&self) -> &str {
            "empty"
        }

        fn connector(&self) -> Option<Arc<dyn Connector>> {
            None
        }
    }

    pub(crate) fn mock_loader() -> AdapterLoader {
        let mut loader = AdapterLoader::new();
        loader
            .register_connector("sqlite", CountingConnector::default())
            .register_connector("postgresql", CountingConnector::default());
        loader
    }

    #[test]
    fn test_load_registered() {
        let loader = mock_loader();
        assert!(loader.load("sqlite").is_ok());
        assert!(loader.load("postgresql").is_ok());
    }

    #[test]
    fn test_load_unregistered() {
        let err = mock_loader().load("oracle").err().unwrap();
        match &err {
            ConnectionError::AdapterLoadError { adapter, package, .. } => {
                assert_eq!(adapter, "oracle");
                assert_eq!(package, "tether-oracle");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("tether-oracle"));
    }

    #[test]
    fn test_load_hook_failure_wraps_source() {
        let mut loader = AdapterLoader::new();
        loader.register(BrokenModule);

        let err = loader.load("broken").err().unwrap();
        assert!(matches!(err, ConnectionError::AdapterLoadError { .. }));
        assert!(err.to_string().contains("cannot open shared object file"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_module_without_connector() {
        let mut loader = AdapterLoader::new();
        loader.register(EmptyModule);

        let err = loader.load("empty").err().unwrap();
        assert!(matches!(err, ConnectionError::AdapterNotFound { ref adapter } if adapter == "empty"));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_alias() {
        let mut loader = mock_loader();
        assert!(loader.register_alias("sqlite3", "sqlite"));
        assert!(!loader.register_alias("pg", "missing"));

        assert!(loader.load("sqlite3").is_ok());
        assert_eq!(loader.adapters().collect::<Vec<_>>(), vec!["sqlite", "postgresql", "sqlite3"]);
    }

    #[test]
    fn test_closure_connector() {
        let mut loader = AdapterLoader::new();
        loader.register_connector("mock", |config: &ConnectionConfig| -> Result<Box<dyn Connection>, BoxError> {
            Ok(Box::new(MockConnection {
                adapter: config.adapter().to_string(),
                database: None,
            }))
        });

        let connector = loader.load("mock").unwrap();
        let config = ConnectionConfig::from_raw(tether_config::raw_config! { "adapter" => "mock" }).unwrap();
        let conn = connector.connect(&config).unwrap();
        assert_eq!(conn.adapter(), "mock");
    }
}
