//! Descriptor resolution.
//!
//! Resolution walks a [`Descriptor`] down to a [`ConnectionConfig`]:
//!
//! 1. **Absent** becomes the current environment name, if there is one.
//! 2. **ProfileName** is looked up in the registry. A registered profile
//!    always wins; only an unregistered name that parses as a URL is decoded.
//!    Profiles may reference other profiles; a reference chain that revisits
//!    a name fails with [`ConnectionError::CyclicConfiguration`].
//! 3. **Url** is decoded into a configuration map.
//! 4. **RawConfig** is normalized and must name an adapter.
//!
//! [`Resolver::establish`] then loads the adapter and replaces the handle
//! registered under the target name.

use tether_config::{ConfigurationRegistry, EnvSource, Profile, current_environment};
use tracing::{debug, info};

use crate::adapter::AdapterLoader;
use crate::config::ConnectionConfig;
use crate::decoder::{decode_url, is_url};
use crate::descriptor::Descriptor;
use crate::error::{ConnectionError, ConnectionResult};
use crate::handler::{ConnectionHandle, ConnectionHandler};

/// Resolves descriptors against a registry and an adapter loader.
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    registry: &'a ConfigurationRegistry,
    loader: &'a AdapterLoader,
    environment: Option<String>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver with no environment fallback.
    pub fn new(registry: &'a ConfigurationRegistry, loader: &'a AdapterLoader) -> Self {
        Self {
            registry,
            loader,
            environment: None,
        }
    }

    /// Use `name` as the profile when no descriptor is given.
    pub fn with_environment(mut self, name: impl Into<String>) -> Self {
        self.environment = Some(name.into());
        self
    }

    /// Set or clear the environment fallback.
    pub fn with_optional_environment(mut self, name: Option<String>) -> Self {
        self.environment = name;
        self
    }

    /// Read the environment fallback from `TETHER_ENV`.
    pub fn with_env_source(self, source: &impl EnvSource) -> Self {
        self.with_optional_environment(current_environment(source))
    }

    /// The environment fallback, if any.
    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// Resolve a descriptor to a canonical configuration without loading the adapter.
    pub fn resolve(&self, descriptor: impl Into<Descriptor>) -> ConnectionResult<ConnectionConfig> {
        let mut chain = Vec::new();
        self.normalize(descriptor.into(), &mut chain)
    }

    /// Resolve a descriptor, load its adapter and register a handle under `name`.
    ///
    /// Any handle already registered under `name` is removed first, so
    /// establishing the same name twice replaces the handle.
    pub fn establish<H>(
        &self,
        handler: &mut H,
        name: &str,
        descriptor: impl Into<Descriptor>,
    ) -> ConnectionResult<ConnectionConfig>
    where
        H: ConnectionHandler + ?Sized,
    {
        let config = self.resolve(descriptor)?;
        let connector = self.loader.load(config.adapter())?;

        if handler.remove_connection(name).is_some() {
            debug!(name, "Replacing existing connection");
        }
        handler.register_connection(ConnectionHandle::new(name, config.clone(), connector));

        info!(
            name,
            adapter = config.adapter(),
            host = ?config.host(),
            database = ?config.database(),
            "Connection established"
        );
        Ok(config)
    }

    fn normalize(
        &self,
        descriptor: Descriptor,
        chain: &mut Vec<String>,
    ) -> ConnectionResult<ConnectionConfig> {
        debug!(kind = descriptor.kind(), "Resolving descriptor");

        match descriptor {
            Descriptor::Absent => match &self.environment {
                Some(environment) => {
                    debug!(environment = %environment, "No descriptor given, using current environment");
                    self.normalize(Descriptor::ProfileName(environment.clone()), chain)
                }
                None => Err(ConnectionError::not_specified(
                    "no database configuration given and no current environment is set",
                )),
            },
            Descriptor::ProfileName(name) => self.resolve_name(name, chain),
            Descriptor::Url(url) => {
                let raw = decode_url(&url)?;
                self.normalize(Descriptor::RawConfig(raw), chain)
            }
            Descriptor::RawConfig(raw) => ConnectionConfig::from_raw(raw),
        }
    }

    fn resolve_name(&self, name: String, chain: &mut Vec<String>) -> ConnectionResult<ConnectionConfig> {
        if chain.contains(&name) {
            chain.push(name);
            return Err(ConnectionError::CyclicConfiguration {
                chain: std::mem::take(chain),
            });
        }

        match self.registry.get(&name) {
            Some(Profile::Config(raw)) => {
                debug!(profile = %name, "Profile found");
                ConnectionConfig::from_raw(raw.clone()).map_err(|err| err.in_profile(&name))
            }
            Some(Profile::Reference(target)) => {
                debug!(profile = %name, target = %target, "Profile found");
                chain.push(name);
                self.normalize(Descriptor::ProfileName(target.clone()), chain)
            }
            None if is_url(&name) => self.normalize(Descriptor::Url(name), chain),
            None => Err(ConnectionError::not_configured(&name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::tests::{MockConnection, mock_loader};
    use crate::adapter::{AdapterModule, Connector};
    use crate::handler::{ConnectionTable, PRIMARY};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tether_config::{ENVIRONMENT_VAR, MapEnvSource, RawConfig, Value, raw_config};

    fn registry() -> ConfigurationRegistry {
        ConfigurationRegistry::new()
            .with_profile("development", raw_config! {
                "adapter" => "sqlite",
                "database" => "db/development.sqlite3",
            })
            .with_profile("production", raw_config! {
                ":adapter" => "postgresql",
                ":host" => "db.internal",
                ":database" => "app",
            })
            .with_profile("test", "development")
            .with_profile("staging", "postgres://deploy@staging.internal/app")
            .with_profile("prod:", raw_config! { "adapter" => "sqlite", "database" => "registry.db" })
            .with_profile("broken", raw_config! { "database" => "no-adapter.db" })
            .with_profile("loop-a", "loop-b")
            .with_profile("loop-b", "loop-a")
            .with_profile("self", "self")
    }

    #[test]
    fn test_resolve_raw_config() {
        let registry = registry();
        let loader = mock_loader();
        let config = Resolver::new(&registry, &loader)
            .resolve(raw_config! { "adapter" => "sqlite", "database" => "/tmp/a.db" })
            .unwrap();

        assert_eq!(config.adapter(), "sqlite");
        assert_eq!(config.database(), Some("/tmp/a.db"));
    }

    #[test]
    fn test_resolve_missing_adapter() {
        let registry = registry();
        let loader = mock_loader();
        let resolver = Resolver::new(&registry, &loader);

        let inputs = [
            raw_config! { "database" => "/tmp/a.db" },
            raw_config! { "host" => "localhost", "port" => 5432 },
            RawConfig::new(),
        ];
        for raw in inputs {
            assert!(resolver.resolve(raw).unwrap_err().is_adapter_not_specified());
        }

        assert!(resolver.resolve("broken").unwrap_err().is_adapter_not_specified());
    }

    #[test]
    fn test_missing_adapter_names_profile() {
        let registry = registry().with_profile("reporting", "broken");
        let loader = mock_loader();
        let resolver = Resolver::new(&registry, &loader);

        for name in ["broken", "reporting"] {
            let err = resolver.resolve(name).unwrap_err();
            assert!(err.is_adapter_not_specified());
            assert_eq!(
                err.to_string(),
                "`broken` database configuration does not specify adapter"
            );
        }
    }

    #[test]
    fn test_resolve_profile() {
        let registry = registry();
        let loader = mock_loader();
        let config = Resolver::new(&registry, &loader).resolve("production").unwrap();

        assert_eq!(config.adapter(), "postgresql");
        assert_eq!(config.host(), Some("db.internal"));
        assert_eq!(config.database(), Some("app"));
    }

    #[test]
    fn test_resolve_profile_reference() {
        let registry = registry();
        let loader = mock_loader();
        let resolver = Resolver::new(&registry, &loader);

        assert_eq!(resolver.resolve("test").unwrap(), resolver.resolve("development").unwrap());

        let staging = resolver.resolve("staging").unwrap();
        assert_eq!(staging.adapter(), "postgresql");
        assert_eq!(staging.username(), Some("deploy"));
    }

    #[test]
    fn test_resolve_url_string() {
        let registry = registry();
        let loader = mock_loader();
        let config = Resolver::new(&registry, &loader)
            .resolve("postgres://u:p@localhost/db")
            .unwrap();

        assert_eq!(
            config.as_raw(),
            &raw_config! {
                "adapter" => "postgresql",
                "username" => "u",
                "password" => "p",
                "host" => "localhost",
                "database" => "db",
            }
        );
    }

    #[test]
    fn test_profile_takes_precedence_over_url() {
        let registry = registry();
        let loader = mock_loader();
        let resolver = Resolver::new(&registry, &loader);

        // "prod:" parses as a URL with scheme "prod", but is also a profile.
        assert!(is_url("prod:"));
        let config = resolver.resolve("prod:").unwrap();
        assert_eq!(config.adapter(), "sqlite");
        assert_eq!(config.database(), Some("registry.db"));
    }

    #[test]
    fn test_unknown_name() {
        let registry = registry();
        let loader = mock_loader();
        let err = Resolver::new(&registry, &loader).resolve("reporting").unwrap_err();

        assert!(err.is_adapter_not_specified());
        assert!(err.to_string().contains("reporting"));
    }

    #[test]
    fn test_explicit_url_malformed() {
        let registry = registry();
        let loader = mock_loader();
        let err = Resolver::new(&registry, &loader)
            .resolve(Descriptor::url("development"))
            .unwrap_err();

        assert!(matches!(err, ConnectionError::MalformedUrl { .. }));
    }

    #[test]
    fn test_explicit_url_skips_registry() {
        let registry = registry();
        let loader = mock_loader();
        let config = Resolver::new(&registry, &loader)
            .resolve(Descriptor::url("prod:"))
            .unwrap();

        assert_eq!(config.adapter(), "prod");
    }

    #[test]
    fn test_absent_without_environment() {
        let registry = registry();
        let loader = mock_loader();
        let err = Resolver::new(&registry, &loader).resolve(Descriptor::Absent).unwrap_err();

        assert!(err.is_adapter_not_specified());
    }

    #[test]
    fn test_absent_with_environment() {
        let registry = registry();
        let loader = mock_loader();

        let config = Resolver::new(&registry, &loader)
            .with_environment("production")
            .resolve(None::<&str>)
            .unwrap();
        assert_eq!(config.adapter(), "postgresql");

        let env = MapEnvSource::new().set(ENVIRONMENT_VAR, "test");
        let config = Resolver::new(&registry, &loader)
            .with_env_source(&env)
            .resolve(Descriptor::Absent)
            .unwrap();
        assert_eq!(config.adapter(), "sqlite");
    }

    #[test]
    fn test_absent_with_unknown_environment() {
        let registry = registry();
        let loader = mock_loader();
        let err = Resolver::new(&registry, &loader)
            .with_environment("qa")
            .resolve(Descriptor::Absent)
            .unwrap_err();

        assert!(err.is_adapter_not_specified());
        assert!(err.to_string().contains("qa"));
    }

    #[test]
    fn test_cycles() {
        let registry = registry();
        let loader = mock_loader();
        let resolver = Resolver::new(&registry, &loader);

        match resolver.resolve("loop-a").unwrap_err() {
            ConnectionError::CyclicConfiguration { chain } => {
                assert_eq!(chain, vec!["loop-a", "loop-b", "loop-a"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = resolver.resolve("self").unwrap_err();
        assert!(matches!(err, ConnectionError::CyclicConfiguration { .. }));
        assert!(err.to_string().contains("self -> self"));
    }

    #[test]
    fn test_environment_cycle() {
        let registry = registry();
        let loader = mock_loader();
        let err = Resolver::new(&registry, &loader)
            .with_environment("loop-b")
            .resolve(Descriptor::Absent)
            .unwrap_err();

        assert!(matches!(err, ConnectionError::CyclicConfiguration { .. }));
    }

    #[test]
    fn test_establish_registers_handle() {
        let registry = registry();
        let loader = mock_loader();
        let mut table = ConnectionTable::new();

        let config = Resolver::new(&registry, &loader)
            .establish(&mut table, PRIMARY, raw_config! { "adapter" => "sqlite", "database" => "/tmp/a.db" })
            .unwrap();

        assert_eq!(config.adapter(), "sqlite");
        let handle = table.connection_handle(PRIMARY).unwrap();
        assert_eq!(handle.adapter(), "sqlite");
        assert_eq!(handle.config().database(), Some("/tmp/a.db"));
    }

    #[test]
    fn test_establish_twice_replaces() {
        let registry = registry();
        let loader = mock_loader();
        let mut table = ConnectionTable::new();
        let resolver = Resolver::new(&registry, &loader);

        resolver.establish(&mut table, PRIMARY, "development").unwrap();
        resolver.establish(&mut table, PRIMARY, "production").unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.connection_handle(PRIMARY).unwrap().adapter(), "postgresql");
    }

    #[test]
    fn test_establish_failure_keeps_existing_handle() {
        let registry = registry();
        let loader = mock_loader();
        let mut table = ConnectionTable::new();
        let resolver = Resolver::new(&registry, &loader);

        resolver.establish(&mut table, PRIMARY, "development").unwrap();
        let err = resolver
            .establish(&mut table, PRIMARY, "oracle://db.internal/app")
            .unwrap_err();

        assert!(matches!(err, ConnectionError::AdapterLoadError { .. }));
        assert_eq!(table.connection_handle(PRIMARY).unwrap().adapter(), "sqlite");
    }

    #[test]
    fn test_establish_adapter_not_found() {
        struct Stub;

        impl AdapterModule for Stub {
            fn name(&self) -> &str {
                "stub"
            }

            fn connector(&self) -> Option<Arc<dyn Connector>> {
                None
            }
        }

        let registry = registry();
        let mut loader = mock_loader();
        loader.register(Stub);
        let mut table = ConnectionTable::new();

        let err = Resolver::new(&registry, &loader)
            .establish(&mut table, PRIMARY, "stub://localhost/app")
            .unwrap_err();

        assert!(matches!(err, ConnectionError::AdapterNotFound { ref adapter } if adapter == "stub"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_establish_and_connect() {
        let registry = registry();
        let loader = mock_loader();
        let mut table = ConnectionTable::new();

        Resolver::new(&registry, &loader)
            .establish(&mut table, "analytics", "postgres://localhost/analytics?pool=5")
            .unwrap();

        let handle = table.connection_handle_mut("analytics").unwrap();
        assert_eq!(handle.config().get("pool"), Some(&Value::from("5")));
        let conn = handle.connection().unwrap();
        assert_eq!(conn.adapter(), "postgresql");
        assert!(format!("{:?}", conn).contains("analytics"));
    }

    #[test]
    fn test_mock_connection_records_database() {
        let conn = MockConnection {
            adapter: "sqlite".into(),
            database: Some("x".into()),
        };
        assert_eq!(conn.database.as_deref(), Some("x"));
    }
}
