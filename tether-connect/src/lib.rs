//! # tether-connect
//!
//! Connection descriptor resolution and adapter dispatch for Tether.
//!
//! A caller describes how to connect with a [`Descriptor`]: nothing at all
//! (use the current environment), a profile name, a URL, or a configuration
//! map. Resolution turns it into a canonical [`ConnectionConfig`], loads the
//! adapter the configuration names and registers a [`ConnectionHandle`]
//! under a connection name, replacing any handle that was there before.
//!
//! ## Modules
//!
//! - [`decoder`]: connection URL decoding
//! - [`config`]: the validated configuration type
//! - [`descriptor`]: descriptor shapes
//! - [`adapter`]: adapter modules, connectors and the loader
//! - [`handler`]: connection handles and the handle table
//! - [`resolver`]: descriptor resolution and connection establishment
//! - [`manager`]: everything above held together
//! - [`logging`]: environment-driven logging setup
//!
//! ## Example
//!
//! ```rust
//! use tether_config::{ConfigurationRegistry, raw_config};
//! use tether_connect::{AdapterLoader, Resolver};
//!
//! let registry = ConfigurationRegistry::new()
//!     .with_profile("production", raw_config! {
//!         "adapter" => "postgresql",
//!         "host" => "db.internal",
//!     });
//! let loader = AdapterLoader::new();
//! let resolver = Resolver::new(&registry, &loader);
//!
//! // Registered profiles win over URL interpretation.
//! let config = resolver.resolve("production").unwrap();
//! assert_eq!(config.host(), Some("db.internal"));
//!
//! // Unregistered strings are decoded as URLs.
//! let config = resolver.resolve("postgres://u:p@localhost/db").unwrap();
//! assert_eq!(config.adapter(), "postgresql");
//! assert_eq!(config.database(), Some("db"));
//! ```

pub mod adapter;
pub mod config;
pub mod decoder;
pub mod descriptor;
pub mod error;
pub mod handler;
pub mod logging;
pub mod manager;
pub mod resolver;

pub use adapter::{AdapterLoader, AdapterModule, Connection, Connector, package_name};
pub use config::{ConnectionConfig, keys};
pub use decoder::{adapter_for_scheme, decode_url, is_url};
pub use descriptor::Descriptor;
pub use error::{BoxError, ConnectionError, ConnectionResult};
pub use handler::{ConnectionHandle, ConnectionHandler, ConnectionTable, PRIMARY};
pub use manager::ConnectionManager;
pub use resolver::Resolver;
