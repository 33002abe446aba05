//! Named server configurations and their lazily opened connections.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use tracing::info;

use crate::error::SqlChainError;
use crate::sqlite::SqliteConnector;
use crate::types::BackendKind;

mod config;
mod connector;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use connector::{Backend, Connector};

/// Registry of servers and their open handles.
///
/// Server names are case-insensitive. One handle is opened per (server, backend kind)
/// on first use and reused until [`ConnectionRegistry::shutdown`].
pub struct ConnectionRegistry {
    connector: Box<dyn Connector>,
    servers: HashMap<String, ServerConfig>,
    first_server: Option<String>,
    default_server: Option<String>,
    connections: HashMap<(String, BackendKind), Box<dyn Backend>>,
}

impl ConnectionRegistry {
    /// Registry backed by the bundled SQLite engine.
    #[must_use]
    pub fn new() -> Self {
        Self::with_connector(SqliteConnector::new())
    }

    /// Registry that opens handles through `connector`.
    pub fn with_connector(connector: impl Connector + 'static) -> Self {
        Self {
            connector: Box::new(connector),
            servers: HashMap::new(),
            first_server: None,
            default_server: None,
            connections: HashMap::new(),
        }
    }

    /// Register a server.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConfigError` if the name is empty or already registered.
    pub fn register(&mut self, server: &str, config: ServerConfig) -> Result<(), SqlChainError> {
        let name = normalize(server);
        if name.is_empty() {
            return Err(SqlChainError::ConfigError(
                "server name must not be empty".to_string(),
            ));
        }
        match self.servers.entry(name) {
            Entry::Occupied(entry) => Err(SqlChainError::ConfigError(format!(
                "Server '{}' is already registered",
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                if self.first_server.is_none() {
                    self.first_server = Some(entry.key().clone());
                }
                entry.insert(config);
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn is_registered(&self, server: &str) -> bool {
        self.servers.contains_key(&normalize(server))
    }

    #[must_use]
    pub fn config(&self, server: &str) -> Option<&ServerConfig> {
        self.servers.get(&normalize(server))
    }

    /// Make `server` the target of statements that don't name one.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConfigError` if the server isn't registered.
    pub fn set_default_server(&mut self, server: &str) -> Result<(), SqlChainError> {
        let name = normalize(server);
        if !self.servers.contains_key(&name) {
            return Err(unknown_server(&name));
        }
        self.default_server = Some(name);
        Ok(())
    }

    /// The registered name a statement will run against.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConfigError` if `server` isn't registered, or if it is
    /// `None` and no server is registered at all.
    pub fn server_name(&self, server: Option<&str>) -> Result<String, SqlChainError> {
        let name = match server {
            Some(server) => normalize(server),
            None => self
                .default_server
                .clone()
                .or_else(|| self.first_server.clone())
                .ok_or_else(|| {
                    SqlChainError::ConfigError("no database server is configured".to_string())
                })?,
        };
        if self.servers.contains_key(&name) {
            Ok(name)
        } else {
            Err(unknown_server(&name))
        }
    }

    /// Handle for (`server`, `kind`), opening it on first use.
    ///
    /// # Errors
    /// Returns `ConfigError` for unknown servers and `ConnectionError` if the handle
    /// can't be opened.
    pub fn resolve(
        &mut self,
        server: Option<&str>,
        kind: BackendKind,
    ) -> Result<&mut dyn Backend, SqlChainError> {
        let name = self.server_name(server)?;
        let Some(config) = self.servers.get(&name) else {
            return Err(unknown_server(&name));
        };
        match self.connections.entry((name, kind)) {
            Entry::Occupied(entry) => Ok(entry.into_mut().as_mut()),
            Entry::Vacant(entry) => {
                let backend = self.connector.connect(&entry.key().0, config, kind)?;
                info!(server = %entry.key().0, backend = kind.as_str(), "opened connection");
                Ok(entry.insert(backend).as_mut())
            }
        }
    }

    /// Number of open handles.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Close every open handle. Registered servers stay registered and reconnect on
    /// next use.
    pub fn shutdown(&mut self) {
        let closed = self.connections.len();
        self.connections.clear();
        if closed > 0 {
            info!(closed, "closed connections");
        }
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut servers: Vec<&String> = self.servers.keys().collect();
        servers.sort();
        f.debug_struct("ConnectionRegistry")
            .field("servers", &servers)
            .field("default_server", &self.default_server)
            .field("connections", &self.connections.len())
            .finish_non_exhaustive()
    }
}

fn normalize(server: &str) -> String {
    server.trim().to_lowercase()
}

fn unknown_server(name: &str) -> SqlChainError {
    SqlChainError::ConfigError(format!("Server '{name}' is not registered"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        let mut registry = ConnectionRegistry::new();
        assert!(registry.register("Main", ServerConfig::default()).is_ok());
        assert!(registry.is_registered("MAIN"));
        assert!(matches!(
            registry.register("main", ServerConfig::default()),
            Err(SqlChainError::ConfigError(_))
        ));
    }

    #[test]
    fn default_server_falls_back_to_first_registered() {
        let mut registry = ConnectionRegistry::new();
        assert!(registry.server_name(None).is_err());
        assert!(registry.register("a", ServerConfig::default()).is_ok());
        assert!(registry.register("b", ServerConfig::default()).is_ok());
        assert_eq!(registry.server_name(None).ok().as_deref(), Some("a"));
        assert!(registry.set_default_server("B").is_ok());
        assert_eq!(registry.server_name(None).ok().as_deref(), Some("b"));
        assert!(registry.set_default_server("c").is_err());
        assert!(matches!(
            registry.server_name(Some("missing")),
            Err(SqlChainError::ConfigError(_))
        ));
    }

    #[test]
    fn handles_are_memoized_per_kind() {
        let mut registry = ConnectionRegistry::new();
        assert!(registry.register("mem", ServerConfig::default()).is_ok());
        assert!(registry.resolve(None, BackendKind::Simple).is_ok());
        assert!(registry.resolve(Some("MEM"), BackendKind::Simple).is_ok());
        assert_eq!(registry.connection_count(), 1);
        assert!(registry.resolve(None, BackendKind::Prepared).is_ok());
        assert_eq!(registry.connection_count(), 2);
        registry.shutdown();
        assert_eq!(registry.connection_count(), 0);
    }
}
