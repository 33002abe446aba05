use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SqlChainError;

/// Connection settings for one named server.
///
/// Field defaults follow the conventional client defaults (`127.0.0.1:3306`, user
/// `root`, charset `utf8mb4`). For the bundled SQLite engine `database` is the file
/// path; an empty value (or `:memory:`) selects an in-memory database shared by both
/// backends of the server. Network fields are kept for configuration parity and show up
/// in error reports.
///
/// ```rust
/// use sql_chain::prelude::*;
///
/// let cfg = ServerConfig::from_json(r#"{ "database": "app.db", "password": "s3cret" }"#)?;
/// assert_eq!(cfg.port, 3306);
/// assert!(!cfg.to_string().contains("s3cret"));
/// # Ok::<(), SqlChainError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub charset: String,
    pub unix_socket: Option<String>,
    pub busy_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            database: String::new(),
            username: "root".to_string(),
            password: String::new(),
            charset: "utf8mb4".to_string(),
            unix_socket: None,
            busy_timeout_ms: 5000,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Parse a JSON object; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `SqlChainError::ConfigError` if the text is not a valid configuration.
    pub fn from_json(text: &str) -> Result<Self, SqlChainError> {
        serde_json::from_str(text)
            .map_err(|e| SqlChainError::ConfigError(format!("invalid server configuration: {e}")))
    }

    /// Whether the database lives in memory rather than in a file.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.database.is_empty() || self.database == ":memory:"
    }

    /// Rendering used in error messages, password masked.
    #[must_use]
    pub fn sanitized(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { "***" };
        write!(
            f,
            "host={} port={} database={} username={} password={} charset={}",
            self.host, self.port, self.database, self.username, password, self.charset
        )?;
        if let Some(socket) = &self.unix_socket {
            write!(f, " unix_socket={socket}")?;
        }
        Ok(())
    }
}

/// Fluent builder for [`ServerConfig`].
#[derive(Debug, Clone, Default)]
pub struct ServerConfigBuilder {
    cfg: ServerConfig,
}

impl ServerConfigBuilder {
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.cfg.host = host.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.cfg.port = port;
        self
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.cfg.database = database.into();
        self
    }

    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.cfg.username = username.into();
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.cfg.password = password.into();
        self
    }

    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.cfg.charset = charset.into();
        self
    }

    #[must_use]
    pub fn unix_socket(mut self, socket: impl Into<String>) -> Self {
        self.cfg.unix_socket = Some(socket.into());
        self
    }

    #[must_use]
    pub fn busy_timeout_ms(mut self, millis: u64) -> Self {
        self.cfg.busy_timeout_ms = millis;
        self
    }

    #[must_use]
    pub fn finish(self) -> ServerConfig {
        self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 3306);
        assert_eq!(cfg.username, "root");
        assert_eq!(cfg.charset, "utf8mb4");
        assert_eq!(cfg.unix_socket, None);
        assert_eq!(cfg.busy_timeout_ms, 5000);
        assert!(cfg.is_in_memory());
    }

    #[test]
    fn json_fills_missing_fields() {
        let cfg = ServerConfig::from_json(r#"{"database": "/tmp/x.db", "port": 3307}"#);
        let Ok(cfg) = cfg else {
            panic!("config should parse");
        };
        assert_eq!(cfg.port, 3307);
        assert_eq!(cfg.database, "/tmp/x.db");
        assert_eq!(cfg.charset, "utf8mb4");
        assert!(!cfg.is_in_memory());

        assert!(matches!(
            ServerConfig::from_json("{\"port\": \"nope\"}"),
            Err(SqlChainError::ConfigError(_))
        ));
    }

    #[test]
    fn display_masks_password() {
        let cfg = ServerConfig::builder()
            .password("hunter2")
            .unix_socket("/run/db.sock")
            .finish();
        let shown = cfg.to_string();
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("password=***"));
        assert!(shown.contains("unix_socket=/run/db.sock"));
    }
}
