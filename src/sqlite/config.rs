use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use super::{PreparedBackend, SimpleBackend};
use crate::error::SqlChainError;
use crate::registry::{Backend, Connector, ServerConfig};
use crate::types::BackendKind;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Default [`Connector`]: opens both backends on the bundled SQLite engine.
///
/// Each connector owns a private namespace for in-memory databases, so two registries
/// configuring the same server name never share data.
#[derive(Debug)]
pub struct SqliteConnector {
    instance: u64,
}

impl SqliteConnector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Path or URI a server's connections open.
    #[must_use]
    pub fn target(&self, server: &str, config: &ServerConfig) -> String {
        if config.is_in_memory() {
            let name: String = server
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect();
            format!(
                "file:sqlchain-{}-{name}?mode=memory&cache=shared",
                self.instance
            )
        } else {
            config.database.clone()
        }
    }

    /// Open and configure one connection.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConnectionError` with the sanitized configuration if the
    /// database can't be opened or the charset or timeout can't be applied.
    pub fn open(&self, server: &str, config: &ServerConfig) -> Result<Connection, SqlChainError> {
        let fail = |message: String| SqlChainError::ConnectionError {
            message,
            config: config.sanitized(),
        };
        let encoding = sqlite_encoding(&config.charset)
            .ok_or_else(|| fail(format!("unsupported charset '{}'", config.charset)))?;

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(self.target(server, config), flags)
            .map_err(|e| fail(format!("failed to open database for server '{server}': {e}")))?;

        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(|e| fail(format!("failed to set busy timeout: {e}")))?;
        // only takes effect on a database that has no content yet
        conn.pragma_update(None, "encoding", encoding)
            .map_err(|e| fail(format!("failed to set encoding: {e}")))?;
        if !config.is_in_memory() {
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            })
            .map_err(|e| fail(format!("failed to enable WAL: {e}")))?;
        }
        Ok(conn)
    }
}

impl Default for SqliteConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for SqliteConnector {
    fn connect(
        &self,
        server: &str,
        config: &ServerConfig,
        kind: BackendKind,
    ) -> Result<Box<dyn Backend>, SqlChainError> {
        let conn = self.open(server, config)?;
        Ok(match kind {
            BackendKind::Prepared => Box::new(PreparedBackend::new(conn)),
            BackendKind::Simple => Box::new(SimpleBackend::new(conn)),
        })
    }
}

/// Map a client charset name onto a SQLite text encoding.
fn sqlite_encoding(charset: &str) -> Option<&'static str> {
    match charset.to_ascii_lowercase().replace('-', "").as_str() {
        "utf8mb4" | "utf8" | "utf8mb3" => Some("UTF-8"),
        "utf16" => Some("UTF-16"),
        "utf16le" => Some("UTF-16le"),
        "utf16be" => Some("UTF-16be"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charsets() {
        assert_eq!(sqlite_encoding("utf8mb4"), Some("UTF-8"));
        assert_eq!(sqlite_encoding("UTF-8"), Some("UTF-8"));
        assert_eq!(sqlite_encoding("utf-16le"), Some("UTF-16le"));
        assert_eq!(sqlite_encoding("latin1"), None);
    }

    #[test]
    fn unsupported_charset_is_a_connection_error() {
        let connector = SqliteConnector::new();
        let cfg = ServerConfig::builder()
            .charset("latin1")
            .password("pw")
            .finish();
        match connector.open("main", &cfg) {
            Err(SqlChainError::ConnectionError { message, config }) => {
                assert!(message.contains("latin1"));
                assert!(!config.contains("=pw"));
                assert!(config.contains("password=***"));
            }
            other => panic!("expected connection error, got {other:?}"),
        }
    }

    #[test]
    fn memory_targets_are_private_per_connector() {
        let a = SqliteConnector::new();
        let b = SqliteConnector::new();
        let cfg = ServerConfig::default();
        assert_ne!(a.target("main", &cfg), b.target("main", &cfg));
        assert_eq!(a.target("main", &cfg), a.target("main", &cfg));
        assert!(a.target("we ird", &cfg).contains("we_ird"));
    }
}
