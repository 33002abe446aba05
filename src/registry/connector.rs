use super::config::ServerConfig;
use crate::error::SqlChainError;
use crate::results::NativeResult;
use crate::types::{BackendKind, Params, ReturnKind};

/// One open low-level client handle.
///
/// A prepared backend binds `params` and returns typed rows; a simple backend runs
/// parameterless text and returns text rows. Both report change counts and rowids
/// the same way.
pub trait Backend {
    fn kind(&self) -> BackendKind;

    /// Execute one statement and shape the result as `return_kind` asks.
    ///
    /// # Errors
    /// Returns `SqlChainError::StatementError` if the statement can't be prepared,
    /// bound or stepped.
    fn execute(
        &mut self,
        sql: &str,
        params: &Params,
        return_kind: ReturnKind,
    ) -> Result<NativeResult, SqlChainError>;

    /// Execute several `;`-separated statements without parameters or results.
    ///
    /// # Errors
    /// Returns `SqlChainError::StatementError` on the first failing statement.
    fn execute_batch(&mut self, sql: &str) -> Result<(), SqlChainError>;
}

/// Opens backends for registered servers.
pub trait Connector {
    /// # Errors
    /// Returns `SqlChainError::ConnectionError` carrying the sanitized configuration if
    /// the handle can't be opened or configured.
    fn connect(
        &self,
        server: &str,
        config: &ServerConfig,
        kind: BackendKind,
    ) -> Result<Box<dyn Backend>, SqlChainError>;
}
