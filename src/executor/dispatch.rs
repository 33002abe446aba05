use tracing::debug;

use crate::error::SqlChainError;
use crate::registry::{Backend, ConnectionRegistry};
use crate::results::NativeResult;
use crate::types::{BackendKind, Params, ReturnKind};

use super::infer::infer_return_kind;

/// Backend a statement is routed to: prepared when it carries parameters, simple
/// otherwise.
#[must_use]
pub fn select_backend(params: &Params) -> BackendKind {
    if params.is_empty() {
        BackendKind::Simple
    } else {
        BackendKind::Prepared
    }
}

/// Route one statement to `server` (or the default server).
///
/// The backend is chosen by [`select_backend`]; when `return_kind` is `None` it is
/// inferred from the statement's leading keyword.
///
/// # Errors
/// Returns `ConfigError` for an unknown server, `ConnectionError` if a handle can't be
/// opened, and `StatementError` if the backend rejects the statement. Nothing is
/// retried.
pub fn execute(
    registry: &mut ConnectionRegistry,
    server: Option<&str>,
    sql: &str,
    params: &Params,
    return_kind: Option<ReturnKind>,
) -> Result<NativeResult, SqlChainError> {
    let kind = select_backend(params);
    let name = registry.server_name(server)?;
    let backend = registry.resolve(Some(&name), kind)?;
    debug!(server = %name, "routing statement");
    execute_on(backend, sql, params, return_kind)
}

/// Run one statement on a specific handle.
///
/// # Errors
/// Returns whatever the backend reports, typically `StatementError`.
pub fn execute_on(
    backend: &mut dyn Backend,
    sql: &str,
    params: &Params,
    return_kind: Option<ReturnKind>,
) -> Result<NativeResult, SqlChainError> {
    let return_kind = return_kind.unwrap_or_else(|| infer_return_kind(sql));
    debug!(
        backend = backend.kind().as_str(),
        ?return_kind,
        params = params.len(),
        sql,
        "executing statement"
    );
    backend.execute(sql, params, return_kind)
}

/// Run `;`-separated statements without parameters on the simple backend.
///
/// # Errors
/// Same as [`execute`].
pub fn execute_batch(
    registry: &mut ConnectionRegistry,
    server: Option<&str>,
    sql: &str,
) -> Result<(), SqlChainError> {
    let backend = registry.resolve(server, BackendKind::Simple)?;
    debug!(backend = backend.kind().as_str(), sql, "executing batch");
    backend.execute_batch(sql)
}
