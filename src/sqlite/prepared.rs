use rusqlite::Connection;

use super::params::bind_params;
use super::query::{RowFormat, shape_result};
use crate::error::{SqlChainError, StatementContext};
use crate::registry::Backend;
use crate::results::NativeResult;
use crate::types::{BackendKind, Params, ReturnKind};

/// Prepared-statement backend: binds typed parameters and returns typed rows.
///
/// Statements go through rusqlite's statement cache, so repeating a statement skips
/// the prepare step.
#[derive(Debug)]
pub struct PreparedBackend {
    conn: Connection,
}

impl PreparedBackend {
    #[must_use]
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl Backend for PreparedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Prepared
    }

    fn execute(
        &mut self,
        sql: &str,
        params: &Params,
        return_kind: ReturnKind,
    ) -> Result<NativeResult, SqlChainError> {
        let mut stmt = self.conn.prepare_cached(sql).with_sql(sql)?;
        bind_params(&mut stmt, params, sql)?;
        shape_result(&self.conn, &mut stmt, sql, return_kind, RowFormat::Typed)
    }

    fn execute_batch(&mut self, sql: &str) -> Result<(), SqlChainError> {
        self.conn.execute_batch(sql).with_sql(sql)
    }
}
