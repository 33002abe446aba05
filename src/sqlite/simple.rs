use rusqlite::Connection;

use super::query::{RowFormat, shape_result};
use crate::error::{SqlChainError, StatementContext};
use crate::placeholders::count_placeholders;
use crate::registry::Backend;
use crate::results::NativeResult;
use crate::types::{BackendKind, Params, ReturnKind};

/// Simple-query backend: runs parameterless statement text and returns text rows.
#[derive(Debug)]
pub struct SimpleBackend {
    conn: Connection,
}

impl SimpleBackend {
    #[must_use]
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl Backend for SimpleBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Simple
    }

    fn execute(
        &mut self,
        sql: &str,
        params: &Params,
        return_kind: ReturnKind,
    ) -> Result<NativeResult, SqlChainError> {
        if !params.is_empty() {
            return Err(SqlChainError::statement(
                sql,
                "the simple-query backend does not bind parameters",
            ));
        }
        let placeholders = count_placeholders(sql);
        if placeholders > 0 {
            return Err(SqlChainError::statement(
                sql,
                format!("statement has {placeholders} placeholder(s) but no parameters were given"),
            ));
        }
        let mut stmt = self.conn.prepare(sql).with_sql(sql)?;
        shape_result(&self.conn, &mut stmt, sql, return_kind, RowFormat::Text)
    }

    fn execute_batch(&mut self, sql: &str) -> Result<(), SqlChainError> {
        self.conn.execute_batch(sql).with_sql(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_rejected_before_preparing() {
        let Ok(conn) = Connection::open_in_memory() else {
            panic!("open in-memory database");
        };
        let mut backend = SimpleBackend::new(conn);
        // the table doesn't exist, so only the placeholder check can produce this error
        match backend.execute("SELECT * FROM missing WHERE id = :id", &Params::none(), ReturnKind::All) {
            Err(SqlChainError::StatementError { message, .. }) => {
                assert!(message.contains("1 placeholder(s)"), "{message}");
            }
            other => panic!("expected statement error, got {other:?}"),
        }
        let ok = backend.execute("SELECT '?' AS q", &Params::none(), ReturnKind::All);
        assert!(ok.is_ok());
    }
}
