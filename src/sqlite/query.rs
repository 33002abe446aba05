use std::sync::Arc;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, Statement};

use crate::error::{SqlChainError, StatementContext};
use crate::results::{NativeResult, ResultSet, SimpleResultSet};
use crate::types::{ReturnKind, RowValues};

/// How rows of a SELECT are materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFormat {
    /// Values keep their storage class.
    Typed,
    /// Every cell is rendered as text, NULL stays NULL.
    Text,
}

/// Extract a `RowValues` from a `SQLite` row.
#[must_use]
pub fn sqlite_extract_value(value: ValueRef<'_>) -> RowValues {
    match value {
        ValueRef::Null => RowValues::Null,
        ValueRef::Integer(i) => RowValues::Int(i),
        ValueRef::Real(f) => RowValues::Float(f),
        ValueRef::Text(bytes) => RowValues::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => RowValues::Blob(bytes.to_vec()),
    }
}

/// Render a cell the way a text-protocol client receives it.
#[must_use]
pub fn sqlite_extract_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(format!("{f:?}")),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

fn column_names(stmt: &Statement<'_>) -> Vec<String> {
    stmt.column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect()
}

/// Build a typed result set from an already bound statement.
///
/// # Errors
/// Returns `SqlChainError::StatementError` if stepping fails.
pub fn build_result_set(stmt: &mut Statement<'_>, sql: &str) -> Result<ResultSet, SqlChainError> {
    let names = column_names(stmt);
    let col_count = names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(names));

    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next().with_sql(sql)? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value(row.get_ref(i).with_sql(sql)?));
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Build a text result set from an already bound statement.
///
/// # Errors
/// Returns `SqlChainError::StatementError` if stepping fails.
pub fn build_text_result_set(
    stmt: &mut Statement<'_>,
    sql: &str,
) -> Result<SimpleResultSet, SqlChainError> {
    let names = column_names(stmt);
    let col_count = names.len();
    let mut result_set = SimpleResultSet::new(names);

    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next().with_sql(sql)? {
        let mut cells = Vec::with_capacity(col_count);
        for i in 0..col_count {
            cells.push(sqlite_extract_text(row.get_ref(i).with_sql(sql)?));
        }
        result_set.push_row(cells);
    }

    Ok(result_set)
}

/// Step a bound statement to completion and shape its outcome as `return_kind` asks.
///
/// # Errors
/// Returns `SqlChainError::StatementError` if stepping fails.
pub fn shape_result(
    conn: &Connection,
    stmt: &mut Statement<'_>,
    sql: &str,
    return_kind: ReturnKind,
    format: RowFormat,
) -> Result<NativeResult, SqlChainError> {
    match return_kind {
        ReturnKind::All => Ok(match format {
            RowFormat::Typed => NativeResult::Prepared(build_result_set(stmt, sql)?),
            RowFormat::Text => NativeResult::Simple(build_text_result_set(stmt, sql)?),
        }),
        ReturnKind::Count => {
            let has_columns = stmt.column_count() > 0;
            let mut rows = stmt.raw_query();
            let first = match rows.next().with_sql(sql)? {
                Some(row) if has_columns => {
                    sqlite_extract_value(row.get_ref(0).with_sql(sql)?)
                }
                _ => RowValues::Null,
            };
            // finish stepping so the statement is reset cleanly
            while rows.next().with_sql(sql)?.is_some() {}
            Ok(NativeResult::Count(first.to_i64_lossy()))
        }
        ReturnKind::RowCount => {
            // changes() keeps the last DML count across DDL, so only trust it when the
            // connection's running total moved
            let before = conn.total_changes();
            drain(stmt, sql)?;
            let changed = if conn.total_changes() == before {
                0
            } else {
                u64::try_from(conn.changes()).unwrap_or(u64::MAX)
            };
            Ok(NativeResult::RowCount(changed))
        }
        ReturnKind::LastInsertId => {
            drain(stmt, sql)?;
            Ok(NativeResult::LastInsertId(conn.last_insert_rowid()))
        }
    }
}

fn drain(stmt: &mut Statement<'_>, sql: &str) -> Result<(), SqlChainError> {
    let mut rows = stmt.raw_query();
    while rows.next().with_sql(sql)?.is_some() {}
    Ok(())
}
