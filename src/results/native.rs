use super::result_set::{ResultSet, SimpleResultSet};
use crate::types::RowValues;

/// A backend's payload before normalization.
#[derive(Debug, Clone)]
pub enum NativeResult {
    /// Typed rows from the prepared-statement backend.
    Prepared(ResultSet),
    /// Text rows from the simple-query backend.
    Simple(SimpleResultSet),
    /// Rows changed by the statement.
    RowCount(u64),
    /// Rowid of the last inserted row.
    LastInsertId(i64),
    /// `COUNT(*)`-style scalar.
    Count(i64),
    /// Any other bare scalar.
    Scalar(RowValues),
}

impl NativeResult {
    /// Synthetic column name a scalar payload is wrapped under.
    #[must_use]
    pub fn scalar_column(&self) -> Option<&'static str> {
        match self {
            NativeResult::Prepared(_) | NativeResult::Simple(_) => None,
            NativeResult::RowCount(_) => Some("row_count"),
            NativeResult::LastInsertId(_) => Some("last_insert_id"),
            NativeResult::Count(_) => Some("count"),
            NativeResult::Scalar(_) => Some("data"),
        }
    }
}
