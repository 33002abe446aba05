use serde::Serialize;

use super::native::NativeResult;
use super::row::DbRow;
use crate::types::RowValues;

/// Backend-agnostic access to a statement's result.
///
/// Whatever the backend returned (typed rows, text rows or a bare scalar) is normalized
/// into a list of rows. None of the accessors fail; missing data degrades to an empty
/// row, `RowValues::Null` or an empty list.
///
/// ```rust
/// use sql_chain::prelude::*;
///
/// let users = Collection::from_rows(vec![
///     DbRow::from_pairs([("id", RowValues::Int(1)), ("name", "a".into())]),
///     DbRow::from_pairs([("id", RowValues::Int(2)), ("name", "b".into())]),
/// ]);
/// assert_eq!(users.col(), vec![RowValues::Int(1), RowValues::Int(2)]);
/// assert_eq!(users.count(true), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection {
    rows: Vec<DbRow>,
}

impl Collection {
    #[must_use]
    pub fn from_rows(rows: Vec<DbRow>) -> Self {
        Self { rows }
    }

    /// Wrap a single row as a one-row collection.
    #[must_use]
    pub fn from_row(row: DbRow) -> Self {
        Self { rows: vec![row] }
    }

    /// Wrap a bare scalar as one row with one column named `column`.
    #[must_use]
    pub fn from_scalar(column: &str, value: RowValues) -> Self {
        Self::from_row(DbRow::from_pairs([(column, value)]))
    }

    /// First row, or an empty row.
    #[must_use]
    pub fn row(&self) -> DbRow {
        self.first().cloned().unwrap_or_else(DbRow::empty)
    }

    /// First column of the first row, or `RowValues::Null`.
    #[must_use]
    pub fn field(&self) -> RowValues {
        self.first()
            .and_then(|row| row.get_by_index(0))
            .cloned()
            .unwrap_or(RowValues::Null)
    }

    /// Values of the first row's first column, across all rows.
    ///
    /// The column is chosen by name from the first row; rows lacking that column are
    /// skipped.
    #[must_use]
    pub fn col(&self) -> Vec<RowValues> {
        let Some(column) = self.first().and_then(DbRow::first_column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.get(column).cloned())
            .collect()
    }

    #[must_use]
    pub fn first(&self) -> Option<&DbRow> {
        self.rows.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&DbRow> {
        self.rows.last()
    }

    /// With `count_rows`, the number of rows; otherwise the first field coerced to an
    /// integer (for `COUNT(*)`-style results).
    #[must_use]
    pub fn count(&self, count_rows: bool) -> i64 {
        if count_rows {
            i64::try_from(self.rows.len()).unwrap_or(i64::MAX)
        } else {
            self.field().to_i64_lossy()
        }
    }

    #[must_use]
    pub fn fetch(&self) -> &[DbRow] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<DbRow> {
        self.rows
    }

    /// Values of `column` for every row, `RowValues::Null` where a row lacks it.
    #[must_use]
    pub fn pluck(&self, column: &str) -> Vec<RowValues> {
        self.rows
            .iter()
            .map(|row| row.get(column).cloned().unwrap_or(RowValues::Null))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl From<NativeResult> for Collection {
    fn from(native: NativeResult) -> Self {
        let column = native.scalar_column();
        match native {
            NativeResult::Prepared(set) => Collection::from_rows(set.results),
            NativeResult::Simple(set) => Collection::from_rows(set.into_rows()),
            NativeResult::RowCount(n) => Collection::from_scalar(
                column.unwrap_or("data"),
                RowValues::Int(i64::try_from(n).unwrap_or(i64::MAX)),
            ),
            NativeResult::LastInsertId(id) | NativeResult::Count(id) => {
                Collection::from_scalar(column.unwrap_or("data"), RowValues::Int(id))
            }
            NativeResult::Scalar(value) => {
                Collection::from_scalar(column.unwrap_or("data"), value)
            }
        }
    }
}

impl From<DbRow> for Collection {
    fn from(row: DbRow) -> Self {
        Collection::from_row(row)
    }
}

impl From<Vec<DbRow>> for Collection {
    fn from(rows: Vec<DbRow>) -> Self {
        Collection::from_rows(rows)
    }
}

impl IntoIterator for Collection {
    type Item = DbRow;
    type IntoIter = std::vec::IntoIter<DbRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
