use std::collections::HashMap;
use std::sync::Arc;

use super::row::{DbRow, index_columns};
use crate::types::RowValues;

/// Typed rowset produced by the prepared-statement backend.
///
/// Values keep the storage class the engine reported (integer, real, text, blob, null).
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<DbRow>,
    /// Column names shared by all rows (to avoid duplicating in each row)
    column_names: Option<Arc<Vec<String>>>,
    column_index_cache: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    /// Create a new result set with a known capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            column_names: None,
            column_index_cache: None,
        }
    }

    /// Set the column names for this result set (to be shared by all rows)
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index_cache = Some(Arc::new(index_columns(&column_names)));
        self.column_names = Some(column_names);
    }

    /// Add a row to the result set. Rows added before the column names are set are ignored.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        if let (Some(column_names), Some(cache)) = (&self.column_names, &self.column_index_cache) {
            self.results.push(DbRow::with_cache(
                Arc::clone(column_names),
                row_values,
                Arc::clone(cache),
            ));
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Text rowset produced by the simple-query backend.
///
/// Like a text-protocol client, every cell arrives as text or NULL; no type information
/// survives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleResultSet {
    pub fields: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl SimpleResultSet {
    #[must_use]
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        self.rows.push(row);
    }

    /// Convert into normalized rows; text cells become `RowValues::Text`, NULL stays NULL.
    #[must_use]
    pub fn into_rows(self) -> Vec<DbRow> {
        let column_names = Arc::new(self.fields);
        let cache = Arc::new(index_columns(&column_names));
        self.rows
            .into_iter()
            .map(|cells| {
                let values = cells
                    .into_iter()
                    .map(|cell| cell.map_or(RowValues::Null, RowValues::Text))
                    .collect();
                DbRow::with_cache(Arc::clone(&column_names), values, Arc::clone(&cache))
            })
            .collect()
    }
}
