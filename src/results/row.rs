use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::types::RowValues;

/// A row from a normalized query result
///
/// Column names and the name-to-index cache are shared by every row of one result, so a
/// row is a column list plus its values in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct DbRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub values: Vec<RowValues>,
    // Internal cache for faster column lookups (to avoid repeated string comparisons)
    #[doc(hidden)]
    pub(crate) column_index_cache: Arc<HashMap<String, usize>>,
}

impl DbRow {
    /// Create a new database row
    ///
    /// # Arguments
    ///
    /// * `column_names` - The column names
    /// * `values` - The values for this row, in column order
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValues>) -> Self {
        let cache = Arc::new(index_columns(&column_names));
        Self {
            column_names,
            values,
            column_index_cache: cache,
        }
    }

    pub(crate) fn with_cache(
        column_names: Arc<Vec<String>>,
        values: Vec<RowValues>,
        column_index_cache: Arc<HashMap<String, usize>>,
    ) -> Self {
        Self {
            column_names,
            values,
            column_index_cache,
        }
    }

    /// A row with no columns; what `Collection::row` returns for an empty result.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Arc::new(Vec::new()), Vec::new())
    }

    /// Build a single row from `(column, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RowValues>,
    {
        let (names, values): (Vec<String>, Vec<RowValues>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self::new(Arc::new(names), values)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_index_cache.get(column_name) {
            return Some(idx);
        }

        // Fall back to linear search
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value from the row by column name, or `None` if the column wasn't found
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Whether `column_name` is missing or NULL.
    #[must_use]
    pub fn is_null(&self, column_name: &str) -> bool {
        self.get(column_name).is_none_or(RowValues::is_null)
    }

    /// Integer value of a column. Text cells from the simple backend are parsed, so a
    /// column reads the same whichever backend ran the statement.
    #[must_use]
    pub fn get_int(&self, column_name: &str) -> Option<i64> {
        self.get(column_name).and_then(RowValues::as_int)
    }

    #[must_use]
    pub fn get_float(&self, column_name: &str) -> Option<f64> {
        self.get(column_name).and_then(RowValues::as_float)
    }

    #[must_use]
    pub fn get_bool(&self, column_name: &str) -> Option<bool> {
        self.get(column_name).and_then(RowValues::as_bool)
    }

    #[must_use]
    pub fn get_text(&self, column_name: &str) -> Option<&str> {
        self.get(column_name).and_then(RowValues::as_text)
    }

    #[must_use]
    pub fn get_timestamp(&self, column_name: &str) -> Option<NaiveDateTime> {
        self.get(column_name).and_then(RowValues::as_timestamp)
    }

    #[must_use]
    pub fn get_blob(&self, column_name: &str) -> Option<&[u8]> {
        self.get(column_name).and_then(RowValues::as_blob)
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    /// Name of the first column, which drives `Collection::col`.
    #[must_use]
    pub fn first_column(&self) -> Option<&str> {
        self.column_names.first().map(String::as_str)
    }

    /// Iterate `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.column_names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for DbRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

pub(crate) fn index_columns(column_names: &[String]) -> HashMap<String, usize> {
    let mut cache = HashMap::with_capacity(column_names.len());
    for (i, name) in column_names.iter().enumerate() {
        // first occurrence wins for duplicate column names
        cache.entry(name.clone()).or_insert(i);
    }
    cache
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_read_text_cells() {
        let row = DbRow::from_pairs([
            ("id", RowValues::Text("12".into())),
            ("score", RowValues::Text("8.25".into())),
            ("active", RowValues::Int(1)),
            ("seen_at", RowValues::Text("2024-05-06 07:08:09".into())),
            ("note", RowValues::Null),
        ]);
        assert_eq!(row.get_int("id"), Some(12));
        assert_eq!(row.get_float("score"), Some(8.25));
        assert_eq!(row.get_bool("active"), Some(true));
        assert_eq!(row.get_text("id"), Some("12"));
        assert!(row.get_timestamp("seen_at").is_some());
        assert_eq!(row.get_blob("id"), Some(&b"12"[..]));
        assert!(row.is_null("note"));
        assert!(row.is_null("missing"));
        assert!(!row.is_null("id"));
        assert_eq!(row.get_int("note"), None);
    }
}
