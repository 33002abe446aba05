//! Read-through cache of single rows keyed by (server, table, key column, id).
//!
//! A row is loaded with one `SELECT * ... WHERE <pk> = ? LIMIT 1` the first time it is
//! asked for and served from memory afterwards, until it is invalidated. A field that
//! the cached row doesn't carry is fetched on demand with a single-column query
//! ([`CachedRow::get_or_fetch`]).

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use crate::database::Database;
use crate::error::SqlChainError;
use crate::query_builder::QueryBuilder;
use crate::results::DbRow;
use crate::types::RowValues;

/// One cached row.
#[derive(Debug, Clone)]
pub struct CachedRow {
    server: Option<String>,
    table: String,
    primary_key: String,
    id: i64,
    row: DbRow,
    fetched: HashMap<String, RowValues>,
}

impl CachedRow {
    fn load(
        db: &Database,
        server: Option<&str>,
        table: &str,
        primary_key: &str,
        id: i64,
    ) -> Result<Self, SqlChainError> {
        let row = scoped(db, server, table)
            .where_eq(primary_key, id)
            .limit(1)
            .row()?;
        Ok(Self {
            server: server.map(str::to_string),
            table: table.to_string(),
            primary_key: primary_key.to_string(),
            id,
            row,
            fetched: HashMap::new(),
        })
    }

    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Whether the row was found when it was loaded.
    #[must_use]
    pub fn exists(&self) -> bool {
        !self.row.is_empty()
    }

    /// A cached field, or `None` if it was neither loaded nor fetched.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&RowValues> {
        self.row.get(field).or_else(|| self.fetched.get(field))
    }

    /// A field, running `SELECT <field> ... LIMIT 1` on a cache miss and remembering the
    /// answer. A missing row yields `RowValues::Null`.
    ///
    /// # Errors
    /// Returns `BuildError` for an invalid field name and the routing and statement
    /// errors of the query.
    pub fn get_or_fetch(&mut self, db: &Database, field: &str) -> Result<RowValues, SqlChainError> {
        if let Some(value) = self.get(field) {
            return Ok(value.clone());
        }
        debug!(table = %self.table, id = self.id, field, "fetching uncached field");
        let value = scoped(db, self.server.as_deref(), &self.table)
            .select([field])
            .where_eq(&self.primary_key, self.id)
            .limit(1)
            .field()?;
        self.fetched.insert(field.to_string(), value.clone());
        Ok(value)
    }

    /// The row as loaded.
    #[must_use]
    pub fn data(&self) -> &DbRow {
        &self.row
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RowKey {
    server: Option<String>,
    table: String,
    primary_key: String,
    id: i64,
}

impl RowKey {
    fn matches(&self, table: &str, id: i64) -> bool {
        self.id == id && self.table == table
    }
}

/// Cache of rows, one entry per (server, table, key column, id). Names are
/// case-insensitive; a lookup without a server is kept apart from one that names the
/// default server explicitly.
#[derive(Debug, Default)]
pub struct RowCache {
    entries: HashMap<RowKey, CachedRow>,
}

impl RowCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached row for (`table`, `id`) on the default server, loading it by
    /// `primary_key` on first use.
    ///
    /// # Errors
    /// Returns the builder, routing and statement errors of the load query.
    pub fn get(
        &mut self,
        db: &Database,
        table: &str,
        primary_key: &str,
        id: i64,
    ) -> Result<&mut CachedRow, SqlChainError> {
        self.get_on(db, None, table, primary_key, id)
    }

    /// Same as [`RowCache::get`] against a named server.
    ///
    /// # Errors
    /// Returns the builder, routing and statement errors of the load query.
    pub fn get_on(
        &mut self,
        db: &Database,
        server: Option<&str>,
        table: &str,
        primary_key: &str,
        id: i64,
    ) -> Result<&mut CachedRow, SqlChainError> {
        let key = RowKey {
            server: server.map(str::to_lowercase),
            table: table.to_lowercase(),
            primary_key: primary_key.to_lowercase(),
            id,
        };
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                debug!(table = %entry.key().table, id, "row cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                debug!(table = %entry.key().table, id, "row cache miss");
                let row = CachedRow::load(db, server, &entry.key().table, primary_key, id)?;
                Ok(entry.insert(row))
            }
        }
    }

    /// Whether any row of `table` with this id is currently cached.
    #[must_use]
    pub fn contains(&self, table: &str, id: i64) -> bool {
        let table = table.to_lowercase();
        self.entries.keys().any(|key| key.matches(&table, id))
    }

    /// Drop every cached copy of (`table`, `id`) so the next `get` reloads it.
    pub fn invalidate(&mut self, table: &str, id: i64) -> bool {
        let table = table.to_lowercase();
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.matches(&table, id));
        self.entries.len() != before
    }

    /// Whether a row with this id exists in the database, bypassing the cache.
    ///
    /// # Errors
    /// Returns the builder, routing and statement errors of the query.
    pub fn exists(
        db: &Database,
        table: &str,
        primary_key: &str,
        id: i64,
    ) -> Result<bool, SqlChainError> {
        db.table(table).where_eq(primary_key, id).exists()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn scoped<'db>(db: &'db Database, server: Option<&str>, table: &str) -> QueryBuilder<'db> {
    match server {
        Some(server) => db.table(table).on(server),
        None => db.table(table),
    }
}
