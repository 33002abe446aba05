//! Table-bound models.
//!
//! A [`Model`] names a table, its key column, the columns open to mass assignment and
//! optionally the server it lives on. Its default methods start builders already
//! scoped to that table and server.
//!
//! ```rust
//! use sql_chain::prelude::*;
//!
//! struct User;
//!
//! impl Model for User {
//!     const TABLE: &'static str = "users";
//!     const FILLABLE: &'static [&'static str] = &["name", "age"];
//! }
//!
//! let db = Database::new();
//! db.configure("main", ServerConfig::default())?;
//! db.execute_batch(
//!     None,
//!     "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INT, role TEXT DEFAULT 'member')",
//! )?;
//!
//! // `role` isn't fillable and is dropped
//! let id = User::create(
//!     &db,
//!     [("name", RowValues::from("ann")), ("age", RowValues::Int(31)), ("role", "admin".into())],
//! )?;
//! let user = User::find(&db, id)?;
//! assert_eq!(user.get_text("role"), Some("member"));
//!
//! User::update(&db, [("age", 32)]).where_eq("id", id).update()?;
//! assert_eq!(User::where_cmp(&db, "age", ">", 30).count()?, 1);
//! assert_eq!(User::remove(&db, [("age", "<", 40)])?, 1);
//! # db.shutdown();
//! # Ok::<(), SqlChainError>(())
//! ```

use crate::cache::{CachedRow, RowCache};
use crate::database::Database;
use crate::error::SqlChainError;
use crate::query_builder::{Filter, QueryBuilder};
use crate::results::DbRow;
use crate::types::RowValues;

pub trait Model {
    const TABLE: &'static str;
    const PRIMARY_KEY: &'static str = "id";
    /// Columns `create` and `replace` keep; empty keeps every column.
    const FILLABLE: &'static [&'static str] = &[];
    /// Server the table lives on; `None` uses the database's default server.
    const SERVER: Option<&'static str> = None;

    /// A builder on this model's table and server.
    #[must_use]
    fn query(db: &Database) -> QueryBuilder<'_> {
        let query = db.table(Self::TABLE);
        match Self::SERVER {
            Some(server) => query.on(server),
            None => query,
        }
    }

    /// # Errors
    /// See [`QueryBuilder::get`].
    fn all(db: &Database) -> Result<Vec<DbRow>, SqlChainError> {
        Self::query(db).fetch()
    }

    /// Row with this primary key, or an empty row.
    ///
    /// # Errors
    /// See [`QueryBuilder::get`].
    fn find(db: &Database, id: i64) -> Result<DbRow, SqlChainError> {
        Self::query(db)
            .where_eq(Self::PRIMARY_KEY, id)
            .limit(1)
            .row()
    }

    #[must_use]
    fn select<I, S>(db: &Database, columns: I) -> QueryBuilder<'_>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::query(db).select(columns)
    }

    #[must_use]
    fn where_eq<'a, V: Into<RowValues>>(db: &'a Database, column: &str, value: V) -> QueryBuilder<'a> {
        Self::query(db).where_eq(column, value)
    }

    #[must_use]
    fn where_cmp<'a, V: Into<RowValues>>(
        db: &'a Database,
        column: &str,
        operator: &str,
        value: V,
    ) -> QueryBuilder<'a> {
        Self::query(db).where_cmp(column, operator, value)
    }

    /// Delete rows matching every condition, each a `(column, value)` equality or a
    /// `(column, operator, value)` comparison. No conditions deletes every row.
    ///
    /// # Errors
    /// See [`QueryBuilder::delete`].
    fn remove<I, F>(db: &Database, conditions: I) -> Result<u64, SqlChainError>
    where
        I: IntoIterator<Item = F>,
        F: Into<Filter>,
    {
        conditions
            .into_iter()
            .fold(Self::query(db), |q, filter| q.where_filter(filter))
            .delete()
    }

    /// Insert the fillable part of `data` and return the new rowid.
    ///
    /// # Errors
    /// See [`QueryBuilder::create`].
    fn create<I, K, V>(db: &Database, data: I) -> Result<i64, SqlChainError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RowValues>,
    {
        Self::query(db)
            .fillable(Self::FILLABLE.iter().copied())
            .create(data)
    }

    /// `REPLACE INTO` the fillable part of `data`.
    ///
    /// # Errors
    /// See [`QueryBuilder::replace`].
    fn replace<I, K, V>(db: &Database, data: I) -> Result<u64, SqlChainError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RowValues>,
    {
        Self::query(db)
            .fillable(Self::FILLABLE.iter().copied())
            .replace(data)
    }

    /// A builder with `data` as its SET list; add conditions and finish with
    /// [`QueryBuilder::update`].
    #[must_use]
    fn update<I, K, V>(db: &Database, data: I) -> QueryBuilder<'_>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RowValues>,
    {
        data.into_iter()
            .fold(Self::query(db), |q, (column, value)| q.set(column.as_ref(), value))
    }

    /// The row with this primary key from `cache`, loading it on first use.
    ///
    /// # Errors
    /// See [`RowCache::get`].
    fn cached<'c>(
        db: &Database,
        cache: &'c mut RowCache,
        id: i64,
    ) -> Result<&'c mut CachedRow, SqlChainError> {
        cache.get_on(db, Self::SERVER, Self::TABLE, Self::PRIMARY_KEY, id)
    }
}
