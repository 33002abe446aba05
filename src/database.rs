use std::cell::RefCell;
use std::fmt;

use crate::error::SqlChainError;
use crate::executor;
use crate::query::{QueryAndParams, RawQuery};
use crate::query_builder::{Filter, QueryBuilder};
use crate::registry::{Connector, ConnectionRegistry, ServerConfig};
use crate::results::{Collection, NativeResult};
use crate::types::{Params, ReturnKind, RowValues};

/// Entry point: owns the connection registry and hands out builders.
///
/// Calls are synchronous and the registry sits in a `RefCell`, so a `Database` is
/// meant for one thread; builders borrow it and can be created freely.
///
/// ```rust
/// use sql_chain::prelude::*;
///
/// let db = Database::new();
/// db.configure("main", ServerConfig::default())?;
/// db.execute_batch(None, "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INT)")?;
///
/// db.create("users", [("name", RowValues::from("ann")), ("age", RowValues::Int(31))])?;
/// db.create("users", [("name", RowValues::from("bob")), ("age", RowValues::Int(17))])?;
///
/// let adults = db.table("users").where_cmp("age", ">=", 18).col()?;
/// assert_eq!(adults, vec![RowValues::Int(1)]);
///
/// let changed = db.update("users", [("age", 18)]).where_eq("name", "bob").update()?;
/// assert_eq!(changed, 1);
/// assert_eq!(db.table("users").count()?, 2);
/// # db.shutdown();
/// # Ok::<(), SqlChainError>(())
/// ```
pub struct Database {
    registry: RefCell<ConnectionRegistry>,
    last_sql: RefCell<Option<String>>,
}

impl Database {
    /// A database with no servers, backed by the bundled SQLite engine.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(ConnectionRegistry::new())
    }

    #[must_use]
    pub fn with_registry(registry: ConnectionRegistry) -> Self {
        Self {
            registry: RefCell::new(registry),
            last_sql: RefCell::new(None),
        }
    }

    /// A database whose handles are opened by `connector`.
    pub fn with_connector(connector: impl Connector + 'static) -> Self {
        Self::with_registry(ConnectionRegistry::with_connector(connector))
    }

    /// Register a server.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConfigError` if the server is already registered.
    pub fn configure(&self, server: &str, config: ServerConfig) -> Result<(), SqlChainError> {
        self.registry.borrow_mut().register(server, config)
    }

    /// # Errors
    /// Returns `SqlChainError::ConfigError` if the server isn't registered.
    pub fn set_default_server(&self, server: &str) -> Result<(), SqlChainError> {
        self.registry.borrow_mut().set_default_server(server)
    }

    #[must_use]
    pub fn is_configured(&self, server: &str) -> bool {
        self.registry.borrow().is_registered(server)
    }

    /// Start a builder on `table`.
    #[must_use]
    pub fn table(&self, table: &str) -> QueryBuilder<'_> {
        QueryBuilder::new(self, table)
    }

    /// Start a hand-written statement.
    pub fn query(&self, sql: impl Into<String>, params: impl Into<Params>) -> RawQuery<'_> {
        RawQuery::new(self, QueryAndParams::with_params(sql, params.into()))
    }

    /// A builder on `table` with `data` as its SET list; add conditions and finish with
    /// [`QueryBuilder::update`].
    pub fn update<I, K, V>(&self, table: &str, data: I) -> QueryBuilder<'_>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RowValues>,
    {
        data.into_iter()
            .fold(self.table(table), |q, (column, value)| q.set(column.as_ref(), value))
    }

    /// Insert one row and return its rowid.
    ///
    /// # Errors
    /// See [`QueryBuilder::create`].
    pub fn create<I, K, V>(&self, table: &str, data: I) -> Result<i64, SqlChainError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RowValues>,
    {
        self.table(table).create(data)
    }

    /// `REPLACE INTO` one row and return the number of rows written.
    ///
    /// # Errors
    /// See [`QueryBuilder::replace`].
    pub fn replace<I, K, V>(&self, table: &str, data: I) -> Result<u64, SqlChainError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RowValues>,
    {
        self.table(table).replace(data)
    }

    /// Delete rows matching every condition; no conditions deletes every row.
    ///
    /// Conditions are `(column, value)` equalities or `(column, operator, value)`
    /// comparisons:
    ///
    /// ```rust
    /// # use sql_chain::prelude::*;
    /// # let db = Database::new();
    /// # db.configure("main", ServerConfig::default())?;
    /// # db.execute_batch(None, "CREATE TABLE users (id INTEGER PRIMARY KEY, status TEXT)")?;
    /// db.delete("users", [("status", "!=", "active")])?;
    /// db.delete("users", [Filter::eq("id", 1), Filter::cmp("status", "=", "gone")])?;
    /// # Ok::<(), SqlChainError>(())
    /// ```
    ///
    /// # Errors
    /// See [`QueryBuilder::delete`].
    pub fn delete<I, F>(&self, table: &str, conditions: I) -> Result<u64, SqlChainError>
    where
        I: IntoIterator<Item = F>,
        F: Into<Filter>,
    {
        conditions
            .into_iter()
            .fold(self.table(table), |q, filter| q.where_filter(filter))
            .delete()
    }

    /// Route a statement and normalize its result.
    ///
    /// # Errors
    /// See [`executor::execute`].
    pub fn execute(
        &self,
        server: Option<&str>,
        sql: &str,
        params: impl Into<Params>,
        return_kind: Option<ReturnKind>,
    ) -> Result<Collection, SqlChainError> {
        let statement = QueryAndParams::with_params(sql, params.into());
        self.run(server, &statement, return_kind)
            .map(Collection::from)
    }

    /// Run `;`-separated statements without parameters.
    ///
    /// # Errors
    /// See [`executor::execute_batch`].
    pub fn execute_batch(&self, server: Option<&str>, sql: &str) -> Result<(), SqlChainError> {
        self.record(sql);
        executor::execute_batch(&mut self.registry.borrow_mut(), server, sql)
    }

    /// Text of the last statement this database routed.
    #[must_use]
    pub fn last_sql(&self) -> Option<String> {
        self.last_sql.borrow().clone()
    }

    /// Number of open handles.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.registry.borrow().connection_count()
    }

    /// Close every open handle; servers stay configured.
    pub fn shutdown(&self) {
        self.registry.borrow_mut().shutdown();
    }

    pub(crate) fn run(
        &self,
        server: Option<&str>,
        statement: &QueryAndParams,
        return_kind: Option<ReturnKind>,
    ) -> Result<NativeResult, SqlChainError> {
        self.record(&statement.query);
        executor::execute(
            &mut self.registry.borrow_mut(),
            server,
            &statement.query,
            &statement.params,
            return_kind,
        )
    }

    fn record(&self, sql: &str) {
        *self.last_sql.borrow_mut() = Some(sql.to_string());
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("registry", &self.registry)
            .field("last_sql", &self.last_sql)
            .finish()
    }
}
