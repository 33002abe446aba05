use crate::database::Database;
use crate::error::SqlChainError;
use crate::placeholders::interpolate;
use crate::results::{Collection, DbRow};
use crate::types::{Params, ReturnKind, RowValues};

/// A SQL statement together with its bound parameters
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAndParams {
    /// The SQL query string
    pub query: String,
    /// The parameters to be bound to the query
    pub params: Params,
}

impl QueryAndParams {
    /// Create a new `QueryAndParams` with positional parameters
    ///
    /// # Arguments
    ///
    /// * `query` - The SQL query string
    /// * `params` - The values for the `?` placeholders, in order
    pub fn new(query: impl Into<String>, params: Vec<RowValues>) -> Self {
        Self {
            query: query.into(),
            params: Params::Positional(params),
        }
    }

    /// Create a new `QueryAndParams` with positional or named parameters
    pub fn with_params(query: impl Into<String>, params: Params) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }

    /// Create a new `QueryAndParams` with no parameters
    pub fn new_without_params(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: Params::none(),
        }
    }

    /// The statement with its parameters substituted as SQL literals, for display only.
    #[must_use]
    pub fn interpolated(&self) -> String {
        interpolate(&self.query, &self.params)
    }
}

/// A hand-written statement routed through the same backends and normalizer as the
/// builder.
///
/// ```rust
/// use sql_chain::prelude::*;
///
/// let db = Database::new();
/// db.configure("main", ServerConfig::default())?;
/// db.query("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)", Params::none())
///     .execute()?;
/// let id = db
///     .query("INSERT INTO t (name) VALUES (:name)", Params::named([("name", "a")]))
///     .last_insert_id()?;
/// let name = db
///     .query("SELECT name FROM t WHERE id = ?", vec![RowValues::Int(id)])
///     .field()?;
/// assert_eq!(name, RowValues::Text("a".into()));
/// # db.shutdown();
/// # Ok::<(), SqlChainError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RawQuery<'db> {
    db: &'db Database,
    server: Option<String>,
    statement: QueryAndParams,
}

impl<'db> RawQuery<'db> {
    pub(crate) fn new(db: &'db Database, statement: QueryAndParams) -> Self {
        Self {
            db,
            server: None,
            statement,
        }
    }

    /// Run against the named server instead of the default one.
    #[must_use]
    pub fn on(mut self, server: &str) -> Self {
        self.server = Some(server.to_string());
        self
    }

    #[must_use]
    pub fn statement(&self) -> &QueryAndParams {
        &self.statement
    }

    /// The statement text, optionally with parameters substituted for display.
    #[must_use]
    pub fn raw_sql(&self, interpolated: bool) -> String {
        if interpolated {
            self.statement.interpolated()
        } else {
            self.statement.query.clone()
        }
    }

    fn run(self, kind: Option<ReturnKind>) -> Result<Collection, SqlChainError> {
        self.db
            .run(self.server.as_deref(), &self.statement, kind)
            .map(Collection::from)
    }

    /// Execute with the return kind inferred from the leading keyword: rows for
    /// SELECT-like statements, the new rowid for INSERT, the change count for
    /// UPDATE/DELETE/DDL.
    ///
    /// # Errors
    /// Returns `ConfigError`/`ConnectionError` when the server can't be resolved or
    /// reached and `StatementError` when the backend rejects the statement.
    pub fn execute(self) -> Result<Collection, SqlChainError> {
        self.run(None)
    }

    /// # Errors
    /// Same as [`RawQuery::execute`].
    pub fn fetch(self) -> Result<Vec<DbRow>, SqlChainError> {
        self.run(Some(ReturnKind::All)).map(Collection::into_rows)
    }

    /// # Errors
    /// Same as [`RawQuery::execute`].
    pub fn row(self) -> Result<DbRow, SqlChainError> {
        self.run(Some(ReturnKind::All)).map(|c| c.row())
    }

    /// # Errors
    /// Same as [`RawQuery::execute`].
    pub fn field(self) -> Result<RowValues, SqlChainError> {
        self.run(Some(ReturnKind::All)).map(|c| c.field())
    }

    /// # Errors
    /// Same as [`RawQuery::execute`].
    pub fn col(self) -> Result<Vec<RowValues>, SqlChainError> {
        self.run(Some(ReturnKind::All)).map(|c| c.col())
    }

    /// # Errors
    /// Same as [`RawQuery::execute`].
    pub fn first(self) -> Result<Option<DbRow>, SqlChainError> {
        self.run(Some(ReturnKind::All))
            .map(|c| c.into_rows().into_iter().next())
    }

    /// # Errors
    /// Same as [`RawQuery::execute`].
    pub fn last(self) -> Result<Option<DbRow>, SqlChainError> {
        self.run(Some(ReturnKind::All)).map(|c| c.into_rows().pop())
    }

    /// # Errors
    /// Same as [`RawQuery::execute`].
    pub fn pluck(self, column: &str) -> Result<Vec<RowValues>, SqlChainError> {
        self.run(Some(ReturnKind::All)).map(|c| c.pluck(column))
    }

    /// First field of a `COUNT(*)`-style statement, as an integer.
    ///
    /// # Errors
    /// Same as [`RawQuery::execute`].
    pub fn count(self) -> Result<i64, SqlChainError> {
        self.run(Some(ReturnKind::Count)).map(|c| c.count(false))
    }

    /// Number of rows changed by the statement.
    ///
    /// # Errors
    /// Same as [`RawQuery::execute`].
    pub fn affected_rows(self) -> Result<u64, SqlChainError> {
        self.run(Some(ReturnKind::RowCount))
            .map(|c| u64::try_from(c.field().to_i64_lossy()).unwrap_or(0))
    }

    /// Rowid of the row the statement inserted.
    ///
    /// # Errors
    /// Same as [`RawQuery::execute`].
    pub fn last_insert_id(self) -> Result<i64, SqlChainError> {
        self.run(Some(ReturnKind::LastInsertId))
            .map(|c| c.field().to_i64_lossy())
    }
}
