use crate::error::SqlChainError;
use crate::results::{Collection, DbRow, NativeResult};
use crate::types::{ReturnKind, RowValues};

use super::{QueryBuilder, SelectShape};

impl QueryBuilder<'_> {
    fn run_select(self, shape: SelectShape, kind: ReturnKind) -> Result<NativeResult, SqlChainError> {
        let db = self.db;
        let server = self.server.clone();
        let statement = self.build_select(shape)?;
        db.run(server.as_deref(), &statement, Some(kind))
    }

    /// Execute the SELECT and return every row as a [`Collection`].
    ///
    /// # Errors
    /// Returns `BuildError` for invalid builder input, `ConfigError`/`ConnectionError`
    /// when the server can't be resolved or reached, and `StatementError` when the
    /// backend rejects the statement.
    pub fn get(self) -> Result<Collection, SqlChainError> {
        self.run_select(SelectShape::Rows, ReturnKind::All)
            .map(Collection::from)
    }

    /// Execute the SELECT and return the rows.
    ///
    /// # Errors
    /// Same as [`QueryBuilder::get`].
    pub fn fetch(self) -> Result<Vec<DbRow>, SqlChainError> {
        self.get().map(Collection::into_rows)
    }

    /// First row, or an empty row when nothing matched.
    ///
    /// # Errors
    /// Same as [`QueryBuilder::get`].
    pub fn row(self) -> Result<DbRow, SqlChainError> {
        self.get().map(|c| c.row())
    }

    /// First column of the first row, or `RowValues::Null`.
    ///
    /// # Errors
    /// Same as [`QueryBuilder::get`].
    pub fn field(self) -> Result<RowValues, SqlChainError> {
        self.get().map(|c| c.field())
    }

    /// Values of the first selected column across all rows.
    ///
    /// # Errors
    /// Same as [`QueryBuilder::get`].
    pub fn col(self) -> Result<Vec<RowValues>, SqlChainError> {
        self.get().map(|c| c.col())
    }

    /// # Errors
    /// Same as [`QueryBuilder::get`].
    pub fn first(self) -> Result<Option<DbRow>, SqlChainError> {
        self.get().map(|c| c.into_rows().into_iter().next())
    }

    /// # Errors
    /// Same as [`QueryBuilder::get`].
    pub fn last(self) -> Result<Option<DbRow>, SqlChainError> {
        self.get().map(|c| c.into_rows().pop())
    }

    /// Values of `column` across all rows, `RowValues::Null` where a row lacks it.
    ///
    /// # Errors
    /// Same as [`QueryBuilder::get`].
    pub fn pluck(self, column: &str) -> Result<Vec<RowValues>, SqlChainError> {
        self.get().map(|c| c.pluck(column))
    }

    /// `SELECT COUNT(*) AS total` over the current conditions; ordering and paging are
    /// ignored.
    ///
    /// # Errors
    /// Same as [`QueryBuilder::get`].
    pub fn count(self) -> Result<i64, SqlChainError> {
        self.run_select(SelectShape::Count, ReturnKind::Count)
            .map(|native| Collection::from(native).count(false))
    }

    /// Whether any row matches, via `SELECT 1 ... LIMIT 1`.
    ///
    /// # Errors
    /// Same as [`QueryBuilder::get`].
    pub fn exists(self) -> Result<bool, SqlChainError> {
        self.run_select(SelectShape::Exists, ReturnKind::All)
            .map(|native| !Collection::from(native).is_empty())
    }
}
