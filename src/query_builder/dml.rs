use crate::error::SqlChainError;
use crate::results::Collection;
use crate::types::{ReturnKind, RowValues};

use super::{Action, QueryBuilder};

impl QueryBuilder<'_> {
    fn run_write(self, action: Action, kind: ReturnKind) -> Result<i64, SqlChainError> {
        let db = self.db;
        let server = self.server.clone();
        let statement = self.build(action)?;
        let native = db.run(server.as_deref(), &statement, Some(kind))?;
        Ok(Collection::from(native).field().to_i64_lossy())
    }

    fn with_data<I, K, V>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RowValues>,
    {
        for (column, value) in data {
            self = self.set(column.as_ref(), value);
        }
        self
    }

    /// Run `UPDATE ... SET ... [WHERE ...]` and return the number of rows changed.
    ///
    /// # Errors
    /// Returns `BuildError` when there is nothing to set or earlier input was invalid,
    /// otherwise the routing and statement errors of [`QueryBuilder::get`].
    pub fn update(self) -> Result<u64, SqlChainError> {
        self.run_write(Action::Update, ReturnKind::RowCount)
            .map(|n| u64::try_from(n).unwrap_or(0))
    }

    /// Run `DELETE FROM ... [WHERE ...]` and return the number of rows removed.
    ///
    /// Without conditions every row of the table is deleted.
    ///
    /// # Errors
    /// Same as [`QueryBuilder::get`].
    pub fn delete(self) -> Result<u64, SqlChainError> {
        self.run_write(Action::Delete, ReturnKind::RowCount)
            .map(|n| u64::try_from(n).unwrap_or(0))
    }

    /// Insert `data` (filtered by [`QueryBuilder::fillable`]) and return the new rowid.
    ///
    /// # Errors
    /// Same as [`QueryBuilder::get`].
    pub fn create<I, K, V>(self, data: I) -> Result<i64, SqlChainError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RowValues>,
    {
        self.with_data(data)
            .run_write(Action::Insert, ReturnKind::LastInsertId)
    }

    /// `REPLACE INTO` with `data`, returning the number of rows written.
    ///
    /// # Errors
    /// Same as [`QueryBuilder::get`].
    pub fn replace<I, K, V>(self, data: I) -> Result<u64, SqlChainError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RowValues>,
    {
        self.with_data(data)
            .run_write(Action::Replace, ReturnKind::RowCount)
            .map(|n| u64::try_from(n).unwrap_or(0))
    }
}
