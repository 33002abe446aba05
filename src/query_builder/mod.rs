//! Fluent statement builder.
//!
//! A [`QueryBuilder`] accumulates one statement's intent (table, projection, a
//! [`ConditionList`], SET assignments, ordering and paging) across chained calls.
//! Nothing is rendered until a terminal call picks the statement verb, so no
//! intermediate state ever yields partial SQL. Invalid identifiers or operators are
//! recorded and returned as [`SqlChainError::BuildError`] from the terminal call.
//!
//! ```rust
//! use sql_chain::prelude::*;
//!
//! let db = Database::new();
//! let sql = db
//!     .table("users")
//!     .where_eq("active", true)
//!     .where_group(|q| q.where_cmp("age", ">", 18).or_where_null("age"))
//!     .order_by("name", Direction::Asc)
//!     .limit(10)
//!     .to_sql()?;
//! assert_eq!(
//!     sql,
//!     "SELECT * FROM users WHERE active = ? AND (age > ? OR age IS NULL) ORDER BY name ASC LIMIT 10"
//! );
//! # Ok::<(), SqlChainError>(())
//! ```

use crate::condition::{Condition, ConditionList, Connective};
use crate::database::Database;
use crate::error::SqlChainError;
use crate::types::RowValues;

mod bindings;
mod dml;
mod filter;
mod finalize;
mod select;
mod validate;

pub use bindings::BindingList;
pub use filter::Filter;
pub use finalize::Action;
pub use validate::Direction;

pub(crate) use finalize::SelectShape;

/// One projection entry, `expression [AS alias]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectColumn {
    pub expression: String,
    pub alias: Option<String>,
}

/// `column = ?` in an UPDATE, or one column/value of an INSERT/REPLACE.
#[derive(Debug, Clone, PartialEq)]
pub struct SetAssignment {
    pub column: String,
    pub value: RowValues,
}

/// Builder for one statement against one table.
///
/// Created with [`Database::table`]; every method takes and returns the builder by
/// value, and terminal methods (`fetch`, `count`, `update`, ...) consume it.
#[derive(Debug, Clone)]
pub struct QueryBuilder<'db> {
    db: &'db Database,
    server: Option<String>,
    table: String,
    columns: Vec<SelectColumn>,
    conditions: ConditionList,
    bindings: BindingList,
    sets: Vec<SetAssignment>,
    fillable: Option<Vec<String>>,
    orders: Vec<(String, Direction)>,
    limit: Option<u64>,
    offset: Option<u64>,
    build_error: Option<String>,
}

impl<'db> QueryBuilder<'db> {
    pub(crate) fn new(db: &'db Database, table: &str) -> Self {
        Self::detached(db).table(table)
    }

    /// Builder with no table yet, handed to group and subquery callbacks.
    fn detached(db: &'db Database) -> Self {
        Self {
            db,
            server: None,
            table: String::new(),
            columns: Vec::new(),
            conditions: ConditionList::new(),
            bindings: BindingList::new(),
            sets: Vec::new(),
            fillable: None,
            orders: Vec::new(),
            limit: None,
            offset: None,
            build_error: None,
        }
    }

    fn nested(&self) -> Self {
        Self::detached(self.db)
    }

    /// Set (or replace) the target table.
    #[must_use]
    pub fn table(mut self, table: &str) -> Self {
        if self.check(validate::identifier(table)).is_some() {
            self.table = table.to_string();
        }
        self
    }

    /// Run against the named server instead of the default one.
    #[must_use]
    pub fn on(mut self, server: &str) -> Self {
        self.server = Some(server.to_string());
        self
    }

    // ---- projection ----------------------------------------------------------------

    /// Replace the projection. An empty projection selects `*`.
    #[must_use]
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.columns.clear();
        for column in columns {
            self = self.add_select(column.as_ref());
        }
        self
    }

    #[must_use]
    pub fn add_select(mut self, column: &str) -> Self {
        if self.check(validate::column(column)).is_some() {
            self.columns.push(SelectColumn {
                expression: column.to_string(),
                alias: None,
            });
        }
        self
    }

    /// Append `expression AS alias`. The expression is emitted verbatim; only the alias
    /// is validated.
    #[must_use]
    pub fn select_as(mut self, expression: &str, alias: &str) -> Self {
        if self.check(validate::identifier(alias)).is_some() {
            self.columns.push(SelectColumn {
                expression: expression.to_string(),
                alias: Some(alias.to_string()),
            });
        }
        self
    }

    // ---- conditions ----------------------------------------------------------------

    /// `AND column = ?`
    #[must_use]
    pub fn where_eq<V: Into<RowValues>>(self, column: &str, value: V) -> Self {
        self.push_simple(Connective::And, column, "=", value.into())
    }

    /// `AND column <operator> ?`
    #[must_use]
    pub fn where_cmp<V: Into<RowValues>>(self, column: &str, operator: &str, value: V) -> Self {
        self.push_simple(Connective::And, column, operator, value.into())
    }

    /// `OR column = ?`
    #[must_use]
    pub fn or_where_eq<V: Into<RowValues>>(self, column: &str, value: V) -> Self {
        self.push_simple(Connective::Or, column, "=", value.into())
    }

    /// `OR column <operator> ?`
    #[must_use]
    pub fn or_where_cmp<V: Into<RowValues>>(self, column: &str, operator: &str, value: V) -> Self {
        self.push_simple(Connective::Or, column, operator, value.into())
    }

    /// `AND column <operator> ?` from a [`Filter`] or anything that converts into one.
    #[must_use]
    pub fn where_filter(self, filter: impl Into<Filter>) -> Self {
        let Filter {
            column,
            operator,
            value,
        } = filter.into();
        self.push_simple(Connective::And, &column, &operator, value)
    }

    /// `AND ( ... )`, where the group is whatever `f` adds to the fresh builder it is
    /// given. A group with no conditions is dropped.
    #[must_use]
    pub fn where_group<F>(self, f: F) -> Self
    where
        F: FnOnce(QueryBuilder<'db>) -> QueryBuilder<'db>,
    {
        self.push_group(Connective::And, f)
    }

    /// `OR ( ... )`
    #[must_use]
    pub fn or_where_group<F>(self, f: F) -> Self
    where
        F: FnOnce(QueryBuilder<'db>) -> QueryBuilder<'db>,
    {
        self.push_group(Connective::Or, f)
    }

    /// `AND first <operator> second`, comparing two columns; binds nothing.
    #[must_use]
    pub fn where_column(self, first: &str, operator: &str, second: &str) -> Self {
        self.push_column_compare(Connective::And, first, operator, second)
    }

    #[must_use]
    pub fn or_where_column(self, first: &str, operator: &str, second: &str) -> Self {
        self.push_column_compare(Connective::Or, first, operator, second)
    }

    /// `AND column <operator> (SELECT ...)`, the subquery being the SELECT that `f`
    /// builds on a fresh builder. Its bindings are spliced in at this point.
    #[must_use]
    pub fn where_sub<F>(self, column: &str, operator: &str, f: F) -> Self
    where
        F: FnOnce(QueryBuilder<'db>) -> QueryBuilder<'db>,
    {
        self.push_subquery(Connective::And, column, operator, f)
    }

    #[must_use]
    pub fn or_where_sub<F>(self, column: &str, operator: &str, f: F) -> Self
    where
        F: FnOnce(QueryBuilder<'db>) -> QueryBuilder<'db>,
    {
        self.push_subquery(Connective::Or, column, operator, f)
    }

    #[must_use]
    pub fn where_null(self, column: &str) -> Self {
        self.push_null(Connective::And, column, false)
    }

    #[must_use]
    pub fn where_not_null(self, column: &str) -> Self {
        self.push_null(Connective::And, column, true)
    }

    #[must_use]
    pub fn or_where_null(self, column: &str) -> Self {
        self.push_null(Connective::Or, column, false)
    }

    #[must_use]
    pub fn or_where_not_null(self, column: &str) -> Self {
        self.push_null(Connective::Or, column, true)
    }

    /// `AND column IN (?, ...)`; an empty list matches no rows.
    #[must_use]
    pub fn where_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        self.push_in_list(Connective::And, column, false, values)
    }

    /// `AND column NOT IN (?, ...)`; an empty list matches every row.
    #[must_use]
    pub fn where_not_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        self.push_in_list(Connective::And, column, true, values)
    }

    #[must_use]
    pub fn or_where_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        self.push_in_list(Connective::Or, column, false, values)
    }

    #[must_use]
    pub fn or_where_not_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        self.push_in_list(Connective::Or, column, true, values)
    }

    // ---- assignments, ordering, paging -------------------------------------------

    /// Add `column = ?` to the SET list (also the column/value list of `create` and
    /// `replace`). Setting a column again keeps its position and takes the new value.
    #[must_use]
    pub fn set<V: Into<RowValues>>(mut self, column: &str, value: V) -> Self {
        if self.check(validate::identifier(column)).is_none() {
            return self;
        }
        let value = value.into();
        match self.sets.iter_mut().find(|s| s.column == column) {
            Some(existing) => existing.value = value,
            None => self.sets.push(SetAssignment {
                column: column.to_string(),
                value,
            }),
        }
        self
    }

    /// Restrict INSERT/REPLACE columns to this whitelist; other columns are dropped. An
    /// empty whitelist allows every column.
    #[must_use]
    pub fn fillable<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fillable = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        if self.check(validate::identifier(column)).is_some() {
            self.orders.push((column.to_string(), direction));
        }
        self
    }

    /// Maximum number of rows; a later call replaces an earlier one.
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Rows to skip; a later call replaces an earlier one.
    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// WHERE bindings accumulated so far, in placeholder order.
    #[must_use]
    pub fn bindings(&self) -> &[RowValues] {
        self.bindings.as_slice()
    }

    #[must_use]
    pub fn conditions(&self) -> &ConditionList {
        &self.conditions
    }

    // ---- internals -----------------------------------------------------------------

    /// Keep the first failure; later calls in the chain are still accepted but the
    /// terminal call will report it.
    fn check<T>(&mut self, result: Result<T, SqlChainError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                if self.build_error.is_none() {
                    self.build_error = Some(match err {
                        SqlChainError::BuildError(message) => message,
                        other => other.to_string(),
                    });
                }
                None
            }
        }
    }

    fn absorb_error(&mut self, inner: &QueryBuilder<'_>) {
        if self.build_error.is_none() {
            self.build_error.clone_from(&inner.build_error);
        }
    }

    fn push_simple(
        mut self,
        connective: Connective,
        column: &str,
        operator: &str,
        value: RowValues,
    ) -> Self {
        if self.check(validate::identifier(column)).is_none() {
            return self;
        }
        let Some(operator) = self.check(validate::comparison(operator)) else {
            return self;
        };
        let value_index = self.bindings.push(value);
        self.conditions.push(
            connective,
            Condition::Simple {
                column: column.to_string(),
                operator,
                value_index,
            },
        );
        self
    }

    fn push_group<F>(mut self, connective: Connective, f: F) -> Self
    where
        F: FnOnce(QueryBuilder<'db>) -> QueryBuilder<'db>,
    {
        let inner = f(self.nested());
        self.absorb_error(&inner);
        if inner.conditions.is_empty() {
            return self;
        }
        let mut conditions = inner.conditions;
        conditions.rebase(self.bindings.len());
        self.bindings.extend(inner.bindings);
        self.conditions.push(connective, Condition::Group(conditions));
        self
    }

    fn push_column_compare(
        mut self,
        connective: Connective,
        first: &str,
        operator: &str,
        second: &str,
    ) -> Self {
        if self.check(validate::identifier(first)).is_none()
            || self.check(validate::identifier(second)).is_none()
        {
            return self;
        }
        let Some(operator) = self.check(validate::comparison(operator)) else {
            return self;
        };
        self.conditions.push(
            connective,
            Condition::ColumnCompare {
                left: first.to_string(),
                operator,
                right: second.to_string(),
            },
        );
        self
    }

    fn push_subquery<F>(mut self, connective: Connective, column: &str, operator: &str, f: F) -> Self
    where
        F: FnOnce(QueryBuilder<'db>) -> QueryBuilder<'db>,
    {
        if self.check(validate::identifier(column)).is_none() {
            return self;
        }
        let Some(operator) = self.check(validate::subquery_operator(operator)) else {
            return self;
        };
        let inner = f(self.nested());
        let Some((sql, inner_bindings)) = self.check(inner.compile_select(SelectShape::Rows))
        else {
            return self;
        };
        let bindings = self.bindings.extend(inner_bindings);
        self.conditions.push(
            connective,
            Condition::SubqueryCompare {
                column: column.to_string(),
                operator,
                sql,
                bindings,
            },
        );
        self
    }

    fn push_null(mut self, connective: Connective, column: &str, negated: bool) -> Self {
        if self.check(validate::identifier(column)).is_some() {
            self.conditions.push(
                connective,
                Condition::Null {
                    column: column.to_string(),
                    negated,
                },
            );
        }
        self
    }

    fn push_in_list<I, V>(mut self, connective: Connective, column: &str, negated: bool, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        if self.check(validate::identifier(column)).is_none() {
            return self;
        }
        let bindings = self.bindings.extend_values(values.into_iter().map(Into::into));
        self.conditions.push(
            connective,
            Condition::InList {
                column: column.to_string(),
                negated,
                bindings,
            },
        );
        self
    }
}
