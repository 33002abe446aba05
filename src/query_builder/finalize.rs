use std::fmt::Write as _;

use tracing::debug;

use super::{BindingList, QueryBuilder, SetAssignment};
use crate::error::SqlChainError;
use crate::placeholders::interpolate;
use crate::query::QueryAndParams;
use crate::types::Params;

/// Statement verb a builder is finalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Select,
    Insert,
    Update,
    Delete,
    Replace,
}

/// Projection variants of a SELECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectShape {
    Rows,
    /// `COUNT(*) AS total`, no ordering or paging.
    Count,
    /// `1 ... LIMIT 1`
    Exists,
}

impl QueryBuilder<'_> {
    /// Finalize into statement text and bindings.
    ///
    /// - `Select` renders the projection, conditions, ordering and paging.
    /// - `Update` renders `SET` assignments first, so their bindings precede the WHERE
    ///   bindings whatever order the calls were made in.
    /// - `Delete` renders `DELETE FROM`; with no conditions there is no WHERE clause.
    /// - `Insert`/`Replace` use the SET assignments as the column list, filtered by the
    ///   fillable whitelist, and ignore conditions, ordering and paging.
    ///
    /// # Errors
    ///
    /// Returns `SqlChainError::BuildError` if an earlier builder call was invalid, no
    /// table was set, or an UPDATE has nothing to set.
    pub fn build(self, action: Action) -> Result<QueryAndParams, SqlChainError> {
        match action {
            Action::Select => self.build_select(SelectShape::Rows),
            Action::Update => self.build_update(),
            Action::Delete => self.build_delete(),
            Action::Insert => self.build_insert("INSERT"),
            Action::Replace => self.build_insert("REPLACE"),
        }
    }

    /// The SELECT this builder would run, without executing it.
    ///
    /// # Errors
    ///
    /// Returns `SqlChainError::BuildError` for invalid builder input.
    pub fn to_sql(&self) -> Result<String, SqlChainError> {
        self.render_select(SelectShape::Rows)
    }

    /// The SELECT text, optionally with bindings substituted as SQL literals.
    ///
    /// Intended for logs and debugging; never execute the interpolated form.
    ///
    /// # Errors
    ///
    /// Returns `SqlChainError::BuildError` for invalid builder input.
    pub fn raw_sql(&self, interpolated: bool) -> Result<String, SqlChainError> {
        let sql = self.render_select(SelectShape::Rows)?;
        if !interpolated {
            return Ok(sql);
        }
        Ok(interpolate(
            &sql,
            &Params::Positional(self.bindings.as_slice().to_vec()),
        ))
    }

    pub(crate) fn build_select(self, shape: SelectShape) -> Result<QueryAndParams, SqlChainError> {
        let (query, bindings) = self.compile_select(shape)?;
        Ok(QueryAndParams::new(query, bindings.into_vec()))
    }

    pub(super) fn compile_select(
        self,
        shape: SelectShape,
    ) -> Result<(String, BindingList), SqlChainError> {
        let sql = self.render_select(shape)?;
        Ok((sql, self.bindings))
    }

    fn ensure_buildable(&self) -> Result<(), SqlChainError> {
        if let Some(message) = &self.build_error {
            return Err(SqlChainError::BuildError(message.clone()));
        }
        if self.table.is_empty() {
            return Err(SqlChainError::BuildError("no table selected".to_string()));
        }
        Ok(())
    }

    fn render_select(&self, shape: SelectShape) -> Result<String, SqlChainError> {
        self.ensure_buildable()?;

        let mut sql = String::from("SELECT ");
        match shape {
            SelectShape::Count => sql.push_str("COUNT(*) AS total"),
            SelectShape::Exists => sql.push('1'),
            SelectShape::Rows if self.columns.is_empty() => sql.push('*'),
            SelectShape::Rows => {
                for (i, column) in self.columns.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(", ");
                    }
                    sql.push_str(&column.expression);
                    if let Some(alias) = &column.alias {
                        let _ = write!(sql, " AS {alias}");
                    }
                }
            }
        }
        let _ = write!(sql, " FROM {}", self.table);
        self.push_where(&mut sql);

        match shape {
            SelectShape::Count => {}
            SelectShape::Exists => sql.push_str(" LIMIT 1"),
            SelectShape::Rows => {
                if !self.orders.is_empty() {
                    sql.push_str(" ORDER BY ");
                    for (i, (column, direction)) in self.orders.iter().enumerate() {
                        if i > 0 {
                            sql.push_str(", ");
                        }
                        let _ = write!(sql, "{column} {direction}");
                    }
                }
                match (self.limit, self.offset) {
                    (Some(limit), Some(offset)) => {
                        let _ = write!(sql, " LIMIT {limit} OFFSET {offset}");
                    }
                    (Some(limit), None) => {
                        let _ = write!(sql, " LIMIT {limit}");
                    }
                    // sqlite needs a LIMIT before OFFSET; -1 means unbounded
                    (None, Some(offset)) => {
                        let _ = write!(sql, " LIMIT -1 OFFSET {offset}");
                    }
                    (None, None) => {}
                }
            }
        }
        Ok(sql)
    }

    fn push_where(&self, sql: &mut String) {
        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.render());
        }
    }

    fn build_update(self) -> Result<QueryAndParams, SqlChainError> {
        self.ensure_buildable()?;
        if self.sets.is_empty() {
            return Err(SqlChainError::BuildError(format!(
                "UPDATE {} has no SET assignments",
                self.table
            )));
        }

        let mut sql = format!("UPDATE {} SET ", self.table);
        for (i, assignment) in self.sets.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            let _ = write!(sql, "{} = ?", assignment.column);
        }
        self.push_where(&mut sql);

        let mut params = Vec::with_capacity(self.sets.len() + self.bindings.len());
        params.extend(self.sets.into_iter().map(|s| s.value));
        params.extend(self.bindings.into_vec());
        Ok(QueryAndParams::new(sql, params))
    }

    fn build_delete(self) -> Result<QueryAndParams, SqlChainError> {
        self.ensure_buildable()?;
        let mut sql = format!("DELETE FROM {}", self.table);
        self.push_where(&mut sql);
        Ok(QueryAndParams::new(sql, self.bindings.into_vec()))
    }

    fn build_insert(self, verb: &str) -> Result<QueryAndParams, SqlChainError> {
        self.ensure_buildable()?;
        let table = self.table;
        let assignments: Vec<SetAssignment> = match self.fillable.as_deref() {
            Some(allowed) if !allowed.is_empty() => self
                .sets
                .into_iter()
                .filter(|s| {
                    let keep = allowed.iter().any(|a| *a == s.column);
                    if !keep {
                        debug!(table = %table, column = %s.column, "dropping non-fillable column");
                    }
                    keep
                })
                .collect(),
            _ => self.sets,
        };

        if assignments.is_empty() {
            return Ok(QueryAndParams::new(
                format!("{verb} INTO {table} DEFAULT VALUES"),
                Vec::new(),
            ));
        }

        let columns: Vec<&str> = assignments.iter().map(|s| s.column.as_str()).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "{verb} INTO {table} ({}) VALUES ({placeholders})",
            columns.join(", ")
        );
        let params = assignments.into_iter().map(|s| s.value).collect();
        Ok(QueryAndParams::new(sql, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::query_builder::Direction;
    use crate::types::RowValues;

    #[test]
    fn count_and_exists_drop_paging() {
        let db = Database::new();
        let q = db
            .table("users")
            .where_eq("active", 1)
            .order_by("id", Direction::Desc)
            .limit(5);
        let count = q.clone().build_select(SelectShape::Count).map(|q| q.query);
        let exists = q.build_select(SelectShape::Exists).map(|q| q.query);
        assert_eq!(
            count.ok().as_deref(),
            Some("SELECT COUNT(*) AS total FROM users WHERE active = ?")
        );
        assert_eq!(
            exists.ok().as_deref(),
            Some("SELECT 1 FROM users WHERE active = ? LIMIT 1")
        );
    }

    #[test]
    fn offset_without_limit_stays_valid() {
        let db = Database::new();
        let sql = db.table("t").offset(20).to_sql();
        assert_eq!(sql.ok().as_deref(), Some("SELECT * FROM t LIMIT -1 OFFSET 20"));
    }

    #[test]
    fn update_without_sets_is_rejected() {
        let db = Database::new();
        let err = db.table("t").where_eq("id", 1).build(Action::Update);
        assert!(matches!(err, Err(SqlChainError::BuildError(_))));
    }

    #[test]
    fn insert_without_columns_uses_default_values() {
        let db = Database::new();
        let q = db.table("t").build(Action::Insert);
        assert_eq!(
            q.ok().map(|q| q.query).as_deref(),
            Some("INSERT INTO t DEFAULT VALUES")
        );
    }

    #[test]
    fn replace_ignores_conditions() {
        let db = Database::new();
        let q = db
            .table("t")
            .where_eq("id", 9)
            .set("id", 1)
            .set("name", "x")
            .build(Action::Replace);
        let Ok(q) = q else {
            panic!("replace should build");
        };
        assert_eq!(q.query, "REPLACE INTO t (id, name) VALUES (?, ?)");
        assert_eq!(q.params, Params::Positional(vec![RowValues::Int(1), "x".into()]));
    }

    #[test]
    fn raw_sql_interpolates_for_display() {
        let db = Database::new();
        let q = db.table("users").where_eq("name", "O'Neil").where_cmp("age", ">", 30);
        assert_eq!(
            q.raw_sql(true).ok().as_deref(),
            Some("SELECT * FROM users WHERE name = 'O''Neil' AND age > 30")
        );
        assert_eq!(
            q.raw_sql(false).ok().as_deref(),
            Some("SELECT * FROM users WHERE name = ? AND age > ?")
        );
    }

    #[test]
    fn missing_table_is_a_build_error() {
        let db = Database::new();
        let err = db.table("bad table").to_sql();
        assert!(matches!(err, Err(SqlChainError::BuildError(_))));
    }
}
