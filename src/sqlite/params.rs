use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::{SqlChainError, StatementContext};
use crate::placeholders::{PlaceholderStyle, placeholder_style};
use crate::types::{Params, RowValues};

/// Convert a single `RowValue` to a rusqlite `Value`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Bind `params` to every placeholder of `stmt`.
///
/// Positional values fill `?` slots in order. Named values are matched by name; every
/// name must exist in the statement and every parameter of the statement must be given.
///
/// # Errors
///
/// Returns `SqlChainError::StatementError` on a count mismatch, an unknown name, or a
/// bind failure.
pub fn bind_params(stmt: &mut Statement<'_>, params: &Params, sql: &str) -> Result<(), SqlChainError> {
    let expected = stmt.parameter_count();
    if expected != params.len() {
        return Err(SqlChainError::statement(
            sql,
            format!(
                "statement expects {expected} parameter(s) but {} were given",
                params.len()
            ),
        ));
    }

    match params {
        Params::Named(_) if placeholder_style(sql) == PlaceholderStyle::Positional => {
            return Err(SqlChainError::statement(
                sql,
                "named parameters given for a statement with only positional placeholders",
            ));
        }
        Params::Positional(values) => {
            for (i, value) in values.iter().enumerate() {
                stmt.raw_bind_parameter(i + 1, row_value_to_sqlite_value(value))
                    .with_sql(sql)?;
            }
        }
        Params::Named(pairs) => {
            for (name, value) in pairs {
                let Some(index) = stmt.parameter_index(name).with_sql(sql)? else {
                    return Err(SqlChainError::statement(
                        sql,
                        format!("unknown named parameter '{name}'"),
                    ));
                };
                stmt.raw_bind_parameter(index, row_value_to_sqlite_value(value))
                    .with_sql(sql)?;
            }
        }
    }
    Ok(())
}
