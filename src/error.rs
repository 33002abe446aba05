use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlChainError {
    /// Duplicate, missing or unparseable server configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The backend could not connect or apply the connection settings.
    #[error("Connection error: {message} (configuration: {config})")]
    ConnectionError {
        message: String,
        /// Sanitized configuration, password masked.
        config: String,
    },

    /// Prepare or execute failure, carrying the backend message and the offending SQL.
    #[error("Statement error: {message} [sql: {sql}]")]
    StatementError { message: String, sql: String },

    /// Invalid builder input recorded during the fluent chain.
    #[error("Query build error: {0}")]
    BuildError(String),

    #[error("Result shape error: {0}")]
    ResultShapeError(String),
}

impl SqlChainError {
    pub(crate) fn statement(sql: &str, err: impl std::fmt::Display) -> Self {
        SqlChainError::StatementError {
            message: err.to_string(),
            sql: sql.to_string(),
        }
    }
}

/// Map a `rusqlite` failure onto the statement that triggered it.
pub(crate) trait StatementContext<T> {
    fn with_sql(self, sql: &str) -> Result<T, SqlChainError>;
}

impl<T> StatementContext<T> for Result<T, rusqlite::Error> {
    fn with_sql(self, sql: &str) -> Result<T, SqlChainError> {
        self.map_err(|e| SqlChainError::statement(sql, e))
    }
}
