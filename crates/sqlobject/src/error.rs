//! Error types for sqlobject

use thiserror::Error;

/// Result type alias for sqlobject operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),

    /// Row or table not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Schema metadata could not be loaded for a table
    #[error("Schema error for table '{table}': {source}")]
    Schema {
        table: String,
        #[source]
        source: Box<DbError>,
    },

    /// Every attempt of a retried statement failed
    #[error("Query failed after {attempts} attempt(s): {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: Box<DbError>,
    },

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error (bad identifiers, malformed input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error (missing or malformed settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP error while filling the response cache
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl DbError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Wrap a failure that happened while loading metadata for `table`.
    pub fn schema(table: impl Into<String>, source: DbError) -> Self {
        Self::Schema {
            table: table.into(),
            source: Box::new(source),
        }
    }

    /// Check if this is a schema error
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// Number of attempts made, if this error came out of a retry loop.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::RetryExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    /// Check if the underlying driver reported a duplicate key.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Query(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            Self::RetryExhausted { source, .. } => source.is_unique_violation(),
            _ => false,
        }
    }
}
