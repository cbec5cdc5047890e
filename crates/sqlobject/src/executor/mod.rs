//! Statement execution.
//!
//! [`Executor`] is the seam between SQL generation and the database: the
//! record object, the schema introspector and the free functions here only
//! ever talk to it. [`MySqlExecutor`] is the production implementation over a
//! shared `sqlx` pool.
//!
//! # Example
//!
//! ```ignore
//! use sqlobject::{DbConfig, MySqlExecutor, Statement, execute_with_retry};
//!
//! let db = MySqlExecutor::connect(&DbConfig::from_dotenv()?).await?;
//! let mut stmt = Statement::new("SELECT * FROM widgets WHERE guid = ");
//! stmt.push_bind("w-1");
//! let rows = execute_with_retry(&db, &stmt, 3).await?;
//! db.close().await;
//! ```

mod mysql;

#[cfg(test)]
mod tests;

pub use mysql::MySqlExecutor;

use crate::error::{DbError, DbResult};
use crate::statement::Statement;
use crate::value::RowSet;
use async_trait::async_trait;
use serde::Serialize;

/// Default attempt count for [`execute_with_retry`].
pub const DEFAULT_RETRIES: u32 = 3;

/// Truncate logged SQL beyond this many bytes.
const LOG_SQL_MAX_BYTES: usize = 200;

/// What the server sent back for one statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Response {
    /// Result rows (empty for statements that do not return rows).
    pub rows: RowSet,
    /// Rows inserted / changed / deleted.
    pub rows_affected: u64,
    /// Auto-increment id generated by an INSERT, if any.
    pub last_insert_id: Option<u64>,
}

impl Response {
    /// A response carrying a result set.
    pub fn with_rows(rows: RowSet) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// A response for a write statement.
    pub fn with_affected(rows_affected: u64, last_insert_id: Option<u64>) -> Self {
        Self {
            rows: RowSet::new(),
            rows_affected,
            last_insert_id,
        }
    }
}

/// Something that can run a [`Statement`] against a database.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Schema (database) name that metadata lookups are scoped to.
    fn schema_name(&self) -> &str;

    /// Run one statement and return the full response.
    async fn run(&self, statement: &Statement) -> DbResult<Response>;
}

#[async_trait]
impl<E: Executor + ?Sized> Executor for &E {
    fn schema_name(&self) -> &str {
        (**self).schema_name()
    }

    async fn run(&self, statement: &Statement) -> DbResult<Response> {
        (**self).run(statement).await
    }
}

#[async_trait]
impl<E: Executor + ?Sized> Executor for std::sync::Arc<E> {
    fn schema_name(&self) -> &str {
        (**self).schema_name()
    }

    async fn run(&self, statement: &Statement) -> DbResult<Response> {
        (**self).run(statement).await
    }
}

/// Run one statement and return only its rows.
///
/// Driver errors propagate unchanged.
pub async fn execute<E: Executor + ?Sized>(executor: &E, statement: &Statement) -> DbResult<RowSet> {
    Ok(executor.run(statement).await?.rows)
}

/// Run a statement up to `retries` times (at least once), without delay
/// between attempts, and return the first successful response.
///
/// After the last failed attempt the error is wrapped in
/// [`DbError::RetryExhausted`] together with the number of attempts made.
pub async fn run_with_retry<E: Executor + ?Sized>(
    executor: &E,
    statement: &Statement,
    retries: u32,
) -> DbResult<Response> {
    let attempts = retries.max(1);
    let mut last_err = None;

    for attempt in 1..=attempts {
        match executor.run(statement).await {
            Ok(response) => {
                if attempt > 1 {
                    tracing::info!(target: "sqlobject.sql", attempt, "statement succeeded after retry");
                }
                return Ok(response);
            }
            Err(e) => {
                tracing::warn!(
                    target: "sqlobject.sql",
                    attempt,
                    attempts,
                    error = %e,
                    "statement failed"
                );
                last_err = Some(e);
            }
        }
    }

    let source = last_err.unwrap_or_else(|| DbError::Other("no attempt was made".to_string()));
    Err(DbError::RetryExhausted {
        attempts,
        source: Box::new(source),
    })
}

/// [`run_with_retry`], returning only the rows.
pub async fn execute_with_retry<E: Executor + ?Sized>(
    executor: &E,
    statement: &Statement,
    retries: u32,
) -> DbResult<RowSet> {
    Ok(run_with_retry(executor, statement, retries).await?.rows)
}

/// Emit the SQL that is about to be sent, with placeholders rather than values.
pub(crate) fn trace_statement(statement: &Statement) {
    let sql = statement.to_sql();
    let sql = if sql.len() > LOG_SQL_MAX_BYTES {
        format!("{}...", truncate_sql_bytes(&sql, LOG_SQL_MAX_BYTES))
    } else {
        sql
    };
    tracing::debug!(
        target: "sqlobject.sql",
        kind = ?statement.kind(),
        param_count = statement.param_count(),
        sql = %sql,
    );
}

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
