//! Table metadata from `INFORMATION_SCHEMA`.
//!
//! Every function issues exactly one query, scoped to the executor's schema
//! name. Nothing is cached; [`crate::SqlObject`] keeps its own copy of the
//! [`TableSchema`] it loaded.

mod table;


pub use table::{ColumnDef, ForeignKey, TableSchema, parse_enum_values};

use crate::error::{DbError, DbResult};
use crate::executor::Executor;
use crate::statement::Statement;
use crate::value::{Row, Value};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything the introspector knows about a table, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDescription {
    pub schema: TableSchema,
    pub enums: BTreeMap<String, Vec<String>>,
    pub foreign_keys: Vec<ForeignKey>,
    pub is_view: bool,
    pub row_count: u64,
}

fn scoped(executor: &impl Executor, sql: &str, table: &str) -> Statement {
    let mut stmt = Statement::new(sql);
    stmt.push(" WHERE TABLE_SCHEMA = ")
        .push_bind(executor.schema_name())
        .push(" AND TABLE_NAME = ")
        .push_bind(table);
    stmt
}

fn text(row: &Row, column: &str) -> DbResult<String> {
    match row.get(column) {
        Some(Value::Text(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(DbError::decode(column, "missing value")),
        Some(other) => Ok(other.to_string()),
    }
}

fn count(row: Option<&Row>, column: &str) -> u64 {
    row.and_then(|r| r.get(column))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

/// Column names of `table`, in ordinal order.
pub async fn columns(executor: &impl Executor, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = scoped(
        executor,
        "SELECT COLUMN_NAME AS column_name FROM INFORMATION_SCHEMA.COLUMNS",
        table,
    );
    stmt.push(" ORDER BY ORDINAL_POSITION");

    executor
        .run(&stmt)
        .await?
        .rows
        .iter()
        .map(|row| text(row, "column_name"))
        .collect()
}

/// Column layout of `table`.
///
/// Fails with [`DbError::Schema`] when the lookup errors or the table has no
/// columns (does not exist).
pub async fn properties(executor: &impl Executor, table: &str) -> DbResult<TableSchema> {
    let mut stmt = scoped(
        executor,
        "SELECT COLUMN_NAME AS column_name, DATA_TYPE AS data_type, \
         COLUMN_TYPE AS column_type, EXTRA AS extra FROM INFORMATION_SCHEMA.COLUMNS",
        table,
    );
    stmt.push(" ORDER BY ORDINAL_POSITION");

    let rows = executor
        .run(&stmt)
        .await
        .map_err(|e| DbError::schema(table, e))?
        .rows;
    if rows.is_empty() {
        return Err(DbError::schema(
            table,
            DbError::not_found(format!(
                "table '{table}' not found in schema '{}'",
                executor.schema_name()
            )),
        ));
    }

    let columns = rows
        .iter()
        .map(|row| {
            let extra = text(row, "extra").unwrap_or_default();
            Ok(ColumnDef {
                name: text(row, "column_name")?,
                data_type: text(row, "data_type")?,
                column_type: text(row, "column_type")?,
                auto_increment: extra.to_ascii_lowercase().contains("auto_increment"),
            })
        })
        .collect::<DbResult<Vec<_>>>()
        .map_err(|e| DbError::schema(table, e))?;

    Ok(TableSchema::new(table, columns))
}

/// Members of the enum column `table.column`; empty when the column is not an
/// enum or does not exist.
pub async fn enum_values(
    executor: &impl Executor,
    table: &str,
    column: &str,
) -> DbResult<Vec<String>> {
    let mut stmt = scoped(
        executor,
        "SELECT COLUMN_TYPE AS column_type FROM INFORMATION_SCHEMA.COLUMNS",
        table,
    );
    stmt.push(" AND COLUMN_NAME = ").push_bind(column);

    let rows = executor.run(&stmt).await?.rows;
    Ok(rows
        .first()
        .and_then(|row| text(row, "column_type").ok())
        .map(|t| parse_enum_values(&t))
        .unwrap_or_default())
}

/// Foreign keys declared on `table`.
pub async fn foreign_keys(executor: &impl Executor, table: &str) -> DbResult<Vec<ForeignKey>> {
    let mut stmt = scoped(
        executor,
        "SELECT CONSTRAINT_NAME AS constraint_name, COLUMN_NAME AS column_name, \
         REFERENCED_TABLE_NAME AS referenced_table, REFERENCED_COLUMN_NAME AS referenced_column \
         FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE",
        table,
    );
    stmt.push(" AND REFERENCED_TABLE_NAME IS NOT NULL ORDER BY CONSTRAINT_NAME, ORDINAL_POSITION");

    executor
        .run(&stmt)
        .await?
        .rows
        .iter()
        .map(|row| {
            Ok(ForeignKey {
                constraint_name: text(row, "constraint_name")?,
                column: text(row, "column_name")?,
                referenced_table: text(row, "referenced_table")?,
                referenced_column: text(row, "referenced_column")?,
            })
        })
        .collect()
}

/// Whether `table` exists (as a base table or a view).
pub async fn table_exists(executor: &impl Executor, table: &str) -> DbResult<bool> {
    let stmt = scoped(
        executor,
        "SELECT COUNT(*) AS count FROM INFORMATION_SCHEMA.TABLES",
        table,
    );
    let rows = executor.run(&stmt).await?.rows;
    Ok(count(rows.first(), "count") > 0)
}

/// `Some(true)` for a view, `Some(false)` for a base table, `None` when
/// nothing named `table` exists.
pub async fn is_view(executor: &impl Executor, table: &str) -> DbResult<Option<bool>> {
    let stmt = scoped(
        executor,
        "SELECT TABLE_TYPE AS table_type FROM INFORMATION_SCHEMA.TABLES",
        table,
    );
    let rows = executor.run(&stmt).await?.rows;
    match rows.first() {
        Some(row) => Ok(Some(text(row, "table_type")?.eq_ignore_ascii_case("VIEW"))),
        None => Ok(None),
    }
}

/// Row count from the catalog (`TABLE_ROWS`).
///
/// For InnoDB this is the optimizer's estimate, not an exact count. Missing
/// tables and views report 0.
pub async fn row_count(executor: &impl Executor, table: &str) -> DbResult<u64> {
    let stmt = scoped(
        executor,
        "SELECT TABLE_ROWS AS table_rows FROM INFORMATION_SCHEMA.TABLES",
        table,
    );
    let rows = executor.run(&stmt).await?.rows;
    Ok(count(rows.first(), "table_rows"))
}

/// Name of the auto-increment column of `table`, if it has one.
pub async fn auto_increment_column(
    executor: &impl Executor,
    table: &str,
) -> DbResult<Option<String>> {
    let mut stmt = scoped(
        executor,
        "SELECT COLUMN_NAME AS column_name FROM INFORMATION_SCHEMA.COLUMNS",
        table,
    );
    stmt.push(" AND EXTRA LIKE '%auto_increment%'");

    let rows = executor.run(&stmt).await?.rows;
    rows.first().map(|row| text(row, "column_name")).transpose()
}

/// Columns, enums, foreign keys, kind and size of `table` in one value.
pub async fn describe(executor: &impl Executor, table: &str) -> DbResult<TableDescription> {
    let schema = properties(executor, table).await?;
    let foreign_keys = foreign_keys(executor, table).await?;
    let is_view = is_view(executor, table).await?.unwrap_or(false);
    let row_count = row_count(executor, table).await?;

    let enums = schema
        .columns
        .iter()
        .filter_map(|c| {
            let values = c.enum_values();
            (!values.is_empty()).then(|| (c.name.clone(), values))
        })
        .collect();

    Ok(TableDescription {
        schema,
        enums,
        foreign_keys,
        is_view,
        row_count,
    })
}
