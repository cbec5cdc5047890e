use super::{Executor, Response, trace_statement};
use crate::config::DbConfig;
use crate::error::{DbError, DbResult};
use crate::pool::create_pool;
use crate::statement::{Statement, StatementKind};
use crate::value::{Row, RowSet, Value};
use async_trait::async_trait;
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, MySqlPool, Row as _, TypeInfo, ValueRef};

/// [`Executor`] backed by a shared MySQL connection pool.
///
/// Cloning is cheap; clones share the pool.
#[derive(Debug, Clone)]
pub struct MySqlExecutor {
    pool: MySqlPool,
    schema: String,
}

impl MySqlExecutor {
    /// Wrap an existing pool. `schema` scopes `INFORMATION_SCHEMA` lookups.
    pub fn new(pool: MySqlPool, schema: impl Into<String>) -> Self {
        Self {
            pool,
            schema: schema.into(),
        }
    }

    /// Create the pool described by `config` and wrap it.
    pub async fn connect(config: &DbConfig) -> DbResult<Self> {
        let pool = create_pool(config).await?;
        tracing::info!(
            target: "sqlobject.sql",
            host = %config.host,
            database = %config.database,
            max_connections = config.max_connections,
            "connection pool ready"
        );
        Ok(Self::new(pool, config.schema_name()))
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Run caller-authored SQL text as-is.
    pub async fn execute_raw(&self, sql: &str) -> DbResult<Response> {
        self.run(&Statement::new(sql)).await
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!(target: "sqlobject.sql", "connection pool closed");
    }
}

#[async_trait]
impl Executor for MySqlExecutor {
    fn schema_name(&self) -> &str {
        &self.schema
    }

    async fn run(&self, statement: &Statement) -> DbResult<Response> {
        trace_statement(statement);
        let sql = statement.to_sql();

        // Some statements (DDL, SET ...) are not allowed over the prepared protocol.
        if statement.kind() == StatementKind::Other && statement.param_count() == 0 {
            let done = sqlx::raw_sql(&sql).execute(&self.pool).await?;
            return Ok(Response::with_affected(done.rows_affected(), None));
        }

        let mut query = sqlx::query(&sql);
        for value in statement.params() {
            query = bind_value(query, value);
        }

        if statement.kind().returns_rows() {
            let rows = query.fetch_all(&self.pool).await?;
            let rows = rows.iter().map(decode_row).collect::<DbResult<RowSet>>()?;
            Ok(Response::with_rows(rows))
        } else {
            let done = query.execute(&self.pool).await?;
            let last_insert_id = Some(done.last_insert_id()).filter(|id| *id > 0);
            Ok(Response::with_affected(done.rows_affected(), last_insert_id))
        }
    }
}

fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &Value,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Int(n) => query.bind(*n),
        Value::UInt(n) => query.bind(*n),
        Value::Float(f) => query.bind(*f),
        Value::Text(s) => query.bind(s.clone()),
    }
}

fn decode_row(row: &MySqlRow) -> DbResult<Row> {
    let mut out = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = decode_value(row, idx, column.name())?;
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

fn decode_value(row: &MySqlRow, idx: usize, name: &str) -> DbResult<Value> {
    let type_name = {
        let raw = row
            .try_get_raw(idx)
            .map_err(|e| DbError::decode(name, e.to_string()))?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        raw.type_info().name().to_ascii_uppercase()
    };
    let err = |e: sqlx::Error| DbError::decode(name, e.to_string());

    let value = match type_name.as_str() {
        "BOOLEAN" => Value::Bool(row.try_get::<bool, _>(idx).map_err(err)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            Value::Int(row.try_get_unchecked::<i64, _>(idx).map_err(err)?)
        }
        t if t.ends_with("UNSIGNED") => {
            Value::UInt(row.try_get_unchecked::<u64, _>(idx).map_err(err)?)
        }
        "FLOAT" => Value::Float(f64::from(row.try_get::<f32, _>(idx).map_err(err)?)),
        "DOUBLE" => Value::Float(row.try_get::<f64, _>(idx).map_err(err)?),
        "DATETIME" | "TIMESTAMP" => {
            let dt = row.try_get::<chrono::NaiveDateTime, _>(idx).map_err(err)?;
            Value::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string())
        }
        "DATE" => {
            let d = row.try_get::<chrono::NaiveDate, _>(idx).map_err(err)?;
            Value::Text(d.format("%Y-%m-%d").to_string())
        }
        "TIME" => {
            let t = row.try_get::<chrono::NaiveTime, _>(idx).map_err(err)?;
            Value::Text(t.format("%H:%M:%S").to_string())
        }
        "JSON" => {
            let json = row.try_get::<serde_json::Value, _>(idx).map_err(err)?;
            Value::Text(json.to_string())
        }
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT"
        | "GEOMETRY" => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(idx).map_err(err)?;
            Value::Text(String::from_utf8_lossy(&bytes).into_owned())
        }
        // VARCHAR, CHAR, TEXT, ENUM, SET, DECIMAL, ... arrive as text.
        _ => match row.try_get_unchecked::<String, _>(idx) {
            Ok(s) => Value::Text(s),
            Err(_) => {
                let bytes = row.try_get_unchecked::<Vec<u8>, _>(idx).map_err(err)?;
                Value::Text(String::from_utf8_lossy(&bytes).into_owned())
            }
        },
    };
    Ok(value)
}
