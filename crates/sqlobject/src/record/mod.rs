//! Active-record style access to one table.
//!
//! A [`SqlObject`] binds a table, loads its schema on first use and keeps the
//! current row set in a [`RecordState`]. Each operation builds one statement
//! from that state, runs it and folds the response back in.
//!
//! ```ignore
//! use sqlobject::{RecordConfig, SqlObject, row};
//!
//! let mut widget = SqlObject::new(&db, RecordConfig::new("widgets"))?;
//! widget.read_or_create(row! { "name" => "a" }).await?;
//! println!("{:?}", widget.state().datum());
//! ```
//!
//! Operations take `&mut self`; one object cannot be driven from two tasks at
//! once. `read_or_create` is not atomic: two callers can both miss and both
//! insert unless the table has a unique constraint.

mod state;

#[cfg(test)]
mod tests;

pub use state::{LastOperation, RecordState};

use crate::builder::{
    DEFAULT_KEY, INTERNAL_PREFIX, SelectOptions, build_delete_by, build_insert, build_select,
    build_update,
};
use crate::error::{DbError, DbResult};
use crate::executor::{Executor, Response, run_with_retry};
use crate::ident::Ident;
use crate::schema::{self, TableSchema};
use crate::statement::Statement;
use crate::value::{Row, RowSet, Value};

/// Result of a read. An empty result is an outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    Found(RowSet),
    NotFound,
}

impl ReadOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, ReadOutcome::Found(_))
    }

    pub fn rows(&self) -> &[Row] {
        match self {
            ReadOutcome::Found(rows) => rows,
            ReadOutcome::NotFound => &[],
        }
    }
}

/// Result of a create, update or destroy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The statement ran.
    Applied { rows_affected: u64 },
    /// There was nothing to write, so no statement was sent.
    NothingToDo,
}

impl WriteOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, WriteOutcome::Applied { .. })
    }
}

/// Construction parameters for [`SqlObject`].
#[derive(Debug, Clone)]
pub struct RecordConfig {
    pub table: String,
    /// Key column; `guid` unless set.
    pub key: String,
    pub id: Option<Value>,
    pub data: RowSet,
    pub datum: Option<Row>,
    /// Operate on the whole table: no id filter on SELECT and UPDATE.
    pub all: bool,
    /// Attempts per statement; 1 means no retry.
    pub retries: u32,
}

impl RecordConfig {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key: DEFAULT_KEY.to_string(),
            id: None,
            data: RowSet::new(),
            datum: None,
            all: false,
            retries: 1,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn data(mut self, data: RowSet) -> Self {
        self.data = data;
        self
    }

    pub fn datum(mut self, datum: Row) -> Self {
        self.datum = Some(datum);
        self
    }

    pub fn all(mut self, all: bool) -> Self {
        self.all = all;
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }
}

/// A table-bound record object over an [`Executor`].
///
/// `E` is usually `&MySqlExecutor` or `Arc<MySqlExecutor>`.
pub struct SqlObject<E> {
    executor: E,
    /// Bare table name for catalog lookups.
    catalog_name: String,
    retries: u32,
    state: RecordState,
}

impl<E: Executor> SqlObject<E> {
    /// Bind a record object to `config.table`.
    ///
    /// Fails with [`DbError::Validation`] if the table or key is not a valid
    /// identifier. No query is sent until the first operation.
    pub fn new(executor: E, config: RecordConfig) -> DbResult<Self> {
        let table = Ident::parse(&config.table)?;
        let key = Ident::parse(&config.key)?;

        let mut state = RecordState::new(table.to_sql().to_string(), key.name().to_string());
        state.set_data(config.data);
        if let Some(datum) = config.datum {
            state.set_datum(datum);
        }
        if let Some(id) = config.id {
            state.set_id(id);
        }
        state.set_all(config.all);

        Ok(Self {
            executor,
            catalog_name: table.name().to_string(),
            retries: config.retries,
            state,
        })
    }

    pub fn state(&self) -> &RecordState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RecordState {
        &mut self.state
    }

    pub fn into_state(self) -> RecordState {
        self.state
    }

    /// Load the table schema if it is not loaded yet, and return it.
    pub async fn initialize(&mut self) -> DbResult<&TableSchema> {
        if !self.state.is_initialized() {
            let loaded = schema::properties(&self.executor, &self.catalog_name).await?;
            tracing::debug!(
                target: "sqlobject.record",
                table = %self.state.table(),
                columns = loaded.columns.len(),
                "schema loaded"
            );
            self.state.set_schema(loaded);
        }
        self.state.schema().ok_or_else(|| {
            DbError::schema(&self.catalog_name, DbError::Other("schema not loaded".into()))
        })
    }

    /// Insert the schema-known entries of `fields` and read the new row back.
    ///
    /// With `safe = false` the recorded statement text is not escaped; the
    /// values are bound either way. Any earlier id is dropped: the new one
    /// comes from the insert id or from `fields[key]`, and without either
    /// the row is read back by the written columns.
    pub async fn create(&mut self, fields: Row, safe: bool) -> DbResult<WriteOutcome> {
        Ok(match self.insert(fields, safe).await? {
            Some((rows_affected, _)) => WriteOutcome::Applied { rows_affected },
            None => WriteOutcome::NothingToDo,
        })
    }

    /// Read the row(s) selected by the current id, or every row when `all`
    /// is set. Conditions in `options` replace the id filter.
    ///
    /// On [`ReadOutcome::NotFound`] only the last operation is updated.
    pub async fn read(&mut self, options: SelectOptions) -> DbResult<ReadOutcome> {
        let schema = self.initialize().await?.clone();
        let stmt = build_select(
            self.state.table(),
            &schema,
            self.state.id(),
            self.state.key(),
            self.state.all(),
            &options,
        );
        let response = self.run(&stmt).await?;
        let rows = response.rows.clone();
        self.state.record(stmt.to_inline_sql(), response);

        if rows.is_empty() {
            tracing::debug!(target: "sqlobject.record", table = %self.state.table(), "read found nothing");
            return Ok(ReadOutcome::NotFound);
        }
        tracing::debug!(
            target: "sqlobject.record",
            table = %self.state.table(),
            rows = rows.len(),
            "read"
        );
        self.state.set_data(rows.clone());
        self.state.mark_read();
        Ok(ReadOutcome::Found(rows))
    }

    /// Write the settable entries of `fields` to the current row (or every
    /// row when `all` is set).
    ///
    /// Reads first if nothing was read yet. Afterwards the datum is the
    /// written fields; it is not re-read, so columns the server computes may
    /// be stale.
    pub async fn update(&mut self, fields: Row) -> DbResult<WriteOutcome> {
        if fields.is_empty() {
            return Ok(WriteOutcome::NothingToDo);
        }
        let schema = self.initialize().await?.clone();
        if !self.state.is_read() {
            self.read(SelectOptions::new()).await?;
        }

        let fields = schema.filter_row(&fields);
        let Some(stmt) = build_update(
            self.state.table(),
            &fields,
            &schema,
            self.state.id(),
            self.state.key(),
            self.state.all(),
        ) else {
            return Ok(WriteOutcome::NothingToDo);
        };

        let response = self.run(&stmt).await?;
        let rows_affected = response.rows_affected;
        self.state.record(stmt.to_inline_sql(), response);

        // Pin the id before the datum is replaced by fields that may lack the key.
        if let Some(id) = self.state.id().cloned() {
            self.state.set_id(id);
        }
        self.state.set_datum(fields);

        tracing::debug!(target: "sqlobject.record", table = %self.state.table(), rows_affected, "updated");
        Ok(WriteOutcome::Applied { rows_affected })
    }

    /// Delete the current row by the object's key column.
    pub async fn destroy(&mut self) -> DbResult<WriteOutcome> {
        self.initialize().await?;
        let Some(id) = self.state.id().cloned() else {
            return Ok(WriteOutcome::NothingToDo);
        };

        let stmt = build_delete_by(self.state.table(), self.state.key(), &id);
        let response = self.run(&stmt).await?;
        let rows_affected = response.rows_affected;
        self.state.record(stmt.to_inline_sql(), response);

        tracing::debug!(target: "sqlobject.record", table = %self.state.table(), rows_affected, "destroyed");
        Ok(WriteOutcome::Applied { rows_affected })
    }

    /// Read the current row; if there is none, create it from `fields` and
    /// read it back.
    ///
    /// Without an id the lookup matches on the schema-known entries of
    /// `fields` instead.
    pub async fn read_or_create(&mut self, fields: Row) -> DbResult<ReadOutcome> {
        let schema = self.initialize().await?.clone();

        let options = if self.state.id().is_some() || self.state.all() {
            SelectOptions::new()
        } else {
            schema
                .filter_row(&fields)
                .into_iter()
                .filter(|(_, v)| !v.is_unset())
                .fold(SelectOptions::new(), |opts, (k, v)| opts.filter(k, v))
        };

        match self.read(options).await? {
            found @ ReadOutcome::Found(_) => Ok(found),
            ReadOutcome::NotFound => {
                tracing::debug!(target: "sqlobject.record", table = %self.state.table(), "not found, creating");
                Ok(match self.insert(fields, true).await? {
                    Some((_, outcome)) => outcome,
                    None => ReadOutcome::NotFound,
                })
            }
        }
    }

    /// INSERT then re-read. `None` when there was nothing to insert.
    async fn insert(&mut self, fields: Row, safe: bool) -> DbResult<Option<(u64, ReadOutcome)>> {
        let schema = self.initialize().await?.clone();
        let fields = schema.filter_row(&fields);
        self.state.clear_id();
        self.state.set_data(vec![fields.clone()]);

        let Some(stmt) = build_insert(self.state.table(), &fields, &schema, safe) else {
            tracing::debug!(target: "sqlobject.record", table = %self.state.table(), "nothing to insert");
            return Ok(None);
        };

        let response = self.run(&stmt).await?;
        let rows_affected = response.rows_affected;

        match (schema.auto_increment_column(), response.last_insert_id) {
            (Some(column), Some(id)) => {
                self.state.set_key(column.to_string());
                self.state.set_id(id);
            }
            _ => {
                if let Some(id) = fields.get(self.state.key()).cloned() {
                    self.state.set_id(id);
                }
            }
        }
        tracing::debug!(
            target: "sqlobject.record",
            table = %self.state.table(),
            key = %self.state.key(),
            id = ?self.state.id(),
            "created"
        );
        self.state.record(stmt.to_inline_sql(), response);

        let options = if self.state.id().is_some() {
            SelectOptions::new()
        } else {
            fields
                .into_iter()
                .filter(|(k, v)| !k.starts_with(INTERNAL_PREFIX) && v.is_truthy())
                .fold(SelectOptions::new(), |opts, (k, v)| opts.filter(k, v))
        };
        let all = self.state.all();
        self.state.set_all(false);
        let reread = self.read(options).await;
        self.state.set_all(all);

        Ok(Some((rows_affected, reread?)))
    }

    async fn run(&self, statement: &Statement) -> DbResult<Response> {
        if self.retries > 1 {
            run_with_retry(&self.executor, statement, self.retries).await
        } else {
            self.executor.run(statement).await
        }
    }
}
