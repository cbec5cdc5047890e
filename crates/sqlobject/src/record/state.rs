use crate::executor::Response;
use crate::schema::TableSchema;
use crate::value::{Row, RowSet, Value};
use serde::Serialize;

/// The most recent statement a record object ran, and what came back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastOperation {
    /// Inline (literal) text of the statement.
    pub query: String,
    pub response: Response,
}

/// In-memory state of a [`super::SqlObject`].
///
/// Derived values are computed by accessors rather than kept in sync by hand:
/// - [`RecordState::datum`] is the override set by [`RecordState::set_datum`]
///   if any, else the first row of [`RecordState::data`].
/// - [`RecordState::id`] is `datum()[key]` when present and non-null, else the
///   identifier set with [`RecordState::set_id`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordState {
    table: String,
    key: String,
    data: RowSet,
    datum: Option<Row>,
    id: Option<Value>,
    all: bool,
    schema: Option<TableSchema>,
    read: bool,
    last_operation: Option<LastOperation>,
}

impl RecordState {
    pub(crate) fn new(table: String, key: String) -> Self {
        Self {
            table,
            key,
            data: RowSet::new(),
            datum: None,
            id: None,
            all: false,
            schema: None,
            read: false,
            last_operation: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn data(&self) -> &RowSet {
        &self.data
    }

    pub fn datum(&self) -> Option<&Row> {
        self.datum.as_ref().or_else(|| self.data.first())
    }

    pub fn id(&self) -> Option<&Value> {
        self.datum()
            .and_then(|row| row.get(&self.key))
            .filter(|v| !v.is_null())
            .or(self.id.as_ref())
    }

    pub fn all(&self) -> bool {
        self.all
    }

    /// The loaded table schema; `None` until the first operation ran.
    pub fn schema(&self) -> Option<&TableSchema> {
        self.schema.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.schema.is_some()
    }

    /// Whether a read has populated [`RecordState::data`] from storage.
    pub fn is_read(&self) -> bool {
        self.read
    }

    pub fn last_operation(&self) -> Option<&LastOperation> {
        self.last_operation.as_ref()
    }

    /// Replace the row set. Clears any datum override.
    pub fn set_data(&mut self, data: RowSet) {
        self.data = data;
        self.datum = None;
    }

    /// Override the current row without touching [`RecordState::data`].
    pub fn set_datum(&mut self, datum: Row) {
        self.datum = Some(datum);
    }

    pub fn set_id(&mut self, id: impl Into<Value>) {
        self.id = Some(id.into()).filter(|v| !v.is_null());
    }

    pub fn set_all(&mut self, all: bool) {
        self.all = all;
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }

    pub(crate) fn set_key(&mut self, key: String) {
        self.key = key;
    }

    pub(crate) fn set_schema(&mut self, schema: TableSchema) {
        self.schema = Some(schema);
    }

    pub(crate) fn mark_read(&mut self) {
        self.read = true;
    }

    pub(crate) fn record(&mut self, query: String, response: Response) {
        self.last_operation = Some(LastOperation { query, response });
    }
}
