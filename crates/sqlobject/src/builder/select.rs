use crate::ident::quote;
use crate::schema::TableSchema;
use crate::statement::Statement;
use crate::value::{Row, Value};
use serde::Serialize;

/// `DATE_FORMAT` pattern for the extra projection of date-like columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%i:%s";

/// Page size used by [`Pagination::default`].
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// `LIMIT` / `OFFSET` pair for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub limit: u64,
    pub offset: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        build_pagination(1, DEFAULT_PAGE_SIZE)
    }
}

/// Page `page` (1-based; 0 is treated as 1) of `page_size` rows.
pub fn build_pagination(page: u64, page_size: u64) -> Pagination {
    Pagination {
        limit: page_size,
        offset: page.max(1).saturating_sub(1).saturating_mul(page_size),
    }
}

/// Optional clauses for [`build_select`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectOptions {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Raw `ORDER BY` body, written verbatim.
    pub order_by: Option<String>,
    /// Raw `GROUP BY` body, written verbatim.
    pub group_by: Option<String>,
    /// Raw conditions, ANDed verbatim.
    ///
    /// These are caller-authored SQL and are **not** escaped or bound. Never
    /// build them from untrusted input; use [`SelectOptions::filter`] instead.
    pub where_clauses: Vec<String>,
    /// Bound `column = value` conditions, ANDed.
    pub filter: Row,
}

impl SelectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Apply a [`Pagination`] (sets both limit and offset).
    pub fn paginate(self, page: Pagination) -> Self {
        self.limit(page.limit).offset(page.offset)
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn group_by(mut self, group_by: impl Into<String>) -> Self {
        self.group_by = Some(group_by.into());
        self
    }

    /// Add a raw condition. See the warning on [`SelectOptions::where_clauses`].
    pub fn where_raw(mut self, condition: impl Into<String>) -> Self {
        self.where_clauses.push(condition.into());
        self
    }

    /// Add a bound `column = value` condition.
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.insert(column.into(), value.into());
        self
    }

    fn has_conditions(&self) -> bool {
        !self.where_clauses.is_empty() || !self.filter.is_empty()
    }
}

/// Build a `SELECT` over `table`.
///
/// The row filter is, in order of precedence:
/// - the conditions in `options` (raw and bound, ANDed), when any are given;
/// - nothing, when `all` is set;
/// - `key = id` otherwise (a missing `id` binds `NULL` and matches no row).
///
/// Every date, datetime and timestamp column of `schema` is also projected
/// through `DATE_FORMAT` as `<column>_formatted`.
pub fn build_select(
    table: &str,
    schema: &TableSchema,
    id: Option<&Value>,
    key: &str,
    all: bool,
    options: &SelectOptions,
) -> Statement {
    let mut projection = String::from("*");
    for column in schema.temporal_columns() {
        projection.push_str(&format!(
            ", DATE_FORMAT({}, '{DATE_FORMAT}') AS {}",
            quote(&column.name),
            quote(&format!("{}_formatted", column.name))
        ));
    }

    let mut stmt = Statement::new(format!("SELECT {projection} FROM {table}"));

    if options.has_conditions() {
        stmt.push(" WHERE ");
        let mut first = true;
        for clause in &options.where_clauses {
            if !first {
                stmt.push(" AND ");
            }
            stmt.push(clause);
            first = false;
        }
        for (column, value) in &options.filter {
            if !first {
                stmt.push(" AND ");
            }
            stmt.push(&quote(column)).push(" = ").push_bind(value.clone());
            first = false;
        }
    } else if !all {
        stmt.push(&format!(" WHERE {} = ", quote(key)))
            .push_bind(id.cloned().unwrap_or(Value::Null));
    }

    if let Some(group_by) = &options.group_by {
        stmt.push(" GROUP BY ").push(group_by);
    }
    if let Some(order_by) = &options.order_by {
        stmt.push(" ORDER BY ").push(order_by);
    }
    if let Some(limit) = options.limit {
        stmt.push(&format!(" LIMIT {limit}"));
    }
    if let Some(offset) = options.offset {
        // MySQL has no OFFSET without LIMIT; this is its documented "all rows" bound.
        if options.limit.is_none() {
            stmt.push(&format!(" LIMIT {}", u64::MAX));
        }
        stmt.push(&format!(" OFFSET {offset}"));
    }
    stmt
}
