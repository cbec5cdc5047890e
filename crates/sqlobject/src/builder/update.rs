use crate::ident::quote;
use crate::schema::TableSchema;
use crate::statement::Statement;
use crate::value::{Row, Value};

/// Build an `UPDATE` setting every schema-known entry of `row` that is not
/// `NULL`, `"null"` or `"undefined"`.
///
/// Column names and `key` are backtick-quoted. Unless `all` is set the
/// statement is restricted to `key = id`; a missing `id` binds `NULL`, which
/// matches no row. Returns `None` when there is nothing to set.
pub fn build_update(
    table: &str,
    row: &Row,
    schema: &TableSchema,
    id: Option<&Value>,
    key: &str,
    all: bool,
) -> Option<Statement> {
    let assignments: Vec<(&String, &Value)> = row
        .iter()
        .filter(|(k, v)| schema.contains(k) && !v.is_unset())
        .collect();
    if assignments.is_empty() {
        return None;
    }

    let mut stmt = Statement::new(format!("UPDATE {table} SET "));
    for (i, (column, value)) in assignments.into_iter().enumerate() {
        if i > 0 {
            stmt.push(", ");
        }
        stmt.push(&quote(column)).push(" = ").push_bind(value.clone());
    }

    if !all {
        stmt.push(&format!(" WHERE {} = ", quote(key)))
            .push_bind(id.cloned().unwrap_or(Value::Null));
    }
    Some(stmt)
}
