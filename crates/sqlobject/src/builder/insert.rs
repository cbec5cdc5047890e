use crate::ident::quote;
use crate::schema::TableSchema;
use crate::statement::Statement;
use crate::value::{Row, Value};

/// Columns whose name starts with this prefix are never written.
pub const INTERNAL_PREFIX: &str = "_";

/// Build an `INSERT` for the truthy, schema-known, non-internal entries of `row`.
///
/// Returns `None` when no such entry exists. With `safe = false` the inline
/// text form is written without escaping; the bound form is unaffected.
pub fn build_insert(
    table: &str,
    row: &Row,
    schema: &TableSchema,
    safe: bool,
) -> Option<Statement> {
    let columns: Vec<(&String, &Value)> = row
        .iter()
        .filter(|(k, v)| !k.starts_with(INTERNAL_PREFIX) && schema.contains(k) && v.is_truthy())
        .collect();
    if columns.is_empty() {
        return None;
    }

    let names = columns
        .iter()
        .map(|(k, _)| quote(k))
        .collect::<Vec<_>>()
        .join(",");

    let mut stmt = Statement::new(format!("INSERT INTO {table} ({names}) VALUES ("));
    for (i, (_, value)) in columns.iter().enumerate() {
        if i > 0 {
            stmt.push(",");
        }
        stmt.push_bind((*value).clone());
    }
    stmt.push(")");

    let stmt = stmt.terminated();
    Some(if safe { stmt } else { stmt.unescaped_inline() })
}
