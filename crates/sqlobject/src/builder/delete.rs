use super::DEFAULT_KEY;
use crate::ident::quote;
use crate::statement::Statement;
use crate::value::Value;

/// Build `DELETE FROM <table> WHERE guid = <id>`.
///
/// The filter column is always `guid`. Use [`build_delete_by`] for tables
/// keyed on anything else.
pub fn build_delete(table: &str, id: &Value) -> Statement {
    build_delete_by(table, DEFAULT_KEY, id)
}

/// Build `DELETE FROM <table> WHERE <key> = <id>`, with `key` backtick-quoted.
pub fn build_delete_by(table: &str, key: &str, id: &Value) -> Statement {
    let mut stmt = Statement::new(format!("DELETE FROM {table} WHERE {} = ", quote(key)));
    stmt.push_bind(id.clone());
    stmt
}
