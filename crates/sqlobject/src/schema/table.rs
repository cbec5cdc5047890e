use crate::value::Row;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One column as reported by `INFORMATION_SCHEMA.COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    /// Bare type name, e.g. `varchar`, `int`, `datetime`.
    pub data_type: String,
    /// Full declaration, e.g. `varchar(255)`, `enum('a','b')`.
    pub column_type: String,
    pub auto_increment: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        let data_type = data_type.into();
        Self {
            name: name.into(),
            column_type: data_type.clone(),
            data_type,
            auto_increment: false,
        }
    }

    pub fn column_type(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = column_type.into();
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Date-like columns get an extra formatted projection in SELECTs.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self.data_type.to_ascii_lowercase().as_str(),
            "date" | "datetime" | "timestamp"
        )
    }

    /// Members of an `enum(...)` column; empty for any other type.
    pub fn enum_values(&self) -> Vec<String> {
        parse_enum_values(&self.column_type)
    }
}

/// The column layout of one table, in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    pub fn new(table: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            table: table.into(),
            columns,
        }
    }

    /// Build a schema from `(column, data_type)` pairs.
    pub fn from_types<'a>(
        table: impl Into<String>,
        types: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let columns = types
            .into_iter()
            .map(|(name, data_type)| ColumnDef::new(name, data_type))
            .collect();
        Self::new(table, columns)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn data_type(&self, name: &str) -> Option<&str> {
        self.column(name).map(|c| c.data_type.as_str())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column name → declared data type.
    pub fn properties(&self) -> BTreeMap<String, String> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.data_type.clone()))
            .collect()
    }

    pub fn auto_increment_column(&self) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.auto_increment)
            .map(|c| c.name.as_str())
    }

    pub fn temporal_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.is_temporal())
    }

    /// Keep only the entries of `row` that name a column of this table.
    pub fn filter_row(&self, row: &Row) -> Row {
        row.iter()
            .filter(|(k, _)| self.contains(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// A foreign-key column and the column it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub constraint_name: String,
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// Parse `enum('a','b',...)` into its members.
///
/// Handles `''` and `\'` inside members. Anything that is not an enum
/// declaration yields an empty list.
pub fn parse_enum_values(column_type: &str) -> Vec<String> {
    let trimmed = column_type.trim();
    let Some(head) = trimmed.get(..5) else {
        return Vec::new();
    };
    if !head.eq_ignore_ascii_case("enum(") || !trimmed.ends_with(')') {
        return Vec::new();
    }
    let body = &trimmed[5..trimmed.len() - 1];

    let mut values = Vec::new();
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\'' {
            continue;
        }
        let mut value = String::new();
        loop {
            match chars.next() {
                Some('\\') => {
                    if let Some(escaped) = chars.next() {
                        value.push(escaped);
                    }
                }
                Some('\'') => {
                    if chars.peek() == Some(&'\'') {
                        chars.next();
                        value.push('\'');
                    } else {
                        break;
                    }
                }
                Some(ch) => value.push(ch),
                None => break,
            }
        }
        values.push(value);
    }
    values
}
