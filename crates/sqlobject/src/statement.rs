//! SQL statements as raw text interleaved with bound values.
//!
//! A [`Statement`] renders two ways:
//! - [`Statement::to_sql`] with `?` placeholders, sent to the server together
//!   with [`Statement::params`]. This is what the executor uses.
//! - [`Statement::to_inline_sql`] with every value written as a double-quoted,
//!   escaped literal. This is for logs and the record object's last-operation
//!   record; it is never executed.

use crate::escape::escape_value;
use crate::value::Value;

/// The kind of SQL statement, detected from its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl StatementKind {
    /// Detect the statement kind from SQL text.
    pub fn from_sql(sql: &str) -> Self {
        let trimmed = strip_sql_prefix(sql);
        const ROW_KEYWORDS: [&str; 5] = ["SELECT", "SHOW", "DESCRIBE", "EXPLAIN", "WITH"];
        if ROW_KEYWORDS.iter().any(|kw| starts_with_keyword(trimmed, kw)) {
            StatementKind::Select
        } else if starts_with_keyword(trimmed, "INSERT") || starts_with_keyword(trimmed, "REPLACE") {
            StatementKind::Insert
        } else if starts_with_keyword(trimmed, "UPDATE") {
            StatementKind::Update
        } else if starts_with_keyword(trimmed, "DELETE") {
            StatementKind::Delete
        } else {
            StatementKind::Other
        }
    }

    /// Whether the server answers this kind with a result set.
    pub fn returns_rows(self) -> bool {
        matches!(self, StatementKind::Select)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Raw(String),
    Param(Value),
}

/// A SQL statement built from raw fragments and bound values.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Statement {
    kind: StatementKind,
    parts: Vec<Part>,
    escape_inline: bool,
    terminated: bool,
}

impl Statement {
    /// Start a statement with an initial raw SQL fragment.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        let initial_sql = initial_sql.into();
        Self {
            kind: StatementKind::from_sql(&initial_sql),
            parts: vec![Part::Raw(initial_sql)],
            escape_inline: true,
            terminated: false,
        }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Write inline literals unescaped. Only [`Statement::to_inline_sql`] is
    /// affected; bound parameters stay safe.
    pub fn unescaped_inline(mut self) -> Self {
        self.escape_inline = false;
        self
    }

    /// End the inline form with `;`. The placeholder form sent to the
    /// server is left unterminated.
    pub fn terminated(mut self) -> Self {
        self.terminated = true;
        self
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }
        match self.parts.last_mut() {
            Some(Part::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(Part::Raw(sql.to_string())),
        }
        self
    }

    /// Append a placeholder and bind its value.
    pub fn push_bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.parts.push(Part::Param(value.into()));
        self
    }

    /// Append another statement fragment, consuming it.
    pub fn push_statement(&mut self, other: Statement) -> &mut Self {
        for part in other.parts {
            match part {
                Part::Raw(s) => {
                    self.push(&s);
                }
                Part::Param(v) => {
                    self.parts.push(Part::Param(v));
                }
            }
        }
        self
    }

    /// Render SQL with `?` placeholders.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Raw(s) => out.push_str(s),
                Part::Param(_) => out.push('?'),
            }
        }
        out
    }

    /// Render SQL with values inlined as `"..."` literals (`NULL` stays bare).
    pub fn to_inline_sql(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Raw(s) => out.push_str(s),
                Part::Param(Value::Null) => out.push_str("NULL"),
                Part::Param(v) => {
                    let text = v.to_string();
                    out.push('"');
                    if self.escape_inline {
                        out.push_str(&escape_value(&text));
                    } else {
                        out.push_str(&text);
                    }
                    out.push('"');
                }
            }
        }
        if self.terminated {
            out.push(';');
        }
        out
    }

    /// Bound values in placeholder order.
    pub fn params(&self) -> impl Iterator<Item = &Value> {
        self.parts.iter().filter_map(|p| match p {
            Part::Param(v) => Some(v),
            Part::Raw(_) => None,
        })
    }

    pub fn param_count(&self) -> usize {
        self.params().count()
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_inline_sql())
    }
}

/// Strip leading whitespace, SQL comments (`--`, `#` and `/* */`) and
/// parentheses to find the first meaningful keyword.
fn strip_sql_prefix(sql: &str) -> &str {
    let mut s = sql;
    loop {
        let before = s;
        s = s.trim_start();
        if s.starts_with("--") || s.starts_with('#') {
            match s.find('\n') {
                Some(pos) => {
                    s = &s[pos + 1..];
                    continue;
                }
                None => return "",
            }
        }
        if s.starts_with("/*") {
            match s.find("*/") {
                Some(pos) => {
                    s = &s[pos + 2..];
                    continue;
                }
                None => return "",
            }
        }
        if let Some(rest) = s.strip_prefix('(') {
            s = rest;
            continue;
        }
        if s == before {
            break;
        }
    }
    s
}

fn starts_with_keyword(s: &str, keyword: &str) -> bool {
    match s.get(0..keyword.len()) {
        Some(prefix) => prefix.eq_ignore_ascii_case(keyword),
        None => false,
    }
}
