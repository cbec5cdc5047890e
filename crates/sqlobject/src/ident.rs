//! Table and column names.
//!
//! MySQL cannot bind identifiers, so names that reach SQL text are checked
//! here first. A name is one segment or two (`shop.widgets`). A segment is
//! either plain, `[A-Za-z_][A-Za-z0-9_$]*`, or wrapped in backticks, where a
//! literal backtick is written twice.
//!
//! # Example
//! ```ignore
//! use sqlobject::Ident;
//!
//! let t = Ident::parse("shop.widgets")?;
//! assert_eq!(t.name(), "widgets");
//! let c = Ident::parse("`order`")?;
//! assert_eq!(c.name(), "order");
//! # Ok::<(), sqlobject::DbError>(())
//! ```

use crate::error::{DbError, DbResult};

/// A checked table or column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    qualifier: Option<String>,
    name: String,
    sql: String,
}

impl Ident {
    /// Check `s` and split off an optional schema qualifier.
    pub fn parse(s: &str) -> DbResult<Self> {
        let (first, rest) = segment(s, s)?;
        let (qualifier, name) = match rest {
            "" => (None, first),
            _ => {
                let Some(after_dot) = rest.strip_prefix('.') else {
                    return Err(DbError::validation(format!(
                        "unexpected {rest:?} after a name in {s:?}"
                    )));
                };
                let (second, tail) = segment(after_dot, s)?;
                if !tail.is_empty() {
                    return Err(DbError::validation(format!(
                        "{s:?} has more than two dotted parts"
                    )));
                }
                (Some(first), second)
            }
        };
        Ok(Self {
            qualifier,
            name,
            sql: s.to_string(),
        })
    }

    /// The bare table or column name, backticks removed.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The schema part of `schema.table`, if one was given.
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// The name as it was written, ready to splice into SQL.
    pub fn to_sql(&self) -> &str {
        &self.sql
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Read one segment off the front of `input`. Returns the unquoted segment
/// and whatever follows it.
fn segment<'a>(input: &'a str, whole: &str) -> DbResult<(String, &'a str)> {
    if let Some(body) = input.strip_prefix('`') {
        let mut name = String::new();
        let mut chars = body.char_indices().peekable();
        while let Some((at, c)) = chars.next() {
            match c {
                '`' if matches!(chars.peek(), Some((_, '`'))) => {
                    chars.next();
                    name.push('`');
                }
                '`' if name.is_empty() => {
                    return Err(DbError::validation(format!("empty `` name in {whole:?}")));
                }
                '`' => return Ok((name, &body[at + 1..])),
                '\0' => {
                    return Err(DbError::validation(format!("NUL byte in name {whole:?}")));
                }
                c => name.push(c),
            }
        }
        return Err(DbError::validation(format!(
            "missing closing backtick in {whole:?}"
        )));
    }

    let end = input.find('.').unwrap_or(input.len());
    let (plain, rest) = input.split_at(end);
    let mut chars = plain.chars();
    match chars.next() {
        None => {
            return Err(DbError::validation(format!(
                "table or column name is empty in {whole:?}"
            )));
        }
        Some(c) if !(c == '_' || c.is_ascii_alphabetic()) => {
            return Err(DbError::validation(format!(
                "name {whole:?} cannot start with {c:?}"
            )));
        }
        Some(_) => {}
    }
    if let Some(c) = chars.find(|&c| !(c == '_' || c == '$' || c.is_ascii_alphanumeric())) {
        return Err(DbError::validation(format!(
            "invalid character {c:?} in name {whole:?}"
        )));
    }
    Ok((plain.to_string(), rest))
}

/// Backtick-quote a single column name, doubling embedded backticks.
pub fn quote(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('`');
    for ch in name.chars() {
        if ch == '`' {
            out.push('`');
        }
        out.push(ch);
    }
    out.push('`');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_name() {
        let ident = Ident::parse("widgets").unwrap();
        assert_eq!(ident.to_sql(), "widgets");
        assert_eq!(ident.name(), "widgets");
        assert_eq!(ident.qualifier(), None);
    }

    #[test]
    fn schema_qualified_name() {
        let ident = Ident::parse("shop.widgets").unwrap();
        assert_eq!(ident.to_sql(), "shop.widgets");
        assert_eq!(ident.name(), "widgets");
        assert_eq!(ident.qualifier(), Some("shop"));
    }

    #[test]
    fn backticked_name_is_unwrapped() {
        let ident = Ident::parse("`order`").unwrap();
        assert_eq!(ident.to_sql(), "`order`");
        assert_eq!(ident.name(), "order");

        let mixed = Ident::parse("shop.`key`").unwrap();
        assert_eq!(mixed.qualifier(), Some("shop"));
        assert_eq!(mixed.name(), "key");
    }

    #[test]
    fn doubled_backtick_is_a_literal() {
        let ident = Ident::parse("`odd``name`").unwrap();
        assert_eq!(ident.name(), "odd`name");
        assert_eq!(ident.to_sql(), "`odd``name`");
    }

    #[test]
    fn dollar_allowed_after_first_char() {
        assert_eq!(Ident::parse("col$1").unwrap().name(), "col$1");
        assert!(Ident::parse("$col").is_err());
    }

    #[test]
    fn rejects_injection() {
        assert!(Ident::parse("widgets; DROP TABLE widgets").is_err());
        assert!(Ident::parse("guid = guid OR 1").is_err());
        assert!(Ident::parse("`a`; DROP TABLE b").is_err());
    }

    #[test]
    fn rejects_malformed() {
        for bad in [
            "",
            "1table",
            "shop..widgets",
            "shop.",
            ".widgets",
            "a.b.c",
            "`unclosed",
            "``",
            "`a\0b`",
        ] {
            assert!(Ident::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn errors_name_the_input() {
        let err = Ident::parse("wid-gets").unwrap_err().to_string();
        assert!(err.contains("'-'"), "{err}");
        assert!(err.contains("wid-gets"), "{err}");
    }

    #[test]
    fn quote_doubles_backticks() {
        assert_eq!(quote("name"), "`name`");
        assert_eq!(quote("a`b"), "`a``b`");
    }
}
