//! String escaping for inline SQL literals.
//!
//! This is the text form only. Statements sent to the server bind their
//! values as parameters; escaping is not a substitute for that.

/// Escape a value for interpolation into a double-quoted MySQL literal.
///
/// `\` → `\\`, `'` → `\'`, `"` → `\"`, NUL → `\0`.
///
/// Not idempotent: escaping an already escaped string escapes the
/// backslashes again.
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out
}
