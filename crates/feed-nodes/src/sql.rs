//! SQL string generation
//!
//! Builds INSERT/UPDATE statement strings from JSON values, with literal
//! escaping suitable for MySQL-style string syntax. Pure formatting: no
//! connection handling, no execution. Item transforms call these to
//! produce statements the workflow host runs against its database node.

use serde_json::Value;

/// Escape a string for embedding in a single-quoted SQL literal.
///
/// Doubles single quotes and escapes backslashes; control characters NUL,
/// newline, carriage return, and ctrl-Z get their escaped forms.
pub fn escape_literal(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{1a}' => out.push_str("\\Z"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render a JSON value as a SQL literal.
///
/// Strings are quoted and escaped, numbers and booleans pass through,
/// null becomes NULL, and structured values are serialized to a quoted
/// JSON string.
pub fn literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", escape_literal(s)),
        other => format!("'{}'", escape_literal(&other.to_string())),
    }
}

/// Build an INSERT statement for one row.
pub fn insert_statement(table: &str, columns: &[(&str, &Value)]) -> String {
    let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    let values: Vec<String> = columns.iter().map(|(_, value)| literal(value)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({});",
        table,
        names.join(", "),
        values.join(", ")
    )
}

/// Build an UPDATE statement for one row, keyed by a single column.
pub fn update_statement(
    table: &str,
    assignments: &[(&str, &Value)],
    key_column: &str,
    key_value: &Value,
) -> String {
    let sets: Vec<String> = assignments
        .iter()
        .map(|(name, value)| format!("{} = {}", name, literal(value)))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE {} = {};",
        table,
        sets.join(", "),
        key_column,
        literal(key_value)
    )
}
