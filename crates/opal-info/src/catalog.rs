//! Helpers for reading loosely-typed catalog rows.
//!
//! Drivers report catalog values with varying types (numbers as text,
//! flags as ints); these accessors normalize the common cases.

use opal_query::{Record, SqlValue};

/// String view of a record field, when present and non-null.
pub(crate) fn text(record: &Record, key: &str) -> Option<String> {
    match record.get(key)? {
        SqlValue::Text(s) | SqlValue::Decimal(s) => Some(s.clone()),
        SqlValue::Int(n) => Some(n.to_string()),
        SqlValue::Float(f) => Some(f.to_string()),
        SqlValue::Bool(b) => Some(String::from(if *b { "1" } else { "0" })),
        SqlValue::Null | SqlValue::Blob(_) | SqlValue::Array(_) => None,
    }
}

/// Integer view of a record field, when present and parseable.
pub(crate) fn int(record: &Record, key: &str) -> Option<i64> {
    match record.get(key)? {
        SqlValue::Int(n) => Some(*n),
        #[allow(clippy::cast_possible_truncation)]
        SqlValue::Float(f) => Some(*f as i64),
        SqlValue::Text(s) | SqlValue::Decimal(s) => s.trim().parse().ok(),
        SqlValue::Bool(b) => Some(i64::from(*b)),
        SqlValue::Null | SqlValue::Blob(_) | SqlValue::Array(_) => None,
    }
}

/// Truthy view of a record field: nonzero ints, `true`, and the text
/// `"YES"`/`"1"` count as set.
pub(crate) fn flag(record: &Record, key: &str) -> bool {
    match record.get(key) {
        Some(SqlValue::Bool(b)) => *b,
        Some(SqlValue::Int(n)) => *n != 0,
        Some(SqlValue::Text(s)) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("yes") || s == "1" || s.eq_ignore_ascii_case("true")
        }
        _ => false,
    }
}

/// Size as `u32`, when reported and in range.
pub(crate) fn size(record: &Record, key: &str) -> Option<u32> {
    int(record, key).and_then(|n| u32::try_from(n).ok())
}
