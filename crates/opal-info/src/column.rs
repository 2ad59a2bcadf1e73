//! Normalized column metadata.
//!
//! Each adapter reduces its catalog's representation to this one shape.
//! Default values are coerced per type family: quote-wrapping stripped
//! for character types, numeric text cast to int/float, and keyword
//! defaults of the `CURRENT_TIMESTAMP` family treated as no default at
//! all. These rules reflect observed catalog behavior, not a standard.

use opal_query::SqlValue;
use serde::{Deserialize, Serialize};

/// Per-column metadata, normalized across MySQL, Postgres, and SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Engine-reported base type, lowercased (e.g. `int`, `varchar`).
    pub col_type: String,
    /// Character length or numeric precision, when reported.
    pub size: Option<u32>,
    /// Numeric scale, when reported.
    pub scale: Option<u32>,
    /// Whether the column is NOT NULL.
    pub is_not_null: bool,
    /// Whether the column is part of the primary key.
    pub is_primary: bool,
    /// Whether the column auto-increments.
    pub is_auto_increment: bool,
    /// Whether the column is unsigned; `None` when the engine does not
    /// say (Postgres, SQLite).
    pub is_unsigned: Option<bool>,
    /// Whether the type is a numeric family.
    pub is_numeric: bool,
    /// Coerced default value, when one is declared.
    pub default: Option<SqlValue>,
    /// Whether a usable default is declared. Keyword defaults such as
    /// `CURRENT_TIMESTAMP` count as no default.
    pub has_default: bool,
    /// Enum value list, for MySQL `enum(...)` columns.
    pub options: Option<Vec<String>>,
    /// Name of the preceding column in ordinal position; `None` for
    /// the first column.
    pub after_field: Option<String>,
    /// Column comment, when the engine stores one.
    pub comment: Option<String>,
}

/// Integer type families.
const INT_TYPES: &[&str] = &[
    "int", "integer", "tinyint", "smallint", "mediumint", "bigint", "int2", "int4", "int8",
    "serial", "bigserial", "smallserial",
];

/// Floating/decimal type families.
const FLOAT_TYPES: &[&str] = &[
    "float", "double", "double precision", "real", "decimal", "numeric", "dec",
];

/// Character type families, for default-value quote stripping.
const CHAR_TYPES: &[&str] = &[
    "char", "varchar", "character", "character varying", "text", "tinytext", "mediumtext",
    "longtext", "nchar", "nvarchar", "enum", "set",
];

/// Whether the base type is an integer family.
#[must_use]
pub fn is_int_type(col_type: &str) -> bool {
    INT_TYPES.contains(&col_type)
}

/// Whether the base type is a float/decimal family.
#[must_use]
pub fn is_float_type(col_type: &str) -> bool {
    FLOAT_TYPES.contains(&col_type)
}

/// Whether the base type is numeric (integer or float/decimal).
#[must_use]
pub fn is_numeric_type(col_type: &str) -> bool {
    is_int_type(col_type) || is_float_type(col_type)
}

/// Whether the base type is a character family.
#[must_use]
pub fn is_char_type(col_type: &str) -> bool {
    CHAR_TYPES.contains(&col_type)
}

/// Keyword defaults that mean "no usable default".
fn is_keyword_default(raw: &str) -> bool {
    let upper = raw.trim().to_uppercase();
    upper == "NULL"
        || upper.starts_with("CURRENT_TIMESTAMP")
        || upper.starts_with("CURRENT_DATE")
        || upper.starts_with("CURRENT_TIME")
        || upper.starts_with("NOW()")
}

/// Coerces a raw catalog default into a typed value.
///
/// Returns `(default, has_default)`. Keyword defaults and absent
/// defaults yield `(None, false)`.
#[must_use]
pub fn coerce_default(col_type: &str, raw: Option<&str>) -> (Option<SqlValue>, bool) {
    let Some(raw) = raw else {
        return (None, false);
    };
    if is_keyword_default(raw) {
        return (None, false);
    }
    let raw = raw.trim();
    if is_char_type(col_type) {
        return (Some(SqlValue::Text(strip_quotes(raw))), true);
    }
    if is_int_type(col_type) {
        if let Ok(n) = strip_quotes(raw).parse::<i64>() {
            return (Some(SqlValue::Int(n)), true);
        }
    }
    if is_float_type(col_type) {
        if let Ok(f) = strip_quotes(raw).parse::<f64>() {
            return (Some(SqlValue::Float(f)), true);
        }
    }
    (Some(SqlValue::Text(String::from(raw))), true)
}

/// Strips one layer of single-quote wrapping and un-doubles embedded
/// quotes; unquoted text passes through.
fn strip_quotes(raw: &str) -> String {
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        raw[1..raw.len() - 1].replace("''", "'")
    } else {
        String::from(raw)
    }
}

/// Parses MySQL `enum('a','b')` column-type text into its value list.
/// CSV-style: values are single-quoted and comma-separated, with
/// embedded quotes doubled.
#[must_use]
pub fn parse_enum_options(full_type: &str) -> Option<Vec<String>> {
    let body = full_type
        .strip_prefix("enum(")
        .or_else(|| full_type.strip_prefix("set("))?
        .strip_suffix(')')?;
    let mut options = vec![];
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = body.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\'' if in_quotes => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    current.push('\'');
                } else {
                    in_quotes = false;
                    options.push(std::mem::take(&mut current));
                }
            }
            '\'' => in_quotes = true,
            _ if in_quotes => current.push(ch),
            _ => {}
        }
    }
    Some(options)
}
