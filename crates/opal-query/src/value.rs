//! SQL values and parameter records.
//!
//! Every value bound into a statement travels as a [`SqlValue`], tagged
//! with its SQL type. Values are always parameterized, never interpolated
//! into the statement text.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered column-name to value map.
///
/// Used for bind parameters, row stores, and fetched rows. Insertion
/// order is preserved so rendered statements are deterministic.
pub type Record = IndexMap<String, SqlValue>;

/// A SQL value that can be bound as a statement parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
    /// Exact decimal value, kept as its literal text.
    Decimal(String),
    /// A list of values, expanded element-wise for `IN (...)` binds.
    Array(Vec<SqlValue>),
}

impl SqlValue {
    /// Returns true for the scalar variants (everything but `Array`).
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::Array(_))
    }

    /// Numeric view of the value, if it has one.
    ///
    /// Booleans coerce to 0/1, integers and floats to themselves, and
    /// text/decimal values to their parsed numeric form when they parse.
    fn as_numeric(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) | Self::Decimal(s) => s.trim().parse().ok(),
            Self::Null | Self::Blob(_) | Self::Array(_) => None,
        }
    }

    /// Loose equality as used for dirty-state diffing.
    ///
    /// If either side is a boolean it is coerced to 0/1 first; if both
    /// sides are then numeric they compare numerically (`1` equals `"1"`
    /// equals `1.0`); everything else compares strictly. Two integers
    /// compare exactly, without a float round-trip.
    #[must_use]
    pub fn loosely_equals(&self, other: &Self) -> bool {
        if let (Self::Int(a), Self::Int(b)) = (self, other) {
            return a == b;
        }
        match (self.as_numeric(), other.as_numeric()) {
            #[allow(clippy::float_cmp)]
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(String::from(v))
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl From<&[u8]> for SqlValue {
    fn from(v: &[u8]) -> Self {
        Self::Blob(v.to_vec())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<SqlValue>> From<Vec<T>> for SqlValue {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(SqlValue::from(true), SqlValue::Bool(true));
        assert_eq!(SqlValue::from(42_i32), SqlValue::Int(42));
        assert_eq!(SqlValue::from(2.5_f64), SqlValue::Float(2.5));
        assert_eq!(SqlValue::from("hello"), SqlValue::Text(String::from("hello")));
        assert_eq!(SqlValue::from(None::<i32>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some(7_i64)), SqlValue::Int(7));
    }

    #[test]
    fn test_array_conversion() {
        let v = SqlValue::from(vec![1_i64, 2, 3]);
        assert_eq!(
            v,
            SqlValue::Array(vec![
                SqlValue::Int(1),
                SqlValue::Int(2),
                SqlValue::Int(3)
            ])
        );
        assert!(!v.is_scalar());
    }

    #[test]
    fn test_loose_numeric_equality() {
        assert!(SqlValue::Int(1).loosely_equals(&SqlValue::Text(String::from("1"))));
        assert!(SqlValue::Int(1).loosely_equals(&SqlValue::Float(1.0)));
        assert!(SqlValue::Float(100.12).loosely_equals(&SqlValue::Text(String::from("100.12"))));
        assert!(!SqlValue::Int(1).loosely_equals(&SqlValue::Int(2)));
    }

    #[test]
    fn test_loose_bool_coercion() {
        assert!(SqlValue::Bool(true).loosely_equals(&SqlValue::Int(1)));
        assert!(SqlValue::Bool(false).loosely_equals(&SqlValue::Text(String::from("0"))));
        assert!(!SqlValue::Bool(false).loosely_equals(&SqlValue::Text(String::from("abc"))));
    }

    #[test]
    fn test_strict_fallback() {
        assert!(SqlValue::Null.loosely_equals(&SqlValue::Null));
        assert!(!SqlValue::Null.loosely_equals(&SqlValue::Int(0)));
        assert!(SqlValue::Text(String::from("a")).loosely_equals(&SqlValue::Text(String::from("a"))));
        assert!(!SqlValue::Text(String::from("a")).loosely_equals(&SqlValue::Text(String::from("b"))));
    }
}
