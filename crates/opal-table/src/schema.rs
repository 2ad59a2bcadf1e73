//! Explicit table schema descriptors.
//!
//! A [`TableSchema`] is a data value, not a type hierarchy: the same
//! table engine is driven by hand-written descriptors, generated code,
//! or runtime introspection, all through this one shape.

use opal_query::{Record, SqlValue};
use serde::{Deserialize, Serialize};

/// Describes one logical table: name, ordered columns with their default
/// values, primary key, and optional autoincrement column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name as used in statements.
    pub name: String,
    /// Ordered column names.
    pub columns: Vec<String>,
    /// Default values for new rows, keyed by column. Columns without an
    /// entry default to NULL.
    #[serde(default)]
    pub defaults: Record,
    /// Primary-key columns, in key order. Empty means no key.
    pub primary_key: Vec<String>,
    /// The autoincrement column, if the table has one.
    pub autoinc_column: Option<String>,
}

impl TableSchema {
    /// Creates a descriptor with the given name and columns, no key.
    #[must_use]
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: String::from(name),
            columns: columns.iter().map(|col| String::from(*col)).collect(),
            defaults: Record::new(),
            primary_key: vec![],
            autoinc_column: None,
        }
    }

    /// Sets the primary-key columns.
    #[must_use]
    pub fn with_primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = columns.iter().map(|col| String::from(*col)).collect();
        self
    }

    /// Sets the autoincrement column.
    #[must_use]
    pub fn with_autoinc(mut self, column: &str) -> Self {
        self.autoinc_column = Some(String::from(column));
        self
    }

    /// Sets a column default for new rows.
    #[must_use]
    pub fn with_default(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.defaults.insert(String::from(column), value.into());
        self
    }

    /// Whether the primary key spans more than one column.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.primary_key.len() > 1
    }

    /// Whether the column is part of the primary key.
    #[must_use]
    pub fn is_primary(&self, column: &str) -> bool {
        self.primary_key.iter().any(|key| key == column)
    }

    /// The full column set as a record of default values: declared
    /// defaults where present, NULL elsewhere.
    #[must_use]
    pub fn default_record(&self) -> Record {
        self.columns
            .iter()
            .map(|col| {
                let value = self.defaults.get(col).cloned().unwrap_or(SqlValue::Null);
                (col.clone(), value)
            })
            .collect()
    }
}
