//! DELETE statement builder.

use std::sync::Arc;

use crate::bind::Bind;
use crate::connection::{Connection, ExecResult, Result};
use crate::dialect::Dialect;
use crate::select::push_conditions;
use crate::value::{Record, SqlValue};

/// A fluent DELETE builder bound to a connection.
#[derive(Clone)]
pub struct Delete {
    connection: Arc<dyn Connection>,
    dialect: Dialect,
    bind: Bind,
    from: Option<String>,
    where_parts: Vec<String>,
    returning: Vec<String>,
}

impl Delete {
    /// Creates a new DELETE builder; the quoting dialect follows the
    /// connection's driver tag.
    #[must_use]
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        let dialect = Dialect::from_driver(connection.driver_name());
        Self {
            connection,
            dialect,
            bind: Bind::new(),
            from: None,
            where_parts: vec![],
            returning: vec![],
        }
    }

    /// The dialect in effect for this builder.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Sets the target table; the name is dialect-quoted.
    #[must_use]
    pub fn from(mut self, table: &str) -> Self {
        self.from = Some(self.dialect.quote_identifier(table));
        self
    }

    /// ANDs a verbatim WHERE fragment.
    #[must_use]
    pub fn where_(mut self, cond: &str) -> Self {
        self.where_parts.push(String::from(cond));
        self
    }

    /// ANDs a WHERE fragment ending in an operator, appending an inline
    /// bound placeholder for the value.
    #[must_use]
    pub fn where_bind(mut self, cond: &str, value: impl Into<SqlValue>) -> Self {
        let placeholder = self.bind.inline(value);
        self.where_parts.push(format!("{cond}{placeholder}"));
        self
    }

    /// ORs a verbatim WHERE fragment.
    #[must_use]
    pub fn or_where(mut self, cond: &str) -> Self {
        if self.where_parts.is_empty() {
            self.where_parts.push(String::from(cond));
        } else {
            self.where_parts.push(format!("OR {cond}"));
        }
        self
    }

    /// Adds RETURNING columns. Rendered only when the dialect supports
    /// the clause.
    #[must_use]
    pub fn returning(mut self, cols: &[&str]) -> Self {
        self.returning.extend(cols.iter().map(|col| String::from(*col)));
        self
    }

    /// Merges named bind values.
    #[must_use]
    pub fn bind_values(mut self, values: Record) -> Self {
        self.bind.set_values(values);
        self
    }

    /// The accumulated bind values.
    #[must_use]
    pub const fn bind_record(&self) -> &Record {
        self.bind.to_record()
    }

    /// Renders the statement text.
    #[must_use]
    pub fn statement(&self) -> String {
        let mut sql = format!("DELETE FROM {}", self.from.as_deref().unwrap_or(""));
        push_conditions(&mut sql, " WHERE ", &self.where_parts);
        if !self.returning.is_empty() && self.dialect.supports_returning() {
            sql.push_str(" RETURNING ");
            sql.push_str(&self.returning.join(", "));
        }
        sql
    }

    /// Executes the statement and returns the execution handle.
    pub fn perform(&self) -> Result<ExecResult> {
        let statement = self.statement();
        tracing::debug!(statement = %statement, "performing delete");
        self.connection.perform(&statement, self.bind.to_record())
    }
}
