//! UPDATE statement builder.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::bind::Bind;
use crate::connection::{Connection, ExecResult, Result};
use crate::dialect::Dialect;
use crate::select::push_conditions;
use crate::value::{Record, SqlValue};

/// A fluent UPDATE builder bound to a connection.
///
/// [`Update::has_columns`] reports whether any SET assignment was added;
/// callers use it to skip no-op updates before executing.
#[derive(Clone)]
pub struct Update {
    connection: Arc<dyn Connection>,
    dialect: Dialect,
    bind: Bind,
    table: Option<String>,
    columns: IndexMap<String, String>,
    where_parts: Vec<String>,
    returning: Vec<String>,
}

impl Update {
    /// Creates a new UPDATE builder; the quoting dialect follows the
    /// connection's driver tag.
    #[must_use]
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        let dialect = Dialect::from_driver(connection.driver_name());
        Self {
            connection,
            dialect,
            bind: Bind::new(),
            table: None,
            columns: IndexMap::new(),
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
    pub fn table(mut self, table: &str) -> Self {
        self.table = Some(self.dialect.quote_identifier(table));
        self
    }

    /// Adds a SET assignment with a bound value.
    #[must_use]
    pub fn column(mut self, col: &str, value: impl Into<SqlValue>) -> Self {
        self.bind.set_value(col, value);
        self.columns.insert(String::from(col), format!(":{col}"));
        self
    }

    /// Bulk-adds SET assignments with bound values.
    #[must_use]
    pub fn columns(mut self, cols: Record) -> Self {
        for (col, value) in cols {
            self.bind.set_value(&col, value);
            let placeholder = format!(":{col}");
            self.columns.insert(col, placeholder);
        }
        self
    }

    /// Adds a SET assignment to a verbatim SQL expression.
    #[must_use]
    pub fn set_raw(mut self, col: &str, expr: &str) -> Self {
        self.columns.insert(String::from(col), String::from(expr));
        self
    }

    /// Whether any SET assignment has been added.
    #[must_use]
    pub fn has_columns(&self) -> bool {
        !self.columns.is_empty()
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
        let table = self.table.as_deref().unwrap_or("");
        let assignments: Vec<String> = self
            .columns
            .iter()
            .map(|(col, expr)| format!("{} = {expr}", self.dialect.quote_identifier(col)))
            .collect();
        let mut sql = format!("UPDATE {table} SET {}", assignments.join(", "));
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
        tracing::debug!(statement = %statement, "performing update");
        self.connection.perform(&statement, self.bind.to_record())
    }
}
