//! SELECT statement builder.

use std::sync::Arc;

use crate::bind::Bind;
use crate::connection::{Connection, Result};
use crate::dialect::Dialect;
use crate::value::{Record, SqlValue};

/// A fluent SELECT builder bound to a connection.
///
/// WHERE fragments follow the trailing-operator convention: with
/// [`Select::where_bind`] the bound placeholder is appended after the
/// given fragment (`"status = "` becomes `"status = :_1_1_"`), while
/// [`Select::where_`] takes the fragment verbatim and assumes any named
/// placeholders in it were supplied via [`Select::bind_values`].
#[derive(Clone)]
pub struct Select {
    connection: Arc<dyn Connection>,
    dialect: Dialect,
    bind: Bind,
    distinct: bool,
    columns: Vec<String>,
    from: Vec<String>,
    joins: Vec<String>,
    where_parts: Vec<String>,
    group_by: Vec<String>,
    having: Vec<String>,
    order_by: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    for_update: bool,
}

impl Select {
    /// Creates a new SELECT builder; the quoting dialect follows the
    /// connection's driver tag.
    #[must_use]
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        let dialect = Dialect::from_driver(connection.driver_name());
        Self {
            connection,
            dialect,
            bind: Bind::new(),
            distinct: false,
            columns: vec![],
            from: vec![],
            joins: vec![],
            where_parts: vec![],
            group_by: vec![],
            having: vec![],
            order_by: vec![],
            limit: None,
            offset: None,
            for_update: false,
        }
    }

    /// The dialect in effect for this builder.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Quotes an identifier under this builder's dialect.
    #[must_use]
    pub fn quote_identifier(&self, name: &str) -> String {
        self.dialect.quote_identifier(name)
    }

    /// Sets DISTINCT.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds columns to the select list. Column text is taken verbatim
    /// (expressions and aliases are allowed).
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns
            .extend(cols.iter().map(|col| String::from(*col)));
        self
    }

    /// Adds a table to the FROM clause; the name is dialect-quoted.
    #[must_use]
    pub fn from(mut self, table: &str) -> Self {
        self.from.push(self.dialect.quote_identifier(table));
        self
    }

    /// Adds an INNER JOIN; the table name is dialect-quoted, the
    /// condition is taken verbatim.
    #[must_use]
    pub fn join(mut self, table: &str, on: &str) -> Self {
        self.joins
            .push(format!("INNER JOIN {} ON {on}", self.dialect.quote_identifier(table)));
        self
    }

    /// Adds a LEFT JOIN.
    #[must_use]
    pub fn left_join(mut self, table: &str, on: &str) -> Self {
        self.joins
            .push(format!("LEFT JOIN {} ON {on}", self.dialect.quote_identifier(table)));
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

    /// ORs a WHERE fragment ending in an operator, appending an inline
    /// bound placeholder for the value.
    #[must_use]
    pub fn or_where_bind(mut self, cond: &str, value: impl Into<SqlValue>) -> Self {
        let placeholder = self.bind.inline(value);
        self.or_where(&format!("{cond}{placeholder}"))
    }

    /// Adds GROUP BY columns.
    #[must_use]
    pub fn group_by(mut self, cols: &[&str]) -> Self {
        self.group_by.extend(cols.iter().map(|col| String::from(*col)));
        self
    }

    /// ANDs a HAVING fragment.
    #[must_use]
    pub fn having(mut self, cond: &str) -> Self {
        self.having.push(String::from(cond));
        self
    }

    /// Adds ORDER BY expressions.
    #[must_use]
    pub fn order_by(mut self, cols: &[&str]) -> Self {
        self.order_by.extend(cols.iter().map(|col| String::from(*col)));
        self
    }

    /// Sets LIMIT.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets OFFSET.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Resets LIMIT and OFFSET.
    #[must_use]
    pub const fn clear_limit(mut self) -> Self {
        self.limit = None;
        self.offset = None;
        self
    }

    /// Appends FOR UPDATE.
    #[must_use]
    pub const fn for_update(mut self) -> Self {
        self.for_update = true;
        self
    }

    /// Replaces the select list. Used when re-purposing a built query,
    /// e.g. for a COUNT(*) over the same WHERE clause.
    #[must_use]
    pub fn reset_columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|col| String::from(*col)).collect();
        self
    }

    /// Merges named bind values for placeholders already present in
    /// WHERE/HAVING fragments.
    #[must_use]
    pub fn bind_values(mut self, values: Record) -> Self {
        self.bind.set_values(values);
        self
    }

    /// Stores one inline bind and returns its placeholder text.
    pub fn bind_inline(&mut self, value: impl Into<SqlValue>) -> String {
        self.bind.inline(value)
    }

    /// The accumulated bind values.
    #[must_use]
    pub const fn bind_record(&self) -> &Record {
        self.bind.to_record()
    }

    /// Renders the statement text.
    #[must_use]
    pub fn statement(&self) -> String {
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        if self.columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.columns.join(", "));
        }
        if !self.from.is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&self.from.join(", "));
        }
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        push_conditions(&mut sql, " WHERE ", &self.where_parts);
        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }
        push_conditions(&mut sql, " HAVING ", &self.having);
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }
        if let Some(n) = self.limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }
        if let Some(n) = self.offset {
            sql.push_str(&format!(" OFFSET {n}"));
        }
        if self.for_update {
            sql.push_str(" FOR UPDATE");
        }
        sql
    }

    /// Fetches all rows.
    pub fn fetch_all(&self) -> Result<Vec<Record>> {
        let statement = self.statement();
        tracing::debug!(statement = %statement, "fetch_all");
        self.connection.fetch_all(&statement, self.bind.to_record())
    }

    /// Fetches the first row, if any.
    pub fn fetch_one(&self) -> Result<Option<Record>> {
        let statement = self.statement();
        tracing::debug!(statement = %statement, "fetch_one");
        self.connection.fetch_one(&statement, self.bind.to_record())
    }

    /// Fetches the first column of every row.
    pub fn fetch_column(&self) -> Result<Vec<SqlValue>> {
        let statement = self.statement();
        self.connection
            .fetch_column(&statement, self.bind.to_record())
    }

    /// Fetches the first value of the first row, if any.
    pub fn fetch_value(&self) -> Result<Option<SqlValue>> {
        let statement = self.statement();
        self.connection
            .fetch_value(&statement, self.bind.to_record())
    }
}

/// Joins condition fragments under a clause keyword. Fragments carrying
/// their own `OR ` prefix are kept as-is; everything else is ANDed.
pub(crate) fn push_conditions(sql: &mut String, keyword: &str, parts: &[String]) {
    if parts.is_empty() {
        return;
    }
    sql.push_str(keyword);
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            if part.starts_with("OR ") {
                sql.push(' ');
            } else {
                sql.push_str(" AND ");
            }
        }
        sql.push_str(part);
    }
}
