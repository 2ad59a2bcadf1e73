//! INSERT statement builder.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::bind::Bind;
use crate::connection::{Connection, ExecResult, Result};
use crate::dialect::Dialect;
use crate::value::{Record, SqlValue};

/// A fluent INSERT builder bound to a connection.
///
/// Each column added via [`Insert::column`] renders as a `:column` named
/// placeholder with its value stored in the bind record; [`Insert::set_raw`]
/// splices a verbatim SQL expression instead (e.g. `NOW()`).
#[derive(Clone)]
pub struct Insert {
    connection: Arc<dyn Connection>,
    dialect: Dialect,
    bind: Bind,
    into: Option<String>,
    table: Option<String>,
    columns: IndexMap<String, String>,
    returning: Vec<String>,
}

impl Insert {
    /// Creates a new INSERT builder; the quoting dialect follows the
    /// connection's driver tag.
    #[must_use]
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        let dialect = Dialect::from_driver(connection.driver_name());
        Self {
            connection,
            dialect,
            bind: Bind::new(),
            into: None,
            table: None,
            columns: IndexMap::new(),
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
    pub fn into(mut self, table: &str) -> Self {
        self.into = Some(self.dialect.quote_identifier(table));
        self.table = Some(String::from(table));
        self
    }

    /// Adds a column with a bound value.
    #[must_use]
    pub fn column(mut self, col: &str, value: impl Into<SqlValue>) -> Self {
        self.bind.set_value(col, value);
        self.columns.insert(String::from(col), format!(":{col}"));
        self
    }

    /// Bulk-adds columns with bound values.
    #[must_use]
    pub fn columns(mut self, cols: Record) -> Self {
        for (col, value) in cols {
            self.bind.set_value(&col, value);
            let placeholder = format!(":{col}");
            self.columns.insert(col, placeholder);
        }
        self
    }

    /// Adds a column whose value is a verbatim SQL expression.
    #[must_use]
    pub fn set_raw(mut self, col: &str, expr: &str) -> Self {
        self.columns.insert(String::from(col), String::from(expr));
        self
    }

    /// Drops a column (and its bind value) if present.
    #[must_use]
    pub fn without_column(mut self, col: &str) -> Self {
        self.columns.shift_remove(col);
        self.bind.remove(col);
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

    /// Names of the columns currently in the statement.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// The sequence name for generated-key retrieval, when the dialect
    /// uses sequences (Postgres).
    #[must_use]
    pub fn last_insert_id_name(&self, column: &str) -> Option<String> {
        self.table
            .as_deref()
            .and_then(|table| self.dialect.last_insert_id_name(table, column))
    }

    /// Last auto-generated id reported by the connection.
    pub fn last_insert_id(&self, sequence: Option<&str>) -> Result<Option<SqlValue>> {
        self.connection.last_insert_id(sequence)
    }

    /// Renders the statement text.
    #[must_use]
    pub fn statement(&self) -> String {
        let table = self.into.as_deref().unwrap_or("");
        let cols: Vec<String> = self
            .columns
            .keys()
            .map(|col| self.dialect.quote_identifier(col))
            .collect();
        let values: Vec<&str> = self.columns.values().map(String::as_str).collect();
        let mut sql = format!(
            "INSERT INTO {table} ({}) VALUES ({})",
            cols.join(", "),
            values.join(", ")
        );
        if !self.returning.is_empty() && self.dialect.supports_returning() {
            sql.push_str(" RETURNING ");
            sql.push_str(&self.returning.join(", "));
        }
        sql
    }

    /// Executes the statement and returns the execution handle.
    pub fn perform(&self) -> Result<ExecResult> {
        let statement = self.statement();
        tracing::debug!(statement = %statement, "performing insert");
        self.connection.perform(&statement, self.bind.to_record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeConnection;

    #[test]
    fn test_insert_statement() {
        let sql = Insert::new(Arc::new(FakeConnection::new("sqlite")))
            .into("users")
            .column("name", "alice")
            .column("active", true)
            .statement();
        assert_eq!(
            sql,
            "INSERT INTO \"users\" (\"name\", \"active\") VALUES (:name, :active)"
        );
    }

    #[test]
    fn test_insert_binds_by_column_name() {
        let insert = Insert::new(Arc::new(FakeConnection::new("sqlite")))
            .into("users")
            .column("name", "alice");
        assert_eq!(
            insert.bind_record()["name"],
            SqlValue::Text(String::from("alice"))
        );
    }

    #[test]
    fn test_set_raw_expression() {
        let sql = Insert::new(Arc::new(FakeConnection::new("mysql")))
            .into("logs")
            .column("line", "boot")
            .set_raw("created_at", "NOW()")
            .statement();
        assert_eq!(
            sql,
            "INSERT INTO `logs` (`line`, `created_at`) VALUES (:line, NOW())"
        );
    }

    #[test]
    fn test_without_column_strips_bind() {
        let insert = Insert::new(Arc::new(FakeConnection::new("sqlite")))
            .into("users")
            .column("id", SqlValue::Null)
            .column("name", "alice")
            .without_column("id");
        assert_eq!(insert.statement(), "INSERT INTO \"users\" (\"name\") VALUES (:name)");
        assert!(!insert.bind_record().contains_key("id"));
    }

    #[test]
    fn test_returning_gated_by_dialect() {
        let with = Insert::new(Arc::new(FakeConnection::new("pgsql")))
            .into("users")
            .column("name", "a")
            .returning(&["id"])
            .statement();
        assert!(with.ends_with(" RETURNING id"));

        let without = Insert::new(Arc::new(FakeConnection::new("mysql")))
            .into("users")
            .column("name", "a")
            .returning(&["id"])
            .statement();
        assert!(!without.contains("RETURNING"));
    }

    #[test]
    fn test_last_insert_id_name_pgsql_only() {
        let pg = Insert::new(Arc::new(FakeConnection::new("pgsql"))).into("users");
        assert_eq!(pg.last_insert_id_name("id"), Some(String::from("users_id_seq")));

        let my = Insert::new(Arc::new(FakeConnection::new("mysql"))).into("users");
        assert_eq!(my.last_insert_id_name("id"), None);
    }

    #[test]
    fn test_perform_routes_to_connection() {
        let connection = Arc::new(FakeConnection::new("sqlite"));
        connection.expect_row_count(1);
        let result = Insert::new(Arc::clone(&connection) as Arc<dyn Connection>)
            .into("users")
            .column("name", "a")
            .perform()
            .unwrap();
        assert_eq!(result.row_count(), 1);
        assert!(connection.last_statement().starts_with("INSERT INTO"));
    }
}
