//! SQLite schema adapter.
//!
//! SQLite has no information_schema; columns come from
//! `PRAGMA table_info` and the autoincrement flag from the stored
//! `CREATE TABLE` text in `sqlite_master`. An empty schema name means
//! the `main` database.

use std::sync::Arc;

use indexmap::IndexMap;
use opal_query::{Connection, Record, SqlValue};
use regex::Regex;
use tracing::debug;

use crate::catalog::{flag, text};
use crate::column::{coerce_default, is_numeric_type, ColumnDefinition};
use crate::error::Result;
use crate::SchemaAdapter;

/// SQLite catalog reader.
pub struct SqliteAdapter;

impl SchemaAdapter for SqliteAdapter {
    fn list_tables(&self, connection: &Arc<dyn Connection>, schema: &str) -> Result<Vec<String>> {
        let statement = format!(
            "SELECT name FROM {}.sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
            quote(schema_or_main(schema)),
        );
        let names = connection.fetch_column(&statement, &Record::new())?;
        Ok(names
            .into_iter()
            .filter_map(|value| match value {
                SqlValue::Text(name) => Some(name),
                _ => None,
            })
            .collect())
    }

    fn list_columns(
        &self,
        connection: &Arc<dyn Connection>,
        schema: &str,
        table: &str,
    ) -> Result<IndexMap<String, ColumnDefinition>> {
        let schema = schema_or_main(schema);
        debug!(schema, table, "listing sqlite columns");
        let statement = format!("PRAGMA {}.table_info({})", quote(schema), quote(table));
        let rows = connection.fetch_all(&statement, &Record::new())?;
        let create_sql = self.create_sql(connection, schema, table)?;

        let mut columns = IndexMap::new();
        let mut previous: Option<String> = None;
        for row in rows {
            let definition = Self::definition(&row, previous.clone(), create_sql.as_deref());
            previous = Some(definition.name.clone());
            columns.insert(definition.name.clone(), definition);
        }
        Ok(columns)
    }

    fn autoinc_sequence(
        &self,
        _connection: &Arc<dyn Connection>,
        _schema: &str,
        _table: &str,
    ) -> Result<Option<String>> {
        Ok(None)
    }
}

impl SqliteAdapter {
    fn create_sql(
        &self,
        connection: &Arc<dyn Connection>,
        schema: &str,
        table: &str,
    ) -> Result<Option<String>> {
        let statement = format!(
            "SELECT sql FROM {}.sqlite_master WHERE type = 'table' AND name = :table",
            quote(schema),
        );
        let mut params = Record::new();
        params.insert(String::from("table"), SqlValue::from(table));
        let sql = connection.fetch_value(&statement, &params)?;
        Ok(match sql {
            Some(SqlValue::Text(sql)) => Some(sql),
            _ => None,
        })
    }

    fn definition(
        row: &Record,
        after_field: Option<String>,
        create_sql: Option<&str>,
    ) -> ColumnDefinition {
        let name = text(row, "name").unwrap_or_default();
        let declared = text(row, "type").unwrap_or_default();
        let (col_type, size, scale) = parse_declared_type(&declared);

        let is_primary = flag(row, "pk");
        let is_auto_increment =
            is_primary && create_sql.is_some_and(|sql| declares_autoincrement(sql, &name));

        let raw_default = text(row, "dflt_value");
        let (default, has_default) = coerce_default(&col_type, raw_default.as_deref());

        ColumnDefinition {
            name,
            size,
            scale,
            is_not_null: flag(row, "notnull"),
            is_primary,
            is_auto_increment,
            is_unsigned: None,
            is_numeric: is_numeric_type(&col_type),
            default,
            has_default,
            options: None,
            after_field,
            comment: None,
            col_type,
        }
    }
}

fn schema_or_main(schema: &str) -> &str {
    if schema.is_empty() {
        "main"
    } else {
        schema
    }
}

/// Double-quotes an identifier, doubling embedded quotes.
fn quote(part: &str) -> String {
    format!("\"{}\"", part.replace('"', "\"\""))
}

/// Splits a declared type like `VARCHAR(10)` or `DECIMAL(10,2)` into
/// a lowercased base type plus size and scale.
fn parse_declared_type(declared: &str) -> (String, Option<u32>, Option<u32>) {
    let declared = declared.trim();
    let Some(open) = declared.find('(') else {
        return (declared.to_lowercase(), None, None);
    };
    let base = declared[..open].trim().to_lowercase();
    let inner = declared[open + 1..].trim_end_matches(')');
    let mut parts = inner.split(',').map(str::trim);
    let size = parts.next().and_then(|s| s.parse().ok());
    let scale = parts.next().and_then(|s| s.parse().ok());
    (base, size, scale)
}

/// Whether the stored `CREATE TABLE` text declares `AUTOINCREMENT` on
/// the named column. The name must follow a column-list delimiter so a
/// name that is a suffix of another column cannot match.
fn declares_autoincrement(create_sql: &str, column: &str) -> bool {
    let pattern = format!(
        r#"(?i)[(,\s"'`\[]{}["'`\]]?\s+[^,()]*\bAUTOINCREMENT\b"#,
        regex::escape(column),
    );
    Regex::new(&pattern).is_ok_and(|re| re.is_match(create_sql))
}
