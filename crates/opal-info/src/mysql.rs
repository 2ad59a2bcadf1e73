//! MySQL/MariaDB schema adapter.
//!
//! One joined `information_schema` query covers columns and primary-key
//! usage; the `COLUMN_TYPE` extended text supplies the unsigned flag and
//! enum options.

use std::sync::Arc;

use indexmap::IndexMap;
use opal_query::{Connection, Record, SqlValue};
use tracing::debug;

use crate::catalog::{flag, size, text};
use crate::column::{coerce_default, is_numeric_type, parse_enum_options, ColumnDefinition};
use crate::error::Result;
use crate::SchemaAdapter;

const LIST_TABLES: &str = "\
SELECT table_name \
FROM information_schema.tables \
WHERE table_schema = :schema AND table_type = 'BASE TABLE' \
ORDER BY table_name";

const LIST_COLUMNS: &str = "\
SELECT \
    c.COLUMN_NAME AS name, \
    c.DATA_TYPE AS col_type, \
    c.COLUMN_TYPE AS full_type, \
    c.CHARACTER_MAXIMUM_LENGTH AS char_size, \
    c.NUMERIC_PRECISION AS num_size, \
    c.NUMERIC_SCALE AS num_scale, \
    c.IS_NULLABLE AS nullable, \
    c.COLUMN_DEFAULT AS default_value, \
    c.EXTRA AS extra, \
    c.COLUMN_COMMENT AS comment, \
    CASE WHEN kcu.CONSTRAINT_NAME IS NOT NULL THEN 1 ELSE 0 END AS is_primary \
FROM information_schema.COLUMNS c \
LEFT JOIN information_schema.KEY_COLUMN_USAGE kcu \
    ON kcu.TABLE_SCHEMA = c.TABLE_SCHEMA \
    AND kcu.TABLE_NAME = c.TABLE_NAME \
    AND kcu.COLUMN_NAME = c.COLUMN_NAME \
    AND kcu.CONSTRAINT_NAME = 'PRIMARY' \
WHERE c.TABLE_SCHEMA = :schema AND c.TABLE_NAME = :table \
ORDER BY c.ORDINAL_POSITION";

/// MySQL/MariaDB catalog reader.
pub struct MysqlAdapter;

impl SchemaAdapter for MysqlAdapter {
    fn list_tables(&self, connection: &Arc<dyn Connection>, schema: &str) -> Result<Vec<String>> {
        let mut params = Record::new();
        params.insert(String::from("schema"), SqlValue::from(schema));
        let names = connection.fetch_column(LIST_TABLES, &params)?;
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
        let mut params = Record::new();
        params.insert(String::from("schema"), SqlValue::from(schema));
        params.insert(String::from("table"), SqlValue::from(table));
        debug!(schema, table, "listing mysql columns");
        let rows = connection.fetch_all(LIST_COLUMNS, &params)?;

        let mut columns: IndexMap<String, ColumnDefinition> = IndexMap::new();
        let mut previous: Option<String> = None;
        for row in rows {
            let definition = Self::definition(&row, previous.clone());
            // constraint joins can report a column more than once
            if let Some(existing) = columns.get_mut(&definition.name) {
                existing.is_primary = existing.is_primary || definition.is_primary;
                continue;
            }
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
        // auto_increment is implicit in MySQL, not sequence-based
        Ok(None)
    }
}

impl MysqlAdapter {
    fn definition(row: &Record, after_field: Option<String>) -> ColumnDefinition {
        let name = text(row, "name").unwrap_or_default();
        let col_type = text(row, "col_type").unwrap_or_default().to_lowercase();
        let full_type = text(row, "full_type").unwrap_or_default().to_lowercase();
        let extra = text(row, "extra").unwrap_or_default().to_lowercase();

        let default_value = text(row, "default_value");
        let (default, has_default) = coerce_default(&col_type, default_value.as_deref());
        let comment = text(row, "comment").filter(|c| !c.is_empty());

        ColumnDefinition {
            name,
            size: size(row, "char_size").or_else(|| size(row, "num_size")),
            scale: size(row, "num_scale"),
            is_not_null: !flag(row, "nullable"),
            is_primary: flag(row, "is_primary"),
            is_auto_increment: extra.contains("auto_increment"),
            is_unsigned: Some(full_type.contains("unsigned")),
            is_numeric: is_numeric_type(&col_type),
            default,
            has_default,
            options: parse_enum_options(&full_type),
            after_field,
            comment,
            col_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, SqlValue)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (String::from(*k), v.clone()))
            .collect()
    }

    #[test]
    fn test_definition_from_catalog_row() {
        let def = MysqlAdapter::definition(
            &row(&[
                ("name", SqlValue::Text(String::from("qty"))),
                ("col_type", SqlValue::Text(String::from("INT"))),
                ("full_type", SqlValue::Text(String::from("int(10) unsigned"))),
                ("char_size", SqlValue::Null),
                ("num_size", SqlValue::Int(10)),
                ("num_scale", SqlValue::Int(0)),
                ("nullable", SqlValue::Text(String::from("NO"))),
                ("default_value", SqlValue::Text(String::from("0"))),
                ("extra", SqlValue::Text(String::from("auto_increment"))),
                ("comment", SqlValue::Text(String::new())),
                ("is_primary", SqlValue::Int(1)),
            ]),
            Some(String::from("id")),
        );
        assert_eq!(def.col_type, "int");
        assert_eq!(def.size, Some(10));
        assert_eq!(def.scale, Some(0));
        assert!(def.is_not_null);
        assert!(def.is_primary);
        assert!(def.is_auto_increment);
        assert_eq!(def.is_unsigned, Some(true));
        assert!(def.is_numeric);
        assert_eq!(def.default, Some(SqlValue::Int(0)));
        assert!(def.has_default);
        assert_eq!(def.after_field.as_deref(), Some("id"));
        assert_eq!(def.comment, None);
    }

    #[test]
    fn test_definition_enum_options() {
        let def = MysqlAdapter::definition(
            &row(&[
                ("name", SqlValue::Text(String::from("state"))),
                ("col_type", SqlValue::Text(String::from("enum"))),
                (
                    "full_type",
                    SqlValue::Text(String::from("enum('new','open','done')")),
                ),
                ("nullable", SqlValue::Text(String::from("YES"))),
                ("is_primary", SqlValue::Int(0)),
            ]),
            None,
        );
        assert_eq!(
            def.options,
            Some(vec![
                String::from("new"),
                String::from("open"),
                String::from("done")
            ])
        );
        assert!(!def.is_not_null);
        assert_eq!(def.after_field, None);
    }
}
