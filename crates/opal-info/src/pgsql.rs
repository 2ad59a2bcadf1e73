//! PostgreSQL schema adapter.
//!
//! One joined `information_schema` query covers columns, key usage, and
//! table constraints. Defaults carry `::type` cast suffixes which are
//! stripped before coercion; a `nextval('...')` default marks the
//! column auto-incrementing and names its sequence.

use std::sync::Arc;

use indexmap::IndexMap;
use opal_query::{Connection, Record, SqlValue};
use regex::Regex;
use tracing::debug;

use crate::catalog::{flag, size, text};
use crate::column::{coerce_default, is_numeric_type, ColumnDefinition};
use crate::error::Result;
use crate::SchemaAdapter;

const LIST_TABLES: &str = "\
SELECT table_name \
FROM information_schema.tables \
WHERE table_schema = :schema AND table_type = 'BASE TABLE' \
ORDER BY table_name";

const LIST_COLUMNS: &str = "\
SELECT \
    c.column_name AS name, \
    c.data_type AS col_type, \
    c.character_maximum_length AS char_size, \
    c.numeric_precision AS num_size, \
    c.numeric_scale AS num_scale, \
    c.is_nullable AS nullable, \
    c.column_default AS default_value, \
    CASE WHEN pk.column_name IS NOT NULL THEN 1 ELSE 0 END AS is_primary \
FROM information_schema.columns c \
LEFT JOIN ( \
    SELECT kcu.column_name \
    FROM information_schema.table_constraints tc \
    JOIN information_schema.key_column_usage kcu \
        ON kcu.table_schema = tc.table_schema \
        AND kcu.table_name = tc.table_name \
        AND kcu.constraint_name = tc.constraint_name \
    WHERE tc.constraint_type = 'PRIMARY KEY' \
        AND tc.table_schema = :schema AND tc.table_name = :table \
) pk ON pk.column_name = c.column_name \
WHERE c.table_schema = :schema AND c.table_name = :table \
ORDER BY c.ordinal_position";

const AUTOINC_SEQUENCE: &str = "\
SELECT column_default \
FROM information_schema.columns \
WHERE table_schema = :schema AND table_name = :table \
    AND column_default LIKE 'nextval%'";

/// PostgreSQL catalog reader.
pub struct PgsqlAdapter;

impl SchemaAdapter for PgsqlAdapter {
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
        debug!(schema, table, "listing pgsql columns");
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
        connection: &Arc<dyn Connection>,
        schema: &str,
        table: &str,
    ) -> Result<Option<String>> {
        let mut params = Record::new();
        params.insert(String::from("schema"), SqlValue::from(schema));
        params.insert(String::from("table"), SqlValue::from(table));
        let default = connection.fetch_value(AUTOINC_SEQUENCE, &params)?;
        Ok(match default {
            Some(SqlValue::Text(text)) => extract_sequence(&text),
            _ => None,
        })
    }
}

impl PgsqlAdapter {
    fn definition(row: &Record, after_field: Option<String>) -> ColumnDefinition {
        let name = text(row, "name").unwrap_or_default();
        let col_type = text(row, "col_type").unwrap_or_default().to_lowercase();

        let raw_default = text(row, "default_value");
        let is_auto_increment = raw_default
            .as_deref()
            .is_some_and(|d| d.starts_with("nextval("));
        let stripped = raw_default.as_deref().map(strip_cast);
        let (default, has_default) = if is_auto_increment {
            (None, false)
        } else {
            coerce_default(&col_type, stripped.as_deref())
        };

        ColumnDefinition {
            name,
            size: size(row, "char_size").or_else(|| size(row, "num_size")),
            scale: size(row, "num_scale"),
            is_not_null: !flag(row, "nullable"),
            is_primary: flag(row, "is_primary"),
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

/// Strips a trailing `::type` cast from a reported default, e.g.
/// `'new'::character varying` becomes `'new'`.
fn strip_cast(raw: &str) -> String {
    raw.find("::")
        .map_or_else(|| String::from(raw), |at| String::from(raw[..at].trim()))
}

/// Pulls the sequence name out of a `nextval('name'::regclass)`
/// default.
fn extract_sequence(default: &str) -> Option<String> {
    let pattern = Regex::new(r"nextval\('([^']+)'").ok()?;
    pattern
        .captures(default)
        .map(|caps| String::from(&caps[1]))
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
    fn test_strip_cast() {
        assert_eq!(strip_cast("'new'::character varying"), "'new'");
        assert_eq!(strip_cast("0"), "0");
    }

    #[test]
    fn test_extract_sequence() {
        assert_eq!(
            extract_sequence("nextval('users_id_seq'::regclass)"),
            Some(String::from("users_id_seq"))
        );
        assert_eq!(extract_sequence("'abc'"), None);
    }

    #[test]
    fn test_nextval_default_marks_autoincrement() {
        let def = PgsqlAdapter::definition(
            &row(&[
                ("name", SqlValue::Text(String::from("id"))),
                ("col_type", SqlValue::Text(String::from("integer"))),
                (
                    "default_value",
                    SqlValue::Text(String::from("nextval('users_id_seq'::regclass)")),
                ),
                ("nullable", SqlValue::Text(String::from("NO"))),
                ("is_primary", SqlValue::Int(1)),
            ]),
            None,
        );
        assert!(def.is_auto_increment);
        assert!(!def.has_default);
        assert_eq!(def.default, None);
        assert_eq!(def.is_unsigned, None);
    }

    #[test]
    fn test_cast_suffix_stripped_from_default() {
        let def = PgsqlAdapter::definition(
            &row(&[
                ("name", SqlValue::Text(String::from("status"))),
                (
                    "col_type",
                    SqlValue::Text(String::from("character varying")),
                ),
                (
                    "default_value",
                    SqlValue::Text(String::from("'new'::character varying")),
                ),
                ("nullable", SqlValue::Text(String::from("YES"))),
                ("is_primary", SqlValue::Int(0)),
            ]),
            Some(String::from("id")),
        );
        assert_eq!(def.default, Some(SqlValue::Text(String::from("new"))));
        assert!(def.has_default);
    }
}
