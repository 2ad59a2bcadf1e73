//! Table gateway.
//!
//! A [`Table`] binds one [`TableSchema`] to a read/write connection pair
//! and an events hook set, and drives the full insert/update/delete/
//! select lifecycle for [`Row`]s of that table. Each write operation is
//! split into a `*_prepare` step (build the statement, run the before
//! and modify hooks) and a `*_perform` step (execute, enforce the
//! row-count invariant, run the after hook, advance the row state).

use std::fmt;
use std::sync::Arc;

use opal_query::{
    ConnectionLocator, Delete, ExecResult, Insert, Record, SqlValue, Update,
};
use tracing::debug;

use crate::error::{Result, TableError};
use crate::events::TableEvents;
use crate::row::{Row, RowAction};
use crate::schema::TableSchema;
use crate::select::TableSelect;

/// A primary-key specification for row lookup: a scalar for simple
/// keys, a column→value record for composite keys.
#[derive(Debug, Clone)]
pub enum PrimaryVal {
    /// Simple-key value.
    Scalar(SqlValue),
    /// Composite-key column values.
    Composite(Record),
}

impl From<SqlValue> for PrimaryVal {
    fn from(value: SqlValue) -> Self {
        Self::Scalar(value)
    }
}

impl From<i64> for PrimaryVal {
    fn from(value: i64) -> Self {
        Self::Scalar(SqlValue::Int(value))
    }
}

impl From<&str> for PrimaryVal {
    fn from(value: &str) -> Self {
        Self::Scalar(SqlValue::from(value))
    }
}

impl From<String> for PrimaryVal {
    fn from(value: String) -> Self {
        Self::Scalar(SqlValue::Text(value))
    }
}

impl From<Record> for PrimaryVal {
    fn from(record: Record) -> Self {
        Self::Composite(record)
    }
}

/// The gateway for one logical table.
pub struct Table {
    schema: Arc<TableSchema>,
    connections: ConnectionLocator,
    events: Arc<dyn TableEvents>,
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl Table {
    /// Creates a table gateway over the given schema, connections, and
    /// events hook set.
    #[must_use]
    pub fn new(
        schema: TableSchema,
        connections: ConnectionLocator,
        events: Arc<dyn TableEvents>,
    ) -> Self {
        Self {
            schema: Arc::new(schema),
            connections,
            events,
        }
    }

    /// The table's schema descriptor.
    #[must_use]
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// The read/write connection pair.
    #[must_use]
    pub const fn connections(&self) -> &ConnectionLocator {
        &self.connections
    }

    /// Starts a select over this table on the read connection, with the
    /// table's columns pre-quoted, after the `modify_select` hook.
    pub fn select(&self) -> Result<TableSelect> {
        let read = self.connections.read();
        let dialect = opal_query::Dialect::from_driver(read.driver_name());
        let columns: Vec<String> = self
            .schema
            .columns
            .iter()
            .map(|col| dialect.quote_identifier(col))
            .collect();
        let column_refs: Vec<&str> = columns.iter().map(String::as_str).collect();
        let select = opal_query::Select::new(read)
            .columns(&column_refs)
            .from(&self.schema.name);
        let select = self.events.modify_select(&self.schema, select)?;
        Ok(TableSelect::new(
            select,
            Arc::clone(&self.schema),
            Arc::clone(&self.events),
        ))
    }

    /// Constructs a new, never-persisted row. Declared defaults fill
    /// columns not present in `columns`; an undeclared key fails with
    /// [`TableError::PropertyDoesNotExist`].
    pub fn new_row(&self, columns: Record) -> Result<Row> {
        let mut store = self.schema.default_record();
        for (col, value) in columns {
            let slot = store
                .get_mut(&col)
                .ok_or(TableError::PropertyDoesNotExist { column: col })?;
            *slot = value;
        }
        Ok(Row::new(store))
    }

    /// Wraps a fetched record as a selected row: runs the
    /// `modify_selected_row` hook and marks the row SELECT-clean.
    pub fn new_selected_row(&self, columns: Record) -> Result<Row> {
        selected_row(&self.schema, self.events.as_ref(), columns)
    }

    /// Fetches one row by primary key, or `None` when there is no match.
    pub fn fetch_row(&self, primary: impl Into<PrimaryVal>) -> Result<Option<Row>> {
        let select = self.select()?.primary_where(&[primary.into()])?;
        select.fetch_row()
    }

    /// Fetches all rows matching the given primary-key values.
    pub fn fetch_rows(&self, primaries: Vec<PrimaryVal>) -> Result<Vec<Row>> {
        let select = self.select()?.primary_where(&primaries)?;
        select.fetch_rows()
    }

    /// Inserts the row, requiring exactly one affected row. On success
    /// the autoincrement column (when configured and unset) is filled
    /// from the connection's last-insert-id and the row is snapshotted
    /// as INSERT-clean.
    pub fn insert_row(&self, row: &mut Row) -> Result<ExecResult> {
        let insert = self.insert_row_prepare(row)?;
        self.insert_row_perform(row, &insert)
    }

    /// Builds the insert statement for a row and runs the insert hooks.
    pub fn insert_row_prepare(&self, row: &Row) -> Result<Insert> {
        let columns = match self.events.before_insert_row(&self.schema, row)? {
            Some(override_columns) => override_columns,
            None => row.copy(),
        };
        let mut insert = Insert::new(self.connections.write())
            .into(&self.schema.name)
            .columns(columns);
        if let Some(autoinc) = &self.schema.autoinc_column {
            if row.get(autoinc).ok() == Some(&SqlValue::Null) {
                insert = insert.without_column(autoinc);
            }
        }
        self.events.modify_insert(&self.schema, row, insert)
    }

    /// Executes a prepared insert and advances the row state.
    pub fn insert_row_perform(&self, row: &mut Row, insert: &Insert) -> Result<ExecResult> {
        let result = insert.perform()?;
        if result.row_count() != 1 {
            return Err(TableError::UnexpectedRowCount {
                expected: 1,
                actual: result.row_count(),
            });
        }
        if let Some(autoinc) = self.schema.autoinc_column.clone() {
            if row.get(&autoinc).ok() == Some(&SqlValue::Null) {
                let sequence = insert.last_insert_id_name(&autoinc);
                if let Some(id) = insert.last_insert_id(sequence.as_deref())? {
                    row.set(&autoinc, id)?;
                }
            }
        }
        self.events.after_insert_row(&self.schema, row, result)?;
        row.set_last_action(RowAction::Insert);
        debug!(table = %self.schema.name, "row inserted");
        Ok(result)
    }

    /// Updates the row's changed columns, keyed by primary-key equality.
    /// Returns `None` when nothing changed (a no-op, not an error).
    pub fn update_row(&self, row: &mut Row) -> Result<Option<ExecResult>> {
        let update = self.update_row_prepare(row)?;
        self.update_row_perform(row, &update)
    }

    /// Builds the update statement from the row diff and runs the
    /// update hooks. A diff touching a primary-key column fails with
    /// [`TableError::PrimaryValueChanged`].
    pub fn update_row_prepare(&self, row: &Row) -> Result<Update> {
        let diff = match self.events.before_update_row(&self.schema, row)? {
            Some(override_diff) => override_diff,
            None => row.diff(),
        };
        for key in &self.schema.primary_key {
            if diff.contains_key(key) {
                return Err(TableError::PrimaryValueChanged {
                    column: key.clone(),
                    old: row.init_value(key)?.clone(),
                    new: row.get(key)?.clone(),
                });
            }
        }
        let mut update = Update::new(self.connections.write())
            .table(&self.schema.name)
            .columns(diff);
        let dialect = update.dialect();
        for key in &self.schema.primary_key {
            let quoted = dialect.quote_identifier(key);
            update = update.where_bind(&format!("{quoted} = "), row.init_value(key)?.clone());
        }
        self.events.modify_update(&self.schema, row, update)
    }

    /// Executes a prepared update and advances the row state. Returns
    /// `None` without executing when the statement has no SET clause.
    pub fn update_row_perform(&self, row: &mut Row, update: &Update) -> Result<Option<ExecResult>> {
        if !update.has_columns() {
            return Ok(None);
        }
        if self.schema.primary_key.is_empty() {
            return Err(TableError::NoPrimaryKey {
                table: self.schema.name.clone(),
            });
        }
        let result = update.perform()?;
        if result.row_count() != 1 {
            return Err(TableError::UnexpectedRowCount {
                expected: 1,
                actual: result.row_count(),
            });
        }
        self.events.after_update_row(&self.schema, row, result)?;
        row.set_last_action(RowAction::Update);
        debug!(table = %self.schema.name, "row updated");
        Ok(Some(result))
    }

    /// Deletes the row, keyed by primary-key equality. Idempotent:
    /// returns `None` when the row was already deleted.
    pub fn delete_row(&self, row: &mut Row) -> Result<Option<ExecResult>> {
        if row.last_action() == Some(RowAction::Delete) {
            return Ok(None);
        }
        let delete = self.delete_row_prepare(row)?;
        self.delete_row_perform(row, &delete).map(Some)
    }

    /// Builds the delete statement keyed by the primary key and runs
    /// the delete hooks.
    pub fn delete_row_prepare(&self, row: &Row) -> Result<Delete> {
        if self.schema.primary_key.is_empty() {
            return Err(TableError::NoPrimaryKey {
                table: self.schema.name.clone(),
            });
        }
        self.events.before_delete_row(&self.schema, row)?;
        let mut delete = Delete::new(self.connections.write()).from(&self.schema.name);
        let dialect = delete.dialect();
        for key in &self.schema.primary_key {
            let quoted = dialect.quote_identifier(key);
            delete = delete.where_bind(&format!("{quoted} = "), row.init_value(key)?.clone());
        }
        self.events.modify_delete(&self.schema, row, delete)
    }

    /// Executes a prepared delete and advances the row state.
    pub fn delete_row_perform(&self, row: &mut Row, delete: &Delete) -> Result<ExecResult> {
        let result = delete.perform()?;
        if result.row_count() != 1 {
            return Err(TableError::UnexpectedRowCount {
                expected: 1,
                actual: result.row_count(),
            });
        }
        self.events.after_delete_row(&self.schema, row, result)?;
        row.set_last_action(RowAction::Delete);
        debug!(table = %self.schema.name, "row deleted");
        Ok(result)
    }
}

/// Builds a SELECT-clean row from a fetched record, running the
/// `modify_selected_row` hook first.
pub(crate) fn selected_row(
    schema: &TableSchema,
    events: &dyn TableEvents,
    columns: Record,
) -> Result<Row> {
    let mut row = Row::new(columns);
    events.modify_selected_row(schema, &mut row)?;
    row.set_last_action(RowAction::Select);
    Ok(row)
}
