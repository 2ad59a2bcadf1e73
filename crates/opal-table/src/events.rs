//! Table lifecycle hooks.
//!
//! One [`TableEvents`] instance is paired with each table. All hooks are
//! synchronous, no-op by default, and fallible: an error from a hook
//! aborts the operation before the row's last action is advanced.

use opal_query::{Delete, ExecResult, Insert, Record, Select, Update};

use crate::error::Result;
use crate::row::Row;
use crate::schema::TableSchema;

/// Pre/post hooks around the table's select, insert, update, and delete
/// lifecycles. The `modify_*` hooks take and return the builder so they
/// can extend it fluently; the `before_*` write hooks may return an
/// override for the column map the statement is built from.
#[allow(unused_variables)]
pub trait TableEvents: Send + Sync {
    /// Adjusts a select before it runs.
    fn modify_select(&self, schema: &TableSchema, select: Select) -> Result<Select> {
        Ok(select)
    }

    /// Adjusts a freshly selected row before it is returned.
    fn modify_selected_row(&self, schema: &TableSchema, row: &mut Row) -> Result<()> {
        Ok(())
    }

    /// Optionally overrides the column map an insert is built from
    /// (default: the row's current values).
    fn before_insert_row(&self, schema: &TableSchema, row: &Row) -> Result<Option<Record>> {
        Ok(None)
    }

    /// Adjusts the insert statement before it runs.
    fn modify_insert(&self, schema: &TableSchema, row: &Row, insert: Insert) -> Result<Insert> {
        Ok(insert)
    }

    /// Runs after a successful insert, before the row snapshot resets.
    fn after_insert_row(
        &self,
        schema: &TableSchema,
        row: &mut Row,
        result: ExecResult,
    ) -> Result<()> {
        Ok(())
    }

    /// Optionally overrides the diff an update is built from (default:
    /// the row's computed diff).
    fn before_update_row(&self, schema: &TableSchema, row: &Row) -> Result<Option<Record>> {
        Ok(None)
    }

    /// Adjusts the update statement before it runs.
    fn modify_update(&self, schema: &TableSchema, row: &Row, update: Update) -> Result<Update> {
        Ok(update)
    }

    /// Runs after a successful update, before the row snapshot resets.
    fn after_update_row(
        &self,
        schema: &TableSchema,
        row: &mut Row,
        result: ExecResult,
    ) -> Result<()> {
        Ok(())
    }

    /// Runs before a delete statement is built.
    fn before_delete_row(&self, schema: &TableSchema, row: &Row) -> Result<()> {
        Ok(())
    }

    /// Adjusts the delete statement before it runs.
    fn modify_delete(&self, schema: &TableSchema, row: &Row, delete: Delete) -> Result<Delete> {
        Ok(delete)
    }

    /// Runs after a successful delete, before the row is marked deleted.
    fn after_delete_row(
        &self,
        schema: &TableSchema,
        row: &mut Row,
        result: ExecResult,
    ) -> Result<()> {
        Ok(())
    }
}

/// The default hook set: every hook is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultEvents;

impl TableEvents for DefaultEvents {}
