//! Single-record unit of work.
//!
//! A [`Row`] holds the current column values, the snapshot taken when it
//! was last persisted, and the last persistence action performed. From
//! those it computes the diff to write and the next action required.

use opal_query::{Record, SqlValue};

use crate::error::{Result, TableError};

/// Persistence action last performed on (or next required for) a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Loaded from storage.
    Select,
    /// Inserted.
    Insert,
    /// Updated.
    Update,
    /// Deleted. Terminal: the row becomes immutable.
    Delete,
}

/// A mutable record with dirty-state tracking.
///
/// The column set is fixed at construction; access to an undeclared
/// column fails with [`TableError::PropertyDoesNotExist`]. Once the last
/// action is [`RowAction::Delete`], all mutation fails with
/// [`TableError::ImmutableAfterDeleted`].
#[derive(Debug, Clone)]
pub struct Row {
    store: Record,
    init: Record,
    last_action: Option<RowAction>,
    is_clean: bool,
    is_delete: bool,
}

impl Row {
    /// Creates a row from its initial column values. The keys become the
    /// row's fixed column set and the values its first snapshot.
    #[must_use]
    pub fn new(columns: Record) -> Self {
        Self {
            store: columns.clone(),
            init: columns,
            last_action: None,
            is_clean: false,
            is_delete: false,
        }
    }

    /// The declared column names, in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.store.keys().map(String::as_str)
    }

    /// Whether the row declares the column.
    #[must_use]
    pub fn has(&self, column: &str) -> bool {
        self.store.contains_key(column)
    }

    /// Returns the current value of a declared column.
    pub fn get(&self, column: &str) -> Result<&SqlValue> {
        self.store
            .get(column)
            .ok_or_else(|| TableError::PropertyDoesNotExist {
                column: String::from(column),
            })
    }

    /// Sets the value of a declared column, marking the row dirty.
    pub fn set(&mut self, column: &str, value: impl Into<SqlValue>) -> Result<()> {
        if self.last_action == Some(RowAction::Delete) {
            return Err(TableError::ImmutableAfterDeleted);
        }
        let slot = self
            .store
            .get_mut(column)
            .ok_or_else(|| TableError::PropertyDoesNotExist {
                column: String::from(column),
            })?;
        *slot = value.into();
        self.is_clean = false;
        Ok(())
    }

    /// Sets a declared column to NULL, under the same preconditions as
    /// [`Row::set`].
    pub fn remove(&mut self, column: &str) -> Result<()> {
        self.set(column, SqlValue::Null)
    }

    /// A copy of the current column values.
    #[must_use]
    pub fn copy(&self) -> Record {
        self.store.clone()
    }

    /// The value a column had at the last snapshot.
    pub fn init_value(&self, column: &str) -> Result<&SqlValue> {
        self.init
            .get(column)
            .ok_or_else(|| TableError::PropertyDoesNotExist {
                column: String::from(column),
            })
    }

    /// Columns whose current value differs from the snapshot, under the
    /// loose comparison rule: booleans coerce to 0/1, two numeric sides
    /// compare numerically, everything else strictly.
    #[must_use]
    pub fn diff(&self) -> Record {
        self.store
            .iter()
            .filter(|(column, value)| {
                self.init
                    .get(*column)
                    .is_none_or(|init| !value.loosely_equals(init))
            })
            .map(|(column, value)| (column.clone(), value.clone()))
            .collect()
    }

    /// The last persistence action performed, if any.
    #[must_use]
    pub const fn last_action(&self) -> Option<RowAction> {
        self.last_action
    }

    /// Whether the row is flagged for deletion.
    #[must_use]
    pub const fn is_delete(&self) -> bool {
        self.is_delete
    }

    /// Flags (or unflags) the row for deletion without touching values.
    pub fn set_delete(&mut self, delete: bool) {
        self.is_delete = delete;
    }

    /// Computes the next action required to persist this row.
    ///
    /// Never persisted: INSERT (or nothing if delete-flagged). Already
    /// deleted or delete-flagged: DELETE. Clean: nothing. Otherwise
    /// UPDATE when the diff is non-empty; an empty diff memoizes the
    /// clean flag and yields nothing.
    pub fn next_action(&mut self) -> Option<RowAction> {
        if self.last_action.is_none() {
            if self.is_delete {
                return None;
            }
            return Some(RowAction::Insert);
        }
        if self.is_delete {
            if self.last_action == Some(RowAction::Delete) {
                return None;
            }
            return Some(RowAction::Delete);
        }
        if self.is_clean {
            return None;
        }
        if self.diff().is_empty() {
            self.is_clean = true;
            return None;
        }
        Some(RowAction::Update)
    }

    /// Records a performed action, resetting the snapshot to the current
    /// values and marking the row clean.
    pub fn set_last_action(&mut self, action: RowAction) {
        self.last_action = Some(action);
        self.init = self.store.clone();
        self.is_clean = true;
    }
}
