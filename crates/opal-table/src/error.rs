//! Error types for the table layer.
//!
//! Every variant is a local, non-retryable condition signaling a
//! programmer or data-integrity error. Nothing here is retried or logged
//! internally; errors surface synchronously to the caller.

use opal_query::{QueryError, SqlValue};

/// Errors raised by rows, tables, and the table locator.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Access or mutation of a column the row does not declare.
    #[error("row has no column '{column}'")]
    PropertyDoesNotExist {
        /// The undeclared column.
        column: String,
    },

    /// Mutation attempted on a row whose last action was DELETE.
    #[error("row is immutable after deletion")]
    ImmutableAfterDeleted,

    /// Update or delete attempted on a table with no primary key.
    #[error("table '{table}' has no primary key")]
    NoPrimaryKey {
        /// The table without a key declaration.
        table: String,
    },

    /// The update diff contained a change to a primary-key column.
    #[error("primary key column '{column}' changed from {old:?} to {new:?}")]
    PrimaryValueChanged {
        /// The primary-key column.
        column: String,
        /// Value at the last snapshot.
        old: SqlValue,
        /// Mutated value.
        new: SqlValue,
    },

    /// A composite-key lookup omitted a required key column.
    #[error("composite key part '{column}' is missing")]
    PrimaryValueMissing {
        /// The missing key column.
        column: String,
    },

    /// A composite-key lookup supplied a non-scalar key component.
    #[error("composite key part '{column}' is not a scalar value")]
    PrimaryValueNotScalar {
        /// The offending key column.
        column: String,
    },

    /// A write affected a row count other than exactly one. Signals a
    /// race, a stale row, or a missing record.
    #[error("expected {expected} affected row(s), got {actual}")]
    UnexpectedRowCount {
        /// Rows the operation must affect.
        expected: u64,
        /// Rows actually affected.
        actual: u64,
    },

    /// The locator was asked for a table name it has no factory for.
    #[error("no table registered under '{name}'")]
    TableNotRegistered {
        /// The unknown table name.
        name: String,
    },

    /// An events hook aborted the operation.
    #[error("table event aborted: {0}")]
    Event(String),

    /// Statement execution failed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
