//! The execution seam.
//!
//! Statement builders render SQL text plus a named bind record; a
//! [`Connection`] implementation owns the actual driver, substitutes the
//! named placeholders, and executes. Everything here is synchronous and
//! blocking: a call returns when the driver returns.

use std::sync::Arc;

use thiserror::Error;

use crate::value::{Record, SqlValue};

/// Errors surfaced by statement execution.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The underlying driver reported a failure.
    #[error("statement execution failed: {message}")]
    Execution {
        /// Driver-reported failure text.
        message: String,
    },
}

impl QueryError {
    /// Creates an execution error from driver-reported text.
    #[must_use]
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }
}

/// Result type alias for execution operations.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Handle returned by [`Connection::perform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    row_count: u64,
}

impl ExecResult {
    /// Creates a handle reporting the given affected-row count.
    #[must_use]
    pub const fn new(row_count: u64) -> Self {
        Self { row_count }
    }

    /// Number of rows affected by the statement.
    #[must_use]
    pub const fn row_count(&self) -> u64 {
        self.row_count
    }
}

/// A synchronous, PDO-like execution interface.
///
/// Implementations receive the rendered statement text and the named
/// bind record; placeholder substitution (`:name`) is theirs. Fetched
/// rows come back as ordered [`Record`]s.
pub trait Connection: Send + Sync {
    /// Driver tag, e.g. `"mysql"`, `"pgsql"`, `"sqlite"`. Selects the
    /// quoting dialect and the schema-introspection adapter.
    fn driver_name(&self) -> &str;

    /// Fetches all rows.
    fn fetch_all(&self, statement: &str, params: &Record) -> Result<Vec<Record>>;

    /// Fetches the first row, if any.
    fn fetch_one(&self, statement: &str, params: &Record) -> Result<Option<Record>>;

    /// Fetches the first column of every row.
    fn fetch_column(&self, statement: &str, params: &Record) -> Result<Vec<SqlValue>>;

    /// Fetches the first value of the first row, if any.
    fn fetch_value(&self, statement: &str, params: &Record) -> Result<Option<SqlValue>>;

    /// Executes and returns the affected-row count.
    fn fetch_affected(&self, statement: &str, params: &Record) -> Result<u64> {
        Ok(self.perform(statement, params)?.row_count())
    }

    /// Executes a statement that does not produce rows.
    fn perform(&self, statement: &str, params: &Record) -> Result<ExecResult>;

    /// Last auto-generated id, optionally for a named sequence
    /// (Postgres). `None` when the driver has nothing to report.
    fn last_insert_id(&self, sequence: Option<&str>) -> Result<Option<SqlValue>>;
}

/// A read/write connection pair.
///
/// Reads (selects) go to the read side, writes (insert/update/delete) to
/// the write side. Both sides may be the same connection.
#[derive(Clone)]
pub struct ConnectionLocator {
    read: Arc<dyn Connection>,
    write: Arc<dyn Connection>,
}

impl ConnectionLocator {
    /// Creates a locator with distinct read and write connections.
    #[must_use]
    pub fn new(read: Arc<dyn Connection>, write: Arc<dyn Connection>) -> Self {
        Self { read, write }
    }

    /// Creates a locator that uses one connection for both sides.
    #[must_use]
    pub fn single(connection: Arc<dyn Connection>) -> Self {
        Self {
            read: Arc::clone(&connection),
            write: connection,
        }
    }

    /// The read-side connection.
    #[must_use]
    pub fn read(&self) -> Arc<dyn Connection> {
        Arc::clone(&self.read)
    }

    /// The write-side connection.
    #[must_use]
    pub fn write(&self) -> Arc<dyn Connection> {
        Arc::clone(&self.write)
    }
}
