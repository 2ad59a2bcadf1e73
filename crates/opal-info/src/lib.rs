//! Cross-database schema introspection.
//!
//! [`SchemaInfo`] reads table and column catalogs through an abstract
//! connection and normalizes what each engine reports into one
//! [`ColumnDefinition`] shape. The adapter is chosen from the
//! connection's driver name; MySQL/MariaDB, PostgreSQL, and SQLite are
//! supported.
//!
//! ```no_run
//! use std::sync::Arc;
//! use opal_info::SchemaInfo;
//! use opal_query::Connection;
//!
//! fn describe(conn: Arc<dyn Connection>) -> opal_info::Result<()> {
//!     let info = SchemaInfo::new(conn)?;
//!     for table in info.list_tables("app")? {
//!         let columns = info.list_columns("app", &table)?;
//!         println!("{table}: {} columns", columns.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod column;
pub mod error;

mod catalog;
mod mysql;
mod pgsql;
mod sqlite;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

pub use crate::column::ColumnDefinition;
pub use crate::error::{InfoError, Result};
pub use crate::mysql::MysqlAdapter;
pub use crate::pgsql::PgsqlAdapter;
pub use crate::sqlite::SqliteAdapter;

use opal_query::Connection;

/// Engine-specific catalog reader.
///
/// Each adapter turns one engine's catalog into the normalized column
/// shape. Adapters are stateless; the connection is passed per call.
pub trait SchemaAdapter: Send + Sync {
    /// Base-table names in the schema, ordered by name.
    fn list_tables(&self, connection: &Arc<dyn Connection>, schema: &str) -> Result<Vec<String>>;

    /// Column definitions for a table, keyed by column name in ordinal
    /// order.
    fn list_columns(
        &self,
        connection: &Arc<dyn Connection>,
        schema: &str,
        table: &str,
    ) -> Result<IndexMap<String, ColumnDefinition>>;

    /// Name of the table's auto-increment sequence, for engines that
    /// use one (Postgres). `None` elsewhere.
    fn autoinc_sequence(
        &self,
        connection: &Arc<dyn Connection>,
        schema: &str,
        table: &str,
    ) -> Result<Option<String>>;
}

/// Facade over the engine adapters.
///
/// Built from a connection; fails fast when the driver has no adapter.
pub struct SchemaInfo {
    connection: Arc<dyn Connection>,
    adapter: Box<dyn SchemaAdapter>,
}

impl fmt::Debug for SchemaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaInfo")
            .field("driver", &self.connection.driver_name())
            .finish_non_exhaustive()
    }
}

impl SchemaInfo {
    /// Selects the adapter matching the connection's driver name.
    ///
    /// # Errors
    ///
    /// Returns [`InfoError::UnsupportedDriver`] when no adapter covers
    /// the driver.
    pub fn new(connection: Arc<dyn Connection>) -> Result<Self> {
        let driver = connection.driver_name().to_lowercase();
        let adapter: Box<dyn SchemaAdapter> = match driver.as_str() {
            "mysql" | "mariadb" => Box::new(MysqlAdapter),
            "pgsql" | "postgres" | "postgresql" => Box::new(PgsqlAdapter),
            "sqlite" | "sqlite3" => Box::new(SqliteAdapter),
            _ => return Err(InfoError::UnsupportedDriver { driver }),
        };
        debug!(driver, "schema adapter selected");
        Ok(Self { connection, adapter })
    }

    /// Base-table names in the schema.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog query fails.
    pub fn list_tables(&self, schema: &str) -> Result<Vec<String>> {
        self.adapter.list_tables(&self.connection, schema)
    }

    /// Normalized column definitions for a table, in ordinal order.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog query fails.
    pub fn list_columns(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<IndexMap<String, ColumnDefinition>> {
        self.adapter.list_columns(&self.connection, schema, table)
    }

    /// The table's auto-increment sequence name, when the engine uses
    /// one.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog query fails.
    pub fn autoinc_sequence(&self, schema: &str, table: &str) -> Result<Option<String>> {
        self.adapter.autoinc_sequence(&self.connection, schema, table)
    }
}
