//! # opal-query
//!
//! Dialect-aware SQL statement builders with a named bind-value engine.
//!
//! This crate provides:
//! - [`SqlValue`] / [`Record`]: typed bind values and ordered column maps
//! - [`Bind`]: a clone-safe accumulator for named and generated binds
//! - [`Dialect`]: identifier quoting and capability rules per driver
//! - [`Select`], [`Insert`], [`Update`], [`Delete`]: fluent builders that
//!   render statement text plus a bind record and execute through the
//!   [`Connection`] trait
//!
//! All values are parameterized, never interpolated:
//!
//! ```
//! use std::sync::Arc;
//! use opal_query::{Record, Select, SqlValue};
//! # use opal_query::{Connection, ExecResult};
//! # struct Conn;
//! # impl Connection for Conn {
//! #     fn driver_name(&self) -> &str { "sqlite" }
//! #     fn fetch_all(&self, _: &str, _: &Record) -> opal_query::Result<Vec<Record>> { Ok(vec![]) }
//! #     fn fetch_one(&self, _: &str, _: &Record) -> opal_query::Result<Option<Record>> { Ok(None) }
//! #     fn fetch_column(&self, _: &str, _: &Record) -> opal_query::Result<Vec<SqlValue>> { Ok(vec![]) }
//! #     fn fetch_value(&self, _: &str, _: &Record) -> opal_query::Result<Option<SqlValue>> { Ok(None) }
//! #     fn perform(&self, _: &str, _: &Record) -> opal_query::Result<ExecResult> { Ok(ExecResult::new(0)) }
//! #     fn last_insert_id(&self, _: Option<&str>) -> opal_query::Result<Option<SqlValue>> { Ok(None) }
//! # }
//! let query = Select::new(Arc::new(Conn))
//!     .columns(&["id", "name"])
//!     .from("users")
//!     .where_bind("name = ", "'; DROP TABLE users; --");
//!
//! assert!(query.statement().starts_with("SELECT id, name FROM \"users\" WHERE name = :_"));
//! assert_eq!(query.bind_record().len(), 1);
//! ```

pub mod bind;
pub mod connection;
pub mod delete;
pub mod dialect;
pub mod insert;
pub mod select;
pub mod update;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

pub use bind::Bind;
pub use connection::{Connection, ConnectionLocator, ExecResult, QueryError, Result};
pub use delete::Delete;
pub use dialect::Dialect;
pub use insert::Insert;
pub use select::Select;
pub use update::Update;
pub use value::{Record, SqlValue};
