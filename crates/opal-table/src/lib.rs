//! # opal-table
//!
//! Row unit-of-work and table gateway over the opal-query builders.
//!
//! This crate provides:
//! - [`Row`]: a single-record unit of work with dirty tracking and a
//!   next-action state machine
//! - [`TableSchema`]: an explicit, ordered schema descriptor (a data
//!   value, not a type hierarchy)
//! - [`Table`] / [`TableSelect`]: the full insert/update/delete/select
//!   lifecycle for one logical table, with primary-key invariants and
//!   an exactly-one-row-affected guard on every write
//! - [`TableEvents`]: synchronous pre/post hooks, no-op by default
//! - [`TableLocator`]: a lazy, cached registry of connection-bound
//!   tables
//!
//! Schema descriptors can be hand-written, generated, or produced at
//! runtime by the opal-info introspector; the engine does not care.

pub mod error;
pub mod events;
pub mod locator;
pub mod row;
pub mod schema;
pub mod select;
pub mod table;

pub use error::{Result, TableError};
pub use events::{DefaultEvents, TableEvents};
pub use locator::TableLocator;
pub use row::{Row, RowAction};
pub use schema::TableSchema;
pub use select::TableSelect;
pub use table::{PrimaryVal, Table};
