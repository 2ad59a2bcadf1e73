//! Introspection error types.

use opal_query::QueryError;
use thiserror::Error;

/// Errors surfaced while reading database catalogs.
#[derive(Debug, Error)]
pub enum InfoError {
    /// The connection's driver has no schema adapter.
    #[error("no schema adapter for driver '{driver}'")]
    UnsupportedDriver {
        /// Driver name the connection reported.
        driver: String,
    },

    /// The underlying catalog query failed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Convenience alias for introspection results.
pub type Result<T> = std::result::Result<T, InfoError>;
