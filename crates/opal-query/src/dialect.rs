//! SQL dialect support.
//!
//! Different databases quote identifiers differently and differ on
//! `RETURNING` and last-insert-id retrieval. The quoting rules are a
//! pure function of the driver tag string reported by the connection.

/// Identifier-quoting and capability rules for one database family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// MySQL / MariaDB: backtick quoting.
    Mysql,
    /// PostgreSQL: double-quote quoting, `RETURNING`, sequences.
    Pgsql,
    /// SQLite: double-quote quoting, `RETURNING` (3.35+).
    Sqlite,
    /// SQL Server: bracket quoting.
    Sqlsrv,
    /// ANSI fallback for unrecognized drivers.
    Generic,
}

impl Dialect {
    /// Maps a driver tag to its dialect. Unrecognized tags fall back to
    /// [`Dialect::Generic`] (ANSI double-quote rules).
    #[must_use]
    pub fn from_driver(driver: &str) -> Self {
        match driver {
            "mysql" | "mariadb" => Self::Mysql,
            "pgsql" | "postgres" | "postgresql" => Self::Pgsql,
            "sqlite" | "sqlite3" => Self::Sqlite,
            "sqlsrv" | "mssql" => Self::Sqlsrv,
            _ => Self::Generic,
        }
    }

    /// Returns the dialect name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Pgsql => "pgsql",
            Self::Sqlite => "sqlite",
            Self::Sqlsrv => "sqlsrv",
            Self::Generic => "generic",
        }
    }

    /// Quotes an identifier, doubling any embedded quote characters.
    ///
    /// Dotted names quote each part separately, so `schema.table`
    /// renders as `"schema"."table"`.
    #[must_use]
    pub fn quote_identifier(self, name: &str) -> String {
        name.split('.')
            .map(|part| self.quote_part(part.trim()))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn quote_part(self, part: &str) -> String {
        match self {
            Self::Mysql => format!("`{}`", part.replace('`', "``")),
            Self::Sqlsrv => format!("[{}]", part.replace(']', "]]")),
            Self::Pgsql | Self::Sqlite | Self::Generic => {
                format!("\"{}\"", part.replace('"', "\"\""))
            }
        }
    }

    /// Whether the dialect supports a `RETURNING` clause on writes.
    #[must_use]
    pub const fn supports_returning(self) -> bool {
        matches!(self, Self::Pgsql | Self::Sqlite)
    }

    /// The sequence name to pass to `last_insert_id`, when the dialect
    /// retrieves generated keys by sequence (Postgres only).
    #[must_use]
    pub fn last_insert_id_name(self, table: &str, column: &str) -> Option<String> {
        match self {
            Self::Pgsql => Some(format!("{table}_{column}_seq")),
            _ => None,
        }
    }
}
