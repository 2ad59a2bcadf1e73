//! Table-bound select.
//!
//! Wraps an [`opal_query::Select`] with the owning table's schema and
//! events so fetched records come back as SELECT-clean [`Row`]s.

use std::sync::Arc;

use opal_query::{Record, Select, SqlValue};

use crate::error::{Result, TableError};
use crate::events::TableEvents;
use crate::row::Row;
use crate::schema::TableSchema;
use crate::table::{selected_row, PrimaryVal};

/// A select over one table, producing [`Row`]s.
pub struct TableSelect {
    select: Select,
    schema: Arc<TableSchema>,
    events: Arc<dyn TableEvents>,
}

impl TableSelect {
    pub(crate) fn new(
        select: Select,
        schema: Arc<TableSchema>,
        events: Arc<dyn TableEvents>,
    ) -> Self {
        Self {
            select,
            schema,
            events,
        }
    }

    /// ANDs a verbatim WHERE fragment.
    #[must_use]
    pub fn where_(mut self, cond: &str) -> Self {
        self.select = self.select.where_(cond);
        self
    }

    /// ANDs a WHERE fragment ending in an operator, appending an inline
    /// bound placeholder for the value.
    #[must_use]
    pub fn where_bind(mut self, cond: &str, value: impl Into<SqlValue>) -> Self {
        self.select = self.select.where_bind(cond, value);
        self
    }

    /// ORs a verbatim WHERE fragment.
    #[must_use]
    pub fn or_where(mut self, cond: &str) -> Self {
        self.select = self.select.or_where(cond);
        self
    }

    /// Adds ORDER BY expressions.
    #[must_use]
    pub fn order_by(mut self, cols: &[&str]) -> Self {
        self.select = self.select.order_by(cols);
        self
    }

    /// Sets LIMIT.
    #[must_use]
    pub fn limit(mut self, n: u64) -> Self {
        self.select = self.select.limit(n);
        self
    }

    /// Sets OFFSET.
    #[must_use]
    pub fn offset(mut self, n: u64) -> Self {
        self.select = self.select.offset(n);
        self
    }

    /// Merges named bind values.
    #[must_use]
    pub fn bind_values(mut self, values: Record) -> Self {
        self.select = self.select.bind_values(values);
        self
    }

    /// Constrains the select to the given primary-key values.
    ///
    /// Simple keys take scalars (multiple values become `IN (...)`);
    /// composite keys take records, OR-combined as parenthesized AND
    /// groups. An incomplete composite value fails with
    /// [`TableError::PrimaryValueMissing`], a non-scalar component with
    /// [`TableError::PrimaryValueNotScalar`]. An empty value list
    /// matches nothing.
    pub fn primary_where(mut self, primaries: &[PrimaryVal]) -> Result<Self> {
        if primaries.is_empty() {
            // an empty lookup list matches nothing
            self.select = self.select.where_("1 = 0");
            return Ok(self);
        }
        if self.schema.is_composite() {
            return self.composite_primary_where(primaries);
        }
        let key = self.schema.primary_key.first().cloned().ok_or_else(|| {
            TableError::NoPrimaryKey {
                table: self.schema.name.clone(),
            }
        })?;
        let mut values = Vec::with_capacity(primaries.len());
        for primary in primaries {
            values.push(self.simple_key_value(&key, primary)?);
        }
        let quoted = self.select.dialect().quote_identifier(&key);
        self.select = if values.len() == 1 {
            let value = values.into_iter().next().unwrap_or(SqlValue::Null);
            self.select.where_bind(&format!("{quoted} = "), value)
        } else {
            self.select
                .where_bind(&format!("{quoted} IN "), SqlValue::Array(values))
        };
        Ok(self)
    }

    fn simple_key_value(&self, key: &str, primary: &PrimaryVal) -> Result<SqlValue> {
        let value = match primary {
            PrimaryVal::Scalar(value) => value.clone(),
            PrimaryVal::Composite(record) => record
                .get(key)
                .cloned()
                .ok_or_else(|| TableError::PrimaryValueMissing {
                    column: String::from(key),
                })?,
        };
        if value.is_scalar() {
            Ok(value)
        } else {
            Err(TableError::PrimaryValueNotScalar {
                column: String::from(key),
            })
        }
    }

    fn composite_primary_where(mut self, primaries: &[PrimaryVal]) -> Result<Self> {
        let keys = self.schema.primary_key.clone();
        let dialect = self.select.dialect();
        for primary in primaries {
            let record = match primary {
                PrimaryVal::Composite(record) => record,
                PrimaryVal::Scalar(_) => {
                    // a scalar cannot cover a composite key; the first
                    // key column is reported as the missing part
                    return Err(TableError::PrimaryValueMissing {
                        column: keys.first().cloned().unwrap_or_default(),
                    });
                }
            };
            let mut parts = Vec::with_capacity(keys.len());
            for key in &keys {
                let value =
                    record
                        .get(key)
                        .cloned()
                        .ok_or_else(|| TableError::PrimaryValueMissing {
                            column: key.clone(),
                        })?;
                if !value.is_scalar() {
                    return Err(TableError::PrimaryValueNotScalar { column: key.clone() });
                }
                let placeholder = self.select.bind_inline(value);
                parts.push(format!("{} = {placeholder}", dialect.quote_identifier(key)));
            }
            let group = format!("({})", parts.join(" AND "));
            self.select = self.select.or_where(&group);
        }
        Ok(self)
    }

    /// Renders the statement text.
    #[must_use]
    pub fn statement(&self) -> String {
        self.select.statement()
    }

    /// The accumulated bind values.
    #[must_use]
    pub fn bind_record(&self) -> &Record {
        self.select.bind_record()
    }

    /// Fetches the first matching row, if any.
    pub fn fetch_row(&self) -> Result<Option<Row>> {
        match self.select.fetch_one()? {
            Some(record) => Ok(Some(selected_row(
                &self.schema,
                self.events.as_ref(),
                record,
            )?)),
            None => Ok(None),
        }
    }

    /// Fetches all matching rows.
    pub fn fetch_rows(&self) -> Result<Vec<Row>> {
        self.select
            .fetch_all()?
            .into_iter()
            .map(|record| selected_row(&self.schema, self.events.as_ref(), record))
            .collect()
    }

    /// Fetches the raw records without row wrapping.
    pub fn fetch_all(&self) -> Result<Vec<Record>> {
        self.select.fetch_all().map_err(TableError::from)
    }

    /// Counts the rows matching the current WHERE clause, ignoring any
    /// LIMIT/OFFSET.
    pub fn fetch_count(&self) -> Result<i64> {
        let count = self
            .select
            .clone()
            .reset_columns(&["COUNT(*)"])
            .clear_limit()
            .fetch_value()?;
        match count {
            Some(SqlValue::Int(n)) => Ok(n),
            Some(SqlValue::Text(s)) => Ok(s.parse().unwrap_or(0)),
            _ => Ok(0),
        }
    }
}
