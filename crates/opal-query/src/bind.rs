//! Named bind-value engine.
//!
//! Accumulates named and generated positional parameters for a prepared
//! statement. Generated placeholder names embed a per-instance sequence
//! id so that cloned builders never collide with the original or with
//! other clones.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::value::{Record, SqlValue};

/// Process-wide instance counter. Every `Bind` (constructed or cloned)
/// takes the next id, which is embedded in every placeholder it mints.
static INSTANCE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Accumulator for statement bind values.
///
/// Inline binds are stored under generated names of the form
/// `_<instance>_<n>_`; named binds under the caller-supplied name.
/// This component never fails: storing a value under an existing name
/// overwrites it.
#[derive(Debug)]
pub struct Bind {
    instance: u64,
    inline_count: u64,
    values: Record,
}

impl Bind {
    /// Creates an empty bind accumulator with a fresh instance id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            instance: INSTANCE_SEQ.fetch_add(1, Ordering::Relaxed) + 1,
            inline_count: 0,
            values: Record::new(),
        }
    }

    /// Stores a value under a generated placeholder name and returns the
    /// placeholder text to splice into the statement (`:_<i>_<n>_`).
    ///
    /// Array values expand element-wise: each element gets its own
    /// placeholder and the returned text is the parenthesized list,
    /// ready for an `IN (...)` clause.
    pub fn inline(&mut self, value: impl Into<SqlValue>) -> String {
        match value.into() {
            SqlValue::Array(values) => {
                let placeholders: Vec<String> =
                    values.into_iter().map(|v| self.inline_scalar(v)).collect();
                format!("({})", placeholders.join(", "))
            }
            value => self.inline_scalar(value),
        }
    }

    fn inline_scalar(&mut self, value: SqlValue) -> String {
        self.inline_count += 1;
        let name = format!("_{}_{}_", self.instance, self.inline_count);
        self.values.insert(name.clone(), value);
        format!(":{name}")
    }

    /// Stores or overwrites a named bind value.
    pub fn set_value(&mut self, name: &str, value: impl Into<SqlValue>) {
        self.values.insert(String::from(name), value.into());
    }

    /// Bulk-applies [`Self::set_value`] for every entry of the record.
    pub fn set_values(&mut self, values: Record) {
        for (name, value) in values {
            self.values.insert(name, value);
        }
    }

    /// Removes a named bind value, if present.
    pub fn remove(&mut self, name: &str) {
        self.values.shift_remove(name);
    }

    /// Returns the accumulated name→value map.
    #[must_use]
    pub const fn to_record(&self) -> &Record {
        &self.values
    }
}

impl Default for Bind {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Bind {
    /// Clones the accumulated values but mints a fresh instance id, so
    /// placeholders generated by the clone are disjoint from the
    /// original's and from any other clone's.
    fn clone(&self) -> Self {
        Self {
            instance: INSTANCE_SEQ.fetch_add(1, Ordering::Relaxed) + 1,
            inline_count: self.inline_count,
            values: self.values.clone(),
        }
    }
}
