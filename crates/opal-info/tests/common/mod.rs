//! Scripted connection double for introspection tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use opal_query::{Connection, ExecResult, Record, Result, SqlValue};

/// Replays queued catalog rows, recording every statement it runs.
pub struct CatalogConnection {
    driver: String,
    fetches: Mutex<VecDeque<Vec<Record>>>,
    statements: Mutex<Vec<String>>,
}

impl CatalogConnection {
    pub fn new(driver: &str) -> Arc<Self> {
        Arc::new(Self {
            driver: String::from(driver),
            fetches: Mutex::new(VecDeque::new()),
            statements: Mutex::new(Vec::new()),
        })
    }

    pub fn queue_rows(&self, rows: Vec<Record>) {
        self.fetches.lock().unwrap().push_back(rows);
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    fn record(&self, statement: &str) {
        self.statements.lock().unwrap().push(String::from(statement));
    }

    fn next_fetch(&self) -> Vec<Record> {
        self.fetches.lock().unwrap().pop_front().unwrap_or_default()
    }
}

impl Connection for CatalogConnection {
    fn driver_name(&self) -> &str {
        &self.driver
    }

    fn fetch_all(&self, statement: &str, _params: &Record) -> Result<Vec<Record>> {
        self.record(statement);
        Ok(self.next_fetch())
    }

    fn fetch_one(&self, statement: &str, _params: &Record) -> Result<Option<Record>> {
        self.record(statement);
        Ok(self.next_fetch().into_iter().next())
    }

    fn fetch_column(&self, statement: &str, _params: &Record) -> Result<Vec<SqlValue>> {
        self.record(statement);
        Ok(self
            .next_fetch()
            .iter()
            .filter_map(|row| row.values().next().cloned())
            .collect())
    }

    fn fetch_value(&self, statement: &str, _params: &Record) -> Result<Option<SqlValue>> {
        self.record(statement);
        Ok(self
            .next_fetch()
            .first()
            .and_then(|row| row.values().next().cloned()))
    }

    fn perform(&self, statement: &str, _params: &Record) -> Result<ExecResult> {
        self.record(statement);
        Ok(ExecResult::new(0))
    }

    fn last_insert_id(&self, _sequence: Option<&str>) -> Result<Option<SqlValue>> {
        Ok(None)
    }
}

/// Builds a record from literal pairs.
pub fn record(pairs: &[(&str, SqlValue)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (String::from(*k), v.clone()))
        .collect()
}
