//! Scripted connection double for lifecycle tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use opal_query::{Connection, ConnectionLocator, ExecResult, Record, Result, SqlValue};

/// Replays queued fetch results and affected-row counts, recording
/// every statement it executes.
pub struct ScriptedConnection {
    driver: String,
    fetches: Mutex<VecDeque<Vec<Record>>>,
    row_counts: Mutex<VecDeque<u64>>,
    last_insert_id: Mutex<Option<SqlValue>>,
    statements: Mutex<Vec<(String, Record)>>,
}

impl ScriptedConnection {
    pub fn new(driver: &str) -> Arc<Self> {
        Arc::new(Self {
            driver: String::from(driver),
            fetches: Mutex::new(VecDeque::new()),
            row_counts: Mutex::new(VecDeque::new()),
            last_insert_id: Mutex::new(None),
            statements: Mutex::new(Vec::new()),
        })
    }

    pub fn locator(self: &Arc<Self>) -> ConnectionLocator {
        ConnectionLocator::single(Arc::clone(self) as Arc<dyn Connection>)
    }

    pub fn queue_rows(&self, rows: Vec<Record>) {
        self.fetches.lock().unwrap().push_back(rows);
    }

    pub fn queue_row_count(&self, n: u64) {
        self.row_counts.lock().unwrap().push_back(n);
    }

    pub fn set_last_insert_id(&self, value: SqlValue) {
        *self.last_insert_id.lock().unwrap() = Some(value);
    }

    pub fn last_statement(&self) -> String {
        self.statements
            .lock()
            .unwrap()
            .last()
            .map(|(sql, _)| sql.clone())
            .unwrap_or_default()
    }

    pub fn last_params(&self) -> Record {
        self.statements
            .lock()
            .unwrap()
            .last()
            .map(|(_, params)| params.clone())
            .unwrap_or_default()
    }

    fn record(&self, statement: &str, params: &Record) {
        self.statements
            .lock()
            .unwrap()
            .push((String::from(statement), params.clone()));
    }

    fn next_fetch(&self) -> Vec<Record> {
        self.fetches.lock().unwrap().pop_front().unwrap_or_default()
    }
}

impl Connection for ScriptedConnection {
    fn driver_name(&self) -> &str {
        &self.driver
    }

    fn fetch_all(&self, statement: &str, params: &Record) -> Result<Vec<Record>> {
        self.record(statement, params);
        Ok(self.next_fetch())
    }

    fn fetch_one(&self, statement: &str, params: &Record) -> Result<Option<Record>> {
        self.record(statement, params);
        Ok(self.next_fetch().into_iter().next())
    }

    fn fetch_column(&self, statement: &str, params: &Record) -> Result<Vec<SqlValue>> {
        self.record(statement, params);
        Ok(self
            .next_fetch()
            .iter()
            .filter_map(|row| row.values().next().cloned())
            .collect())
    }

    fn fetch_value(&self, statement: &str, params: &Record) -> Result<Option<SqlValue>> {
        self.record(statement, params);
        Ok(self
            .next_fetch()
            .first()
            .and_then(|row| row.values().next().cloned()))
    }

    fn perform(&self, statement: &str, params: &Record) -> Result<ExecResult> {
        self.record(statement, params);
        let count = self.row_counts.lock().unwrap().pop_front().unwrap_or(0);
        Ok(ExecResult::new(count))
    }

    fn last_insert_id(&self, _sequence: Option<&str>) -> Result<Option<SqlValue>> {
        Ok(self.last_insert_id.lock().unwrap().clone())
    }
}

/// Builds a record from literal pairs.
pub fn record(pairs: &[(&str, SqlValue)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (String::from(*k), v.clone()))
        .collect()
}
