//! Scripted connection double for builder tests.

use std::sync::Mutex;

use crate::connection::{Connection, ExecResult, Result};
use crate::value::{Record, SqlValue};

/// Records executed statements and replays scripted results.
pub struct FakeConnection {
    driver: String,
    row_count: Mutex<u64>,
    rows: Mutex<Vec<Record>>,
    last_insert_id: Mutex<Option<SqlValue>>,
    statements: Mutex<Vec<(String, Record)>>,
}

impl FakeConnection {
    pub fn new(driver: &str) -> Self {
        Self {
            driver: String::from(driver),
            row_count: Mutex::new(0),
            rows: Mutex::new(vec![]),
            last_insert_id: Mutex::new(None),
            statements: Mutex::new(vec![]),
        }
    }

    pub fn expect_row_count(&self, n: u64) {
        *self.row_count.lock().unwrap() = n;
    }

    pub fn expect_rows(&self, rows: Vec<Record>) {
        *self.rows.lock().unwrap() = rows;
    }

    pub fn expect_last_insert_id(&self, value: SqlValue) {
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

    fn record(&self, statement: &str, params: &Record) {
        self.statements
            .lock()
            .unwrap()
            .push((String::from(statement), params.clone()));
    }
}

impl Connection for FakeConnection {
    fn driver_name(&self) -> &str {
        &self.driver
    }

    fn fetch_all(&self, statement: &str, params: &Record) -> Result<Vec<Record>> {
        self.record(statement, params);
        Ok(self.rows.lock().unwrap().clone())
    }

    fn fetch_one(&self, statement: &str, params: &Record) -> Result<Option<Record>> {
        self.record(statement, params);
        Ok(self.rows.lock().unwrap().first().cloned())
    }

    fn fetch_column(&self, statement: &str, params: &Record) -> Result<Vec<SqlValue>> {
        self.record(statement, params);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter_map(|row| row.values().next().cloned())
            .collect())
    }

    fn fetch_value(&self, statement: &str, params: &Record) -> Result<Option<SqlValue>> {
        self.record(statement, params);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .first()
            .and_then(|row| row.values().next().cloned()))
    }

    fn perform(&self, statement: &str, params: &Record) -> Result<ExecResult> {
        self.record(statement, params);
        Ok(ExecResult::new(*self.row_count.lock().unwrap()))
    }

    fn last_insert_id(&self, _sequence: Option<&str>) -> Result<Option<SqlValue>> {
        Ok(self.last_insert_id.lock().unwrap().clone())
    }
}
