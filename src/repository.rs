//! SQLite-backed report repository.
//!
//! Owns the single persistent connection (foreign keys enforced) and the
//! three-table schema: `countries` and `indicators` as reference data plus
//! `reports` referencing both. `save_reports` runs the staged upsert
//! (countries, then indicators, then report rows) inside one transaction, so
//! a failure anywhere leaves the database untouched by the batch.

use std::{collections::HashMap, path::PathBuf};

use itertools::Itertools;
use rusqlite::{Connection, Transaction, params, params_from_iter, types::ValueRef};

use crate::{
    error::{Error, Result},
    table::{DataTable, Row, Value},
};

pub const TABLE_COUNTRIES: &str = "countries";
pub const TABLE_INDICATORS: &str = "indicators";
pub const TABLE_REPORTS: &str = "reports";

/// Default database file next to the working directory.
pub const DEFAULT_DB_PATH: &str = "health_insights.db";

/// Idempotent DDL; the composite index backs the country/date filter
/// predicate.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS countries (
    country_code TEXT PRIMARY KEY,
    country_name TEXT NOT NULL,
    region       TEXT
);

CREATE TABLE IF NOT EXISTS indicators (
    indicator_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    indicator_code TEXT UNIQUE NOT NULL,
    indicator_name TEXT NOT NULL,
    category       TEXT
);

CREATE TABLE IF NOT EXISTS reports (
    report_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    country_code TEXT NOT NULL REFERENCES countries(country_code),
    indicator_id INTEGER NOT NULL REFERENCES indicators(indicator_id),
    report_date  TEXT NOT NULL,
    value        REAL
);

CREATE INDEX IF NOT EXISTS idx_reports_filters
    ON reports(country_code, indicator_id, report_date);
";

#[derive(Debug)]
pub struct Repository {
    db_path: PathBuf,
    conn: Option<Connection>,
}

impl Repository {
    /// Builds a repository handle without opening the database.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            conn: None,
        }
    }

    /// Opens the connection and turns referential-integrity enforcement on.
    /// Calling `connect` on a connected repository is a no-op.
    pub fn connect(&mut self) -> Result<()> {
        if self.conn.is_some() {
            return Ok(());
        }
        let conn = Connection::open(&self.db_path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        self.conn = Some(conn);
        Ok(())
    }

    /// Closes the connection; a no-op when not connected.
    pub fn disconnect(&mut self) {
        self.conn = None;
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(Error::NotConnected)
    }

    pub fn init_schema(&self) -> Result<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Persists a long-format table as one atomic batch and returns the
    /// number of report rows inserted. Countries and indicators are staged
    /// first, ignoring duplicates; existing reference rows are never
    /// overwritten. Any failure rolls the whole batch back and surfaces as
    /// [`Error::TransactionFailure`].
    pub fn save_reports(&mut self, table: &DataTable) -> Result<usize> {
        let conn = self.conn.as_mut().ok_or(Error::NotConnected)?;
        let tx = conn.transaction()?;
        match stage_batch(&tx, table) {
            Ok(inserted) => match tx.commit() {
                Ok(()) => Ok(inserted),
                Err(err) => Err(Error::TransactionFailure(Box::new(err.into()))),
            },
            // Dropping the transaction rolls it back.
            Err(err) => Err(Error::TransactionFailure(Box::new(err))),
        }
    }

    /// Runs `SELECT * FROM reports`, optionally suffixed with a predicate
    /// fragment, binding `params` positionally. Returns the full result set.
    pub fn query_reports(&self, predicate: &str, params: &[String]) -> Result<DataTable> {
        let conn = self.conn()?;
        let sql = if predicate.trim().is_empty() {
            format!("SELECT * FROM {TABLE_REPORTS}")
        } else {
            format!("SELECT * FROM {TABLE_REPORTS} {predicate}")
        };

        let mut stmt = conn.prepare(&sql)?;
        let headers = stmt
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>();
        let column_count = headers.len();

        let mut table = DataTable::new(headers);
        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(column_count);
            for idx in 0..column_count {
                cells.push(read_cell(row.get_ref(idx)?));
            }
            table.push_row(cells);
        }
        Ok(table)
    }
}

fn read_cell(value: ValueRef<'_>) -> Option<Value> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(Value::Integer(i)),
        ValueRef::Real(f) => Some(Value::Float(f)),
        ValueRef::Text(text) => Some(Value::String(String::from_utf8_lossy(text).into_owned())),
        ValueRef::Blob(_) => None,
    }
}

fn stage_batch(tx: &Transaction<'_>, table: &DataTable) -> Result<usize> {
    let country_code = table.require_column("country_code")?;
    let country_name = table.require_column("country_name")?;
    let indicator_code = table.require_column("indicator_code")?;
    let indicator_name = table.require_column("indicator_name")?;
    let report_date = table.require_column("report_date")?;
    let value = table.require_column("value")?;

    {
        let mut stmt = tx.prepare(&format!(
            "INSERT OR IGNORE INTO {TABLE_COUNTRIES} (country_code, country_name) VALUES (?1, ?2)"
        ))?;
        let distinct = table
            .rows()
            .iter()
            .map(|row| (cell_text(row, country_code), cell_text(row, country_name)))
            .unique();
        for (code, name) in distinct {
            stmt.execute(params![code, name])?;
        }
    }

    {
        let mut stmt = tx.prepare(&format!(
            "INSERT OR IGNORE INTO {TABLE_INDICATORS} (indicator_code, indicator_name) VALUES (?1, ?2)"
        ))?;
        let distinct = table
            .rows()
            .iter()
            .map(|row| (cell_text(row, indicator_code), cell_text(row, indicator_name)))
            .unique();
        for (code, name) in distinct {
            stmt.execute(params![code, name])?;
        }
    }

    // One lookup for the whole batch instead of a query per report row.
    let indicator_ids: HashMap<String, i64> = {
        let mut stmt = tx.prepare(&format!(
            "SELECT indicator_code, indicator_id FROM {TABLE_INDICATORS}"
        ))?;
        let mut ids = HashMap::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            ids.insert(row.get::<_, String>(0)?, row.get::<_, i64>(1)?);
        }
        ids
    };

    let mut stmt = tx.prepare(&format!(
        "INSERT INTO {TABLE_REPORTS} (country_code, indicator_id, report_date, value) \
         VALUES (?1, ?2, ?3, ?4)"
    ))?;
    let mut inserted = 0usize;
    for row in table.rows() {
        let indicator_id = cell_text(row, indicator_code)
            .and_then(|code| indicator_ids.get(&code).copied());
        let report_value = row
            .get(value)
            .and_then(|cell| cell.as_ref())
            .and_then(Value::as_f64);
        stmt.execute(params![
            cell_text(row, country_code),
            indicator_id,
            cell_text(row, report_date),
            report_value,
        ])?;
        inserted += 1;
    }
    Ok(inserted)
}

fn cell_text(row: &Row, idx: usize) -> Option<String> {
    row.get(idx).and_then(|c| c.as_ref()).map(Value::as_display)
}
