//! SQLite output backend (feature `sqlite`).
//!
//! Creates `output.db` in the output directory with three tables:
//! `state_labels (code, label)`, `state_counts (tick, time, state, count)` in
//! long format, and `step_summaries (tick, time, fired, applied)`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult, StateCountRow, StepSummaryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    width:    usize,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir`, create the schema, and record
    /// the state labels.
    pub fn new<S: AsRef<str>>(dir: &Path, labels: &[S]) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS state_labels (
                 code  INTEGER PRIMARY KEY,
                 label TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS state_counts (
                 tick  INTEGER NOT NULL,
                 time  REAL    NOT NULL,
                 state INTEGER NOT NULL REFERENCES state_labels (code),
                 count INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS step_summaries (
                 tick    INTEGER PRIMARY KEY,
                 time    REAL    NOT NULL,
                 fired   INTEGER NOT NULL,
                 applied INTEGER NOT NULL
             );",
        )?;
        {
            let mut stmt =
                conn.prepare("INSERT OR REPLACE INTO state_labels (code, label) VALUES (?1, ?2)")?;
            for (code, label) in labels.iter().enumerate() {
                stmt.execute(rusqlite::params![code as i64, label.as_ref()])?;
            }
        }

        Ok(Self { conn, width: labels.len(), finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_state_counts(&mut self, row: &StateCountRow) -> OutputResult<()> {
        if row.counts.len() != self.width {
            return Err(OutputError::Width { expected: self.width, got: row.counts.len() });
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO state_counts (tick, time, state, count) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (code, &count) in row.counts.iter().enumerate() {
                stmt.execute(rusqlite::params![row.tick as i64, row.time, code as i64, count as i64])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO step_summaries (tick, time, fired, applied) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![row.tick as i64, row.time, row.fired as i64, row.applied as i64],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
