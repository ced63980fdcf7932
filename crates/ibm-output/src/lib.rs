//! `ibm-output` — simulation output writers for `rust_ibm` models.
//!
//! | Feature   | Backend | Files created                             |
//! |-----------|---------|-------------------------------------------|
//! | *(none)*  | CSV     | `state_counts.csv`, `step_summaries.csv`  |
//! | `sqlite`  | SQLite  | `output.db`                               |
//!
//! Both backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `ibm_sim::SimObserver`.
//!
//! ```rust,ignore
//! use ibm_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"), model.state().state_labels())?;
//! let mut obs = SimOutputObserver::new(writer, model.config());
//! model.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{StateCountRow, StepSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
