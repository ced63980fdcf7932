//! CSV output backend.
//!
//! Creates two files in the output directory:
//! - `state_counts.csv` — `tick,time,<label>...`
//! - `step_summaries.csv` — `tick,time,fired,applied`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult, StateCountRow, StepSummaryRow};

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    counts:    Writer<File>,
    summaries: Writer<File>,
    width:     usize,
    finished:  bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` and write their header rows.
    pub fn new<S: AsRef<str>>(dir: &Path, labels: &[S]) -> OutputResult<Self> {
        let mut counts = Writer::from_path(dir.join("state_counts.csv"))?;
        let header = ["tick", "time"]
            .into_iter()
            .chain(labels.iter().map(|l| l.as_ref()));
        counts.write_record(header)?;

        let mut summaries = Writer::from_path(dir.join("step_summaries.csv"))?;
        summaries.write_record(["tick", "time", "fired", "applied"])?;

        Ok(Self { counts, summaries, width: labels.len(), finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_state_counts(&mut self, row: &StateCountRow) -> OutputResult<()> {
        if row.counts.len() != self.width {
            return Err(OutputError::Width { expected: self.width, got: row.counts.len() });
        }
        let mut record = Vec::with_capacity(self.width + 2);
        record.push(row.tick.to_string());
        record.push(row.time.to_string());
        record.extend(row.counts.iter().map(u64::to_string));
        self.counts.write_record(&record)?;
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.time.to_string(),
            row.fired.to_string(),
            row.applied.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.counts.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
