//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, StateCountRow, StepSummaryRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Writers are opened with the state labels, so every `StateCountRow` must
/// carry exactly one count per label.
pub trait OutputWriter {
    fn write_state_counts(&mut self, row: &StateCountRow) -> OutputResult<()>;

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.  Safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
