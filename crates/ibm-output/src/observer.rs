//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use ibm_core::{SimConfig, Tick};
use ibm_sim::{SimObserver, StepSummary};
use ibm_state::StateStore;
use tracing::warn;

use crate::row::{StateCountRow, StepSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes state counts and step summaries to any
/// [`OutputWriter`] backend.
///
/// * A step summary is written after every step.
/// * State counts are written for the initial state (tick 0) and then every
///   `config.output_interval_steps` steps; an interval of 0 disables them.
///   A row for tick `t` holds the counts after step `t`'s commit.
///
/// Observer hooks cannot fail, so the first write error is stored and the
/// rest are dropped.  Check [`take_error`](Self::take_error) after the run.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    dt:         f64,
    interval:   u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            dt:         config.dt,
            interval:   config.output_interval_steps,
            last_error: None,
        }
    }

    /// The first write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn time(&self, tick: Tick) -> f64 {
        tick.0 as f64 * self.dt
    }

    fn write_counts(&mut self, tick: Tick, state: &StateStore) {
        let row = StateCountRow {
            tick:   tick.0,
            time:   self.time(tick),
            counts: state.counts().into_iter().map(|c| c as u64).collect(),
        };
        let result = self.writer.write_state_counts(&row);
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed; later errors are dropped");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_sim_start(&mut self, tick: Tick, state: &StateStore) {
        if self.interval > 0 {
            self.write_counts(tick, state);
        }
    }

    fn on_step_end(&mut self, tick: Tick, summary: &StepSummary, state: &StateStore) {
        let row = StepSummaryRow {
            tick:    tick.0,
            time:    self.time(tick),
            fired:   summary.fired as u64,
            applied: summary.applied as u64,
        };
        let result = self.writer.write_step_summary(&row);
        self.store_err(result);

        if self.interval > 0 && tick.0.is_multiple_of(self.interval) {
            self.write_counts(tick, state);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick, _state: &StateStore) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
