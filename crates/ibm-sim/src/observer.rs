//! Observer hooks for progress reporting and data collection.

use ibm_core::Tick;
use ibm_state::StateStore;

/// What happened during one step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepSummary {
    pub tick:    Tick,
    /// `(event, person)` firings during the event pass.
    pub fired:   usize,
    /// Persons whose state was committed by `apply_updates`.
    pub applied: usize,
}

/// Callbacks invoked by [`Model::run`][crate::Model::run].
///
/// All methods default to no-ops.
///
/// ```rust,ignore
/// struct Progress;
///
/// impl SimObserver for Progress {
///     fn on_step_end(&mut self, tick: Tick, summary: &StepSummary, state: &StateStore) {
///         if tick.0 % 100 == 0 {
///             println!("{tick}: {:?} ({} applied)", state.counts(), summary.applied);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once before the first step, with the initial state.
    fn on_sim_start(&mut self, _tick: Tick, _state: &StateStore) {}

    /// Called at the start of each step, before any process runs.
    fn on_step_start(&mut self, _tick: Tick) {}

    /// Called after each step's commit.
    fn on_step_end(&mut self, _tick: Tick, _summary: &StepSummary, _state: &StateStore) {}

    /// Called once after the final step.
    fn on_sim_end(&mut self, _final_tick: Tick, _state: &StateStore) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Per-step state counts, one row per committed step.
///
/// Row `k` holds `StateStore::counts()` after step `ticks()[k]` has been
/// committed, columns in label order.  The row for step `t` therefore
/// already includes every transition queued during step `t`; the state a
/// step started from is the previous row (or the initial state for step 1).
#[derive(Clone, Debug, Default)]
pub struct Trajectory {
    labels: Vec<String>,
    ticks:  Vec<Tick>,
    rows:   Vec<Vec<usize>>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Counts of one state over time, or `None` for an unknown label.
    pub fn series(&self, label: &str) -> Option<Vec<usize>> {
        let col = self.labels.iter().position(|l| l == label)?;
        Some(self.rows.iter().map(|row| row[col]).collect())
    }

    /// Counts after the last recorded step.
    pub fn last(&self) -> Option<&[usize]> {
        self.rows.last().map(Vec::as_slice)
    }
}

impl SimObserver for Trajectory {
    fn on_sim_start(&mut self, _tick: Tick, state: &StateStore) {
        self.labels = state.state_labels().to_vec();
    }

    fn on_step_end(&mut self, tick: Tick, _summary: &StepSummary, state: &StateStore) {
        if self.labels.is_empty() {
            self.labels = state.state_labels().to_vec();
        }
        self.ticks.push(tick);
        self.rows.push(state.counts());
    }
}
