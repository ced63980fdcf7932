//! `Model` and its step loop.

use ibm_core::{SimConfig, SimRng, StepClock, Tick};
use ibm_events::Scheduler;
use ibm_state::StateStore;
use tracing::{debug, info};

use crate::{Process, SimObserver, SimResult, StepContext, StepSummary};

/// A runnable model: state store, scheduler, RNG, and processes.
///
/// One step runs, in order:
///
/// 1. every [`Process`] in registration order, all reading the same current
///    state;
/// 2. `Scheduler::advance` (fire due events, then decrement delays);
/// 3. `StateStore::apply_updates`;
/// 4. the observer's `on_step_end`, which sees the committed state.
///
/// Create via [`ModelBuilder`][crate::ModelBuilder].  If a step returns an
/// error, the model is left mid-step and should be discarded.
pub struct Model {
    pub(crate) config:    SimConfig,
    pub(crate) clock:     StepClock,
    pub(crate) state:     StateStore,
    pub(crate) scheduler: Scheduler,
    pub(crate) rng:       SimRng,
    pub(crate) processes: Vec<Box<dyn Process>>,
}

impl Model {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> &StepClock {
        &self.clock
    }

    /// Last completed step (`Tick::ZERO` before the first).
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut StateStore {
        &mut self.state
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn rng_mut(&mut self) -> &mut SimRng {
        &mut self.rng
    }

    /// Append a process after those already registered.
    pub fn add_process<P: Process>(&mut self, process: P) {
        self.processes.push(Box::new(process));
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Run from the current step to `config.steps`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let end = self.config.end_tick();
        info!(
            population = self.state.count(),
            steps = self.config.steps,
            dt = self.config.dt,
            seed = self.config.seed,
            "starting run"
        );
        observer.on_sim_start(self.clock.current_tick, &self.state);
        while self.clock.current_tick < end {
            self.step_observed(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick, &self.state);
        info!(clock = %self.clock, counts = ?self.state.counts(), "run finished");
        Ok(())
    }

    /// Run exactly `n` steps from the current position, ignoring `config.steps`.
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step_observed(observer)?;
        }
        Ok(())
    }

    /// Simulate one step.
    pub fn step(&mut self) -> SimResult<StepSummary> {
        let tick = self.clock.advance();
        let Self { clock, state, scheduler, rng, processes, .. } = self;

        for process in processes.iter_mut() {
            let mut ctx = StepContext {
                tick,
                dt: clock.dt,
                state: &mut *state,
                scheduler: &mut *scheduler,
                rng: &mut *rng,
            };
            process.step(&mut ctx)?;
        }
        let fired = scheduler.advance(state, rng, tick)?;
        let applied = state.apply_updates();

        debug!(%tick, fired, applied, "step complete");
        Ok(StepSummary { tick, fired, applied })
    }

    fn step_observed<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        observer.on_step_start(self.clock.current_tick + 1);
        let summary = self.step()?;
        observer.on_step_end(summary.tick, &summary, &self.state);
        Ok(())
    }
}
