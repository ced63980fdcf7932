//! The `Process` trait — per-step user transition logic.

use ibm_core::{IbmResult, SimRng, Tick};
use ibm_events::Scheduler;
use ibm_state::StateStore;

/// What a process sees during one step.
///
/// The state store's *current* buffer is the snapshot at the start of the
/// step for every process: updates queued here are only committed after all
/// processes and the event pass have run.
pub struct StepContext<'a> {
    /// The step being simulated (first step is `Tick(1)`).
    pub tick:      Tick,
    /// Step size in model time units.
    pub dt:        f64,
    pub state:     &'a mut StateStore,
    pub scheduler: &'a mut Scheduler,
    pub rng:       &'a mut SimRng,
}

impl StepContext<'_> {
    /// Model time at the end of this step.
    #[inline]
    pub fn time(&self) -> f64 {
        self.tick.0 as f64 * self.dt
    }
}

/// A transition rule run once per step, in registration order.
///
/// Closures `FnMut(&mut StepContext) -> IbmResult<()>` are processes:
///
/// ```rust
/// use ibm_core::IbmResult;
/// use ibm_sampling::bernoulli_select_rate;
/// use ibm_sim::StepContext;
///
/// let recovery = |ctx: &mut StepContext<'_>| -> IbmResult<()> {
///     let infectious = ctx.state.query_by_state(&["I"])?;
///     let recovered = bernoulli_select_rate(&infectious, 0.1, ctx.dt, ctx.rng)?;
///     ctx.state.queue_update(&recovered, "R")
/// };
/// # let _ = recovery;
/// ```
pub trait Process: Send + 'static {
    fn step(&mut self, ctx: &mut StepContext<'_>) -> IbmResult<()>;
}

impl<F> Process for F
where
    F: FnMut(&mut StepContext<'_>) -> IbmResult<()> + Send + 'static,
{
    fn step(&mut self, ctx: &mut StepContext<'_>) -> IbmResult<()> {
        self(ctx)
    }
}
