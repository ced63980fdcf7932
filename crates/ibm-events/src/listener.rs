//! The `Listener` trait — user code attached to an event label.

use ibm_core::{IbmResult, PersonId, Tick};

use crate::EventContext;

/// Callback invoked when an event comes due.
///
/// `targets` holds every person with a due entry for the event, ascending
/// and without duplicates.  Each listener of an event is called once per
/// firing, in registration order.  Mutations made through `ctx`
/// (`queue_update`, `schedule`, `clear`) take effect immediately, so a later
/// listener or event in the same pass sees them.
///
/// Any `FnMut(&[PersonId], Tick, &mut EventContext) -> IbmResult<()>` closure
/// is a listener:
///
/// ```rust
/// use ibm_core::{IbmResult, LabelSet, PersonId, Tick};
/// use ibm_events::{EventContext, Scheduler};
///
/// let mut scheduler = Scheduler::new(10, LabelSet::new(["Recovery"]).unwrap());
/// scheduler
///     .register_listener(
///         "Recovery",
///         |targets: &[PersonId], _now: Tick, ctx: &mut EventContext<'_>| -> IbmResult<()> {
///             ctx.queue_update(targets, "R")
///         },
///     )
///     .unwrap();
/// ```
pub trait Listener: Send + 'static {
    fn on_fire(
        &mut self,
        targets: &[PersonId],
        now:     Tick,
        ctx:     &mut EventContext<'_>,
    ) -> IbmResult<()>;
}

impl<F> Listener for F
where
    F: FnMut(&[PersonId], Tick, &mut EventContext<'_>) -> IbmResult<()> + Send + 'static,
{
    fn on_fire(
        &mut self,
        targets: &[PersonId],
        now:     Tick,
        ctx:     &mut EventContext<'_>,
    ) -> IbmResult<()> {
        self(targets, now, ctx)
    }
}
