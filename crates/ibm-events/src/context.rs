//! The capability handed to listeners while an event fires.

use ibm_core::{EventId, IbmResult, LabelSet, PersonId, SimRng, Tick};
use ibm_state::StateStore;

use crate::queue::{Delays, EventQueue};
use crate::scheduler::{checked_clear, checked_schedule};

/// Narrow, mutable view of the kernel given to a [`Listener`](crate::Listener).
///
/// Listeners may queue state updates, schedule and clear events, and draw
/// from the run's RNG.  They cannot register listeners, tick the queue, or
/// commit state.  Every operation goes through the same checks as the
/// public `StateStore` / `Scheduler` calls.
pub struct EventContext<'a> {
    now:        Tick,
    population: usize,
    state:      &'a mut StateStore,
    queue:      &'a mut EventQueue,
    events:     &'a LabelSet<EventId>,
    rng:        &'a mut SimRng,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(
        now:        Tick,
        population: usize,
        state:      &'a mut StateStore,
        queue:      &'a mut EventQueue,
        events:     &'a LabelSet<EventId>,
        rng:        &'a mut SimRng,
    ) -> Self {
        Self { now, population, state, queue, events, rng }
    }

    /// The step being processed.
    #[inline]
    pub fn now(&self) -> Tick {
        self.now
    }

    /// The run's random source.
    #[inline]
    pub fn rng(&mut self) -> &mut SimRng {
        &mut *self.rng
    }

    /// Read-only view of the state store (current buffer and pending queue).
    #[inline]
    pub fn state(&self) -> &StateStore {
        &*self.state
    }

    /// Same as [`StateStore::queue_update`].
    pub fn queue_update(&mut self, persons: &[PersonId], label: &str) -> IbmResult<()> {
        self.state.queue_update(persons, label)
    }

    /// Same as [`Scheduler::schedule`](crate::Scheduler::schedule).
    pub fn schedule<'d>(
        &mut self,
        targets: &[PersonId],
        delays:  impl Into<Delays<'d>>,
        event:   &str,
    ) -> IbmResult<()> {
        checked_schedule(self.queue, self.events, self.population, targets, delays.into(), event)
    }

    /// Same as [`Scheduler::clear`](crate::Scheduler::clear).
    pub fn clear(&mut self, targets: &[PersonId], event: Option<&str>) -> IbmResult<usize> {
        checked_clear(self.queue, self.events, self.population, targets, event)
    }
}
