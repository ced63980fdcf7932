//! `Scheduler` — event labels, listeners, and the firing protocol.
//!
//! # Per-step protocol
//!
//! ```text
//! advance(now):
//!   process(now):
//!     for event in registration order:
//!       targets = due(event)      recomputed here, after earlier events ran
//!       for listener in event's listeners (registration order):
//!         listener(targets, now, ctx)
//!       remove_due(event)
//!   tick()                        every delay -= 1 (saturating)
//! ```
//!
//! An entry scheduled with delay `d` during step `t`, by a process or by a
//! listener, fires during step `t + d`.  Entries reaching 0 in a step's
//! `tick` are fired by the next step's `process`, so there is always at
//! least one step between scheduling and firing.

use std::fmt;

use ibm_core::{EventId, IbmError, IbmResult, LabelSet, PersonId, SimRng, Tick};
use ibm_state::StateStore;
use tracing::{debug, trace};

use crate::context::EventContext;
use crate::listener::Listener;
use crate::queue::{Delays, EventQueue};

/// Event scheduler for a fixed population.
pub struct Scheduler {
    population: usize,
    events:     LabelSet<EventId>,
    /// Indexed by `EventId::index()`.
    listeners:  Vec<Vec<Box<dyn Listener>>>,
    queue:      EventQueue,
}

impl Scheduler {
    /// Scheduler for `population` persons with the given event labels.
    pub fn new(population: usize, events: LabelSet<EventId>) -> Self {
        let listeners = (0..events.len()).map(|_| Vec::new()).collect();
        Self { population, events, listeners, queue: EventQueue::new() }
    }

    /// Scheduler with event labels given by name, in code order.
    pub fn with_events<S: Into<String>>(
        population: usize,
        names:      impl IntoIterator<Item = S>,
    ) -> IbmResult<Self> {
        Ok(Self::new(population, LabelSet::new(names)?))
    }

    #[inline]
    pub fn population(&self) -> usize {
        self.population
    }

    /// The event label universe.
    #[inline]
    pub fn events(&self) -> &LabelSet<EventId> {
        &self.events
    }

    /// Read-only access to the pending entries.
    #[inline]
    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// Append `listener` to `event`'s listener list.
    pub fn register_listener<L: Listener>(&mut self, event: &str, listener: L) -> IbmResult<()> {
        self.register_boxed(event, Box::new(listener))
    }

    /// [`register_listener`](Self::register_listener) for an already-boxed listener.
    pub fn register_boxed(&mut self, event: &str, listener: Box<dyn Listener>) -> IbmResult<()> {
        let id = self.events.resolve(event)?;
        self.listeners[id.index()].push(listener);
        Ok(())
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count(&self, event: &str) -> IbmResult<usize> {
        let id = self.events.resolve(event)?;
        Ok(self.listeners[id.index()].len())
    }

    /// Schedule `event` for every person in `targets` after `delays` ticks.
    ///
    /// Every delay must be at least 1.  Persons already scheduled for the
    /// same event get an additional entry.
    pub fn schedule<'d>(
        &mut self,
        targets: &[PersonId],
        delays:  impl Into<Delays<'d>>,
        event:   &str,
    ) -> IbmResult<()> {
        checked_schedule(&mut self.queue, &self.events, self.population, targets, delays.into(), event)
    }

    /// Persons with at least one pending entry for `event`, ascending.
    pub fn get_scheduled(&self, event: &str) -> IbmResult<Vec<PersonId>> {
        let id = self.events.resolve(event)?;
        Ok(self.queue.persons_for(id))
    }

    /// Remove the pending entries of `targets`, for `event` only or for every
    /// event when `None`.  Returns the number of entries removed.
    pub fn clear(&mut self, targets: &[PersonId], event: Option<&str>) -> IbmResult<usize> {
        checked_clear(&mut self.queue, &self.events, self.population, targets, event)
    }

    /// Total pending entries across all events.
    #[inline]
    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    /// Remaining delays of `person`'s entries for `event`, in scheduling order.
    pub fn remaining_delays(&self, person: PersonId, event: &str) -> IbmResult<Vec<u32>> {
        let id = self.events.resolve(event)?;
        check_person(person, self.population)?;
        Ok(self.queue.remaining_delays(person, id))
    }

    /// Decrement every pending delay by one.
    pub fn tick(&mut self) {
        self.queue.tick();
    }

    /// Fire every due entry.  Returns the number of `(event, person)` firings.
    ///
    /// If a listener fails, the remaining listeners of that event are skipped,
    /// the event's due entries are still removed, and the error is returned
    /// without processing later events.
    pub fn process(
        &mut self,
        state: &mut StateStore,
        rng:   &mut SimRng,
        now:   Tick,
    ) -> IbmResult<usize> {
        let Self { population, events, listeners, queue } = self;
        let mut fired = 0;

        for (event, name) in events.iter() {
            let targets = queue.due(event);
            if targets.is_empty() {
                continue;
            }
            debug!(%now, event = name, targets = targets.len(), "firing event");

            let mut outcome = Ok(());
            for listener in listeners[event.index()].iter_mut() {
                let mut ctx = EventContext::new(now, *population, state, queue, events, rng);
                outcome = listener.on_fire(&targets, now, &mut ctx);
                if outcome.is_err() {
                    break;
                }
            }
            queue.remove_due(event);
            outcome?;
            fired += targets.len();
        }
        Ok(fired)
    }

    /// `process` followed by `tick`: the scheduler's whole per-step work.
    ///
    /// If `process` fails the delays are not decremented.
    pub fn advance(
        &mut self,
        state: &mut StateStore,
        rng:   &mut SimRng,
        now:   Tick,
    ) -> IbmResult<usize> {
        let fired = self.process(state, rng, now)?;
        self.tick();
        Ok(fired)
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("population", &self.population)
            .field("events", &self.events.names())
            .field("listeners", &self.listeners.iter().map(Vec::len).collect::<Vec<_>>())
            .field("pending", &self.queue.len())
            .finish()
    }
}

// ── Checked queue operations shared with EventContext ─────────────────────────

pub(crate) fn checked_schedule(
    queue:      &mut EventQueue,
    events:     &LabelSet<EventId>,
    population: usize,
    targets:    &[PersonId],
    delays:     Delays<'_>,
    event:      &str,
) -> IbmResult<()> {
    let id = events.resolve(event)?;
    delays.check(targets.len())?;
    for &person in targets {
        check_person(person, population)?;
    }
    queue.push_all(targets, delays, id);
    trace!(event, targets = targets.len(), "scheduled events");
    Ok(())
}

pub(crate) fn checked_clear(
    queue:      &mut EventQueue,
    events:     &LabelSet<EventId>,
    population: usize,
    targets:    &[PersonId],
    event:      Option<&str>,
) -> IbmResult<usize> {
    let id = event.map(|name| events.resolve(name)).transpose()?;
    for &person in targets {
        check_person(person, population)?;
    }
    let removed = queue.clear(targets, id);
    trace!(event, targets = targets.len(), removed, "cleared scheduled events");
    Ok(removed)
}

#[inline]
fn check_person(person: PersonId, population: usize) -> IbmResult<()> {
    if person.index() < population {
        Ok(())
    } else {
        Err(IbmError::InvalidIndex { index: person.index(), count: population })
    }
}
