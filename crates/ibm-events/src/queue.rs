//! `EventQueue` — flat list of pending per-person events.
//!
//! Each entry is `(person, event, delay)` where `delay` counts the ticks left
//! before the entry becomes due.  `tick` decrements every delay; an entry is
//! *due* once its delay reaches 0.  The scheduler removes due entries in the
//! same pass that fires them, so every entry fires exactly once.
//!
//! Duplicates are allowed: scheduling the same person for the same event
//! twice yields two entries.  Lookups that return persons (`persons_for`,
//! `due`) sort and deduplicate.
//!
//! The queue performs no validation of its own; [`Scheduler`](crate::Scheduler)
//! and [`EventContext`](crate::EventContext) check arguments before touching it.

use ibm_core::{EventId, IbmError, IbmResult, PersonId};

/// One pending event for one person.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScheduledEntry {
    pub person: PersonId,
    pub event:  EventId,
    /// Ticks remaining until the entry is due.
    pub delay:  u32,
}

/// Delay argument to `schedule`: one delay for every target, or one per target.
#[derive(Copy, Clone, Debug)]
pub enum Delays<'a> {
    Scalar(u32),
    Each(&'a [u32]),
}

impl From<u32> for Delays<'_> {
    fn from(delay: u32) -> Self {
        Delays::Scalar(delay)
    }
}

impl<'a> From<&'a [u32]> for Delays<'a> {
    fn from(delays: &'a [u32]) -> Self {
        Delays::Each(delays)
    }
}

impl<'a> From<&'a Vec<u32>> for Delays<'a> {
    fn from(delays: &'a Vec<u32>) -> Self {
        Delays::Each(delays.as_slice())
    }
}

impl Delays<'_> {
    /// Check the delays against `targets` entries: lengths must match and
    /// every delay must be at least 1.
    pub fn check(&self, targets: usize) -> IbmResult<()> {
        match *self {
            Delays::Scalar(d) => check_delay(d),
            Delays::Each(ds) => {
                if ds.len() != targets {
                    return Err(IbmError::LengthMismatch {
                        what:     "delay vector",
                        expected: targets,
                        got:      ds.len(),
                    });
                }
                ds.iter().try_for_each(|&d| check_delay(d))
            }
        }
    }

    /// Delay for the `i`-th target.
    #[inline]
    pub fn get(&self, i: usize) -> u32 {
        match *self {
            Delays::Scalar(d) => d,
            Delays::Each(ds) => ds[i],
        }
    }
}

fn check_delay(delay: u32) -> IbmResult<()> {
    if delay >= 1 {
        Ok(())
    } else {
        Err(IbmError::InvalidParameter(
            "scheduled delay must be at least 1 step".into(),
        ))
    }
}

/// Pending events for the whole population.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    entries: Vec<ScheduledEntry>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry per target.  Delays must already be checked.
    pub fn push_all(&mut self, targets: &[PersonId], delays: Delays<'_>, event: EventId) {
        self.entries.reserve(targets.len());
        self.entries.extend(targets.iter().enumerate().map(|(i, &person)| ScheduledEntry {
            person,
            event,
            delay: delays.get(i),
        }));
    }

    /// Persons with at least one entry for `event`, ascending, no duplicates.
    pub fn persons_for(&self, event: EventId) -> Vec<PersonId> {
        sorted_unique(self.entries.iter().filter(|e| e.event == event).map(|e| e.person))
    }

    /// Drop every entry for the given persons, optionally only for `event`.
    /// Returns the number of entries removed.
    pub fn clear(&mut self, targets: &[PersonId], event: Option<EventId>) -> usize {
        if targets.is_empty() || self.entries.is_empty() {
            return 0;
        }
        let mut targets = targets.to_vec();
        targets.sort_unstable();
        let before = self.entries.len();
        self.entries.retain(|e| {
            let matches_event = event.is_none_or(|ev| ev == e.event);
            !(matches_event && targets.binary_search(&e.person).is_ok())
        });
        before - self.entries.len()
    }

    /// Decrement every delay by one, stopping at 0.
    pub fn tick(&mut self) {
        for entry in &mut self.entries {
            entry.delay = entry.delay.saturating_sub(1);
        }
    }

    /// Persons with a due entry for `event`, ascending, no duplicates.
    pub fn due(&self, event: EventId) -> Vec<PersonId> {
        sorted_unique(
            self.entries
                .iter()
                .filter(|e| e.event == event && e.delay == 0)
                .map(|e| e.person),
        )
    }

    /// Remove every due entry for `event`; returns how many were removed.
    pub fn remove_due(&mut self, event: EventId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !(e.event == event && e.delay == 0));
        before - self.entries.len()
    }

    /// Remaining delays of every entry for `(person, event)`, in insertion order.
    pub fn remaining_delays(&self, person: PersonId, event: EventId) -> Vec<u32> {
        self.entries
            .iter()
            .filter(|e| e.person == person && e.event == event)
            .map(|e| e.delay)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledEntry> + '_ {
        self.entries.iter()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn sorted_unique(persons: impl Iterator<Item = PersonId>) -> Vec<PersonId> {
    let mut out: Vec<PersonId> = persons.collect();
    out.sort_unstable();
    out.dedup();
    out
}
