//! `StateStore`: the double-buffered categorical state of every person.
//!
//! # Queue / commit protocol
//!
//! Reads (`query_by_state`, `count_by_state`, `counts`, `state_of`) always see
//! the *current* buffer.  Writes go through `queue_update`, which records the
//! requested code in the *pending* buffer, and only become visible when
//! `apply_updates` copies every pending entry into current and clears pending.
//! Every process in a step therefore sees the same snapshot no matter the
//! order in which processes run.
//!
//! Within one step the last `queue_update` for a person wins.
//!
//! `pending[i] == StateId::INVALID` means "no change".  Persons with a set
//! entry are also listed in `queued`, so a commit touches only the persons
//! that were actually updated.

use ibm_core::{IbmError, IbmResult, LabelSet, PersonId, StateId};
use tracing::trace;

use crate::attribute::AttributeMap;

/// Current and pending categorical state for a fixed population.
#[derive(Debug)]
pub struct StateStore {
    count:      usize,
    labels:     LabelSet<StateId>,
    current:    Vec<StateId>,
    pending:    Vec<StateId>,
    queued:     Vec<PersonId>,
    attributes: AttributeMap,
}

impl StateStore {
    pub(crate) fn from_parts(
        labels:     LabelSet<StateId>,
        current:    Vec<StateId>,
        attributes: AttributeMap,
    ) -> Self {
        let count = current.len();
        Self {
            count,
            labels,
            current,
            pending: vec![StateId::INVALID; count],
            queued: Vec::new(),
            attributes,
        }
    }

    // ── Population and label metadata ─────────────────────────────────────

    /// Population size N.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The state label universe.
    #[inline]
    pub fn labels(&self) -> &LabelSet<StateId> {
        &self.labels
    }

    /// Number of declared states.
    #[inline]
    pub fn state_count(&self) -> usize {
        self.labels.len()
    }

    /// State names in code order.
    #[inline]
    pub fn state_labels(&self) -> &[String] {
        self.labels.names()
    }

    /// Current code of every person, indexed by `PersonId::index()`.
    #[inline]
    pub fn current(&self) -> &[StateId] {
        &self.current
    }

    // ── Queries (current buffer only) ─────────────────────────────────────

    /// Persons whose current state is any of `labels`, in ascending order.
    pub fn query_by_state<S: AsRef<str>>(&self, labels: &[S]) -> IbmResult<Vec<PersonId>> {
        let mask = self.label_mask(labels)?;
        Ok(self
            .current
            .iter()
            .enumerate()
            .filter(|&(_, code)| mask[code.index()])
            .map(|(i, _)| PersonId(i as u32))
            .collect())
    }

    /// Every person, in ascending order.
    pub fn query_all(&self) -> Vec<PersonId> {
        PersonId::range(self.count).collect()
    }

    /// Number of persons whose current state is any of `labels`.
    pub fn count_by_state<S: AsRef<str>>(&self, labels: &[S]) -> IbmResult<usize> {
        let mask = self.label_mask(labels)?;
        Ok(self.current.iter().filter(|code| mask[code.index()]).count())
    }

    /// Count per state, in label order.
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.labels.len()];
        for code in &self.current {
            counts[code.index()] += 1;
        }
        counts
    }

    /// Current code of `person`.
    pub fn state_of(&self, person: PersonId) -> IbmResult<StateId> {
        self.check_person(person)?;
        Ok(self.current[person.index()])
    }

    /// Current label of `person`.
    pub fn label_of(&self, person: PersonId) -> IbmResult<&str> {
        let code = self.state_of(person)?;
        Ok(self.labels.name(code).unwrap_or_default())
    }

    /// Code queued for `person` this step, if any.
    pub fn pending_of(&self, person: PersonId) -> IbmResult<Option<StateId>> {
        self.check_person(person)?;
        let code = self.pending[person.index()];
        Ok(code.is_valid().then_some(code))
    }

    /// `true` if at least one update is waiting for `apply_updates`.
    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.queued.is_empty()
    }

    // ── Queue / commit ────────────────────────────────────────────────────

    /// Queue a change of every person in `persons` to state `label`.
    ///
    /// Nothing is written unless the label and every person are valid.
    pub fn queue_update(&mut self, persons: &[PersonId], label: &str) -> IbmResult<()> {
        let code = self.labels.resolve(label)?;
        self.queue_update_id(persons, code)
    }

    /// [`queue_update`](Self::queue_update) with a pre-resolved state code.
    pub fn queue_update_id(&mut self, persons: &[PersonId], code: StateId) -> IbmResult<()> {
        self.labels.check(code)?;
        for &person in persons {
            self.check_person(person)?;
        }
        for &person in persons {
            let slot = &mut self.pending[person.index()];
            if !slot.is_valid() {
                self.queued.push(person);
            }
            *slot = code;
        }
        trace!(persons = persons.len(), state = ?code, "queued state updates");
        Ok(())
    }

    /// Commit every pending update into current, clear pending, and return
    /// how many persons were updated.
    pub fn apply_updates(&mut self) -> usize {
        let mut applied = 0;
        for person in self.queued.drain(..) {
            let i = person.index();
            let next = std::mem::replace(&mut self.pending[i], StateId::INVALID);
            if next.is_valid() {
                self.current[i] = next;
                applied += 1;
            }
        }
        applied
    }

    // ── (Re)initialisation ────────────────────────────────────────────────

    /// Replace the label universe and assign every person's state by name.
    ///
    /// `initial` must have exactly N entries.  Pending updates are discarded.
    pub fn initialize<S: AsRef<str>>(
        &mut self,
        initial: &[S],
        labels:  LabelSet<StateId>,
    ) -> IbmResult<()> {
        self.check_len(initial.len())?;
        let codes = labels.resolve_all(initial)?;
        self.install(labels, codes);
        Ok(())
    }

    /// Replace the label universe and assign every person's state by code.
    pub fn initialize_ids(
        &mut self,
        initial: &[StateId],
        labels:  LabelSet<StateId>,
    ) -> IbmResult<()> {
        self.check_len(initial.len())?;
        for &code in initial {
            labels.check(code)?;
        }
        self.install(labels, initial.to_vec());
        Ok(())
    }

    /// Reassign every person's state by name within the existing universe.
    pub fn reset<S: AsRef<str>>(&mut self, initial: &[S]) -> IbmResult<()> {
        self.check_len(initial.len())?;
        let codes = self.labels.resolve_all(initial)?;
        self.current = codes;
        self.clear_pending();
        Ok(())
    }

    /// Reassign every person's state by code within the existing universe.
    pub fn reset_ids(&mut self, initial: &[StateId]) -> IbmResult<()> {
        self.check_len(initial.len())?;
        for &code in initial {
            self.labels.check(code)?;
        }
        self.current.copy_from_slice(initial);
        self.clear_pending();
        Ok(())
    }

    // ── Attributes ────────────────────────────────────────────────────────

    /// Attribute column `T`, or `None` if `T` was not registered at build time.
    pub fn attribute<T: Default + Send + 'static>(&self) -> Option<&[T]> {
        self.attributes.get::<T>()
    }

    pub fn attribute_mut<T: Default + Send + 'static>(&mut self) -> Option<&mut [T]> {
        self.attributes.get_mut::<T>()
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn install(&mut self, labels: LabelSet<StateId>, codes: Vec<StateId>) {
        self.labels = labels;
        self.current = codes;
        self.clear_pending();
    }

    fn clear_pending(&mut self) {
        for person in self.queued.drain(..) {
            self.pending[person.index()] = StateId::INVALID;
        }
    }

    fn label_mask<S: AsRef<str>>(&self, labels: &[S]) -> IbmResult<Vec<bool>> {
        let mut mask = vec![false; self.labels.len()];
        for code in self.labels.resolve_all(labels)? {
            mask[code.index()] = true;
        }
        Ok(mask)
    }

    #[inline]
    fn check_person(&self, person: PersonId) -> IbmResult<()> {
        if person.index() < self.count {
            Ok(())
        } else {
            Err(IbmError::InvalidIndex { index: person.index(), count: self.count })
        }
    }

    fn check_len(&self, got: usize) -> IbmResult<()> {
        if got == self.count {
            Ok(())
        } else {
            Err(IbmError::LengthMismatch {
                what:     "initial state vector",
                expected: self.count,
                got,
            })
        }
    }
}
