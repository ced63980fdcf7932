//! Fluent construction of a [`StateStore`].
//!
//! ```rust
//! use ibm_state::StateStoreBuilder;
//!
//! #[derive(Default)]
//! struct Age(u8);
//!
//! let initial: Vec<&str> = (0..100).map(|i| if i < 5 { "I" } else { "S" }).collect();
//! let store = StateStoreBuilder::new(100)
//!     .labels(["S", "I", "R"])
//!     .initial_states(&initial)
//!     .register_attribute::<Age>()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(store.counts(), vec![95, 5, 0]);
//! assert_eq!(store.attribute::<Age>().unwrap().len(), 100);
//! ```

use ibm_core::{IbmError, IbmResult, LabelSet, StateId};

use crate::{AttributeMap, StateStore};

enum Initial {
    /// Everyone starts in the first declared state.
    First,
    Names(Vec<String>),
    Ids(Vec<StateId>),
}

/// Builder for [`StateStore`].
pub struct StateStoreBuilder {
    count:      usize,
    labels:     Option<Vec<String>>,
    label_set:  Option<LabelSet<StateId>>,
    initial:    Initial,
    attributes: AttributeMap,
}

impl StateStoreBuilder {
    /// Builder for a population of `count` persons.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            labels: None,
            label_set: None,
            initial: Initial::First,
            attributes: AttributeMap::new(),
        }
    }

    /// Declare the state labels in code order.
    pub fn labels<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.labels = Some(names.into_iter().map(Into::into).collect());
        self.label_set = None;
        self
    }

    /// Use an already-built label set.
    pub fn label_set(mut self, labels: LabelSet<StateId>) -> Self {
        self.label_set = Some(labels);
        self.labels = None;
        self
    }

    /// Initial state of every person, by name.  Must have `count` entries.
    pub fn initial_states<S: AsRef<str>>(mut self, initial: &[S]) -> Self {
        self.initial = Initial::Names(initial.iter().map(|s| s.as_ref().to_owned()).collect());
        self
    }

    /// Initial state of every person, by code.
    pub fn initial_ids(mut self, initial: Vec<StateId>) -> Self {
        self.initial = Initial::Ids(initial);
        self
    }

    /// Register an attribute column `T`, filled with `T::default()`.
    pub fn register_attribute<T: Default + Send + 'static>(mut self) -> Self {
        self.attributes.register::<T>(self.count);
        self
    }

    pub fn build(self) -> IbmResult<StateStore> {
        let labels = match (self.label_set, self.labels) {
            (Some(set), _) => set,
            (None, Some(names)) => LabelSet::new(names)?,
            (None, None) => LabelSet::default(),
        };
        // PersonId::INVALID (u32::MAX) is reserved.
        if self.count as u64 > u32::MAX as u64 {
            return Err(IbmError::InvalidParameter(format!(
                "population {} exceeds the person index range",
                self.count
            )));
        }

        let mut store = StateStore::from_parts(
            labels.clone(),
            vec![StateId(0); self.count],
            self.attributes,
        );
        match self.initial {
            Initial::First => {
                if self.count > 0 && labels.is_empty() {
                    return Err(IbmError::InvalidParameter(
                        "a non-empty population needs at least one state label".into(),
                    ));
                }
            }
            Initial::Names(names) => store.initialize(&names, labels)?,
            Initial::Ids(ids) => store.initialize_ids(&ids, labels)?,
        }
        Ok(store)
    }
}
