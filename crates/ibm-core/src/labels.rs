//! Ordered, bijective label ↔ code mapping.
//!
//! A `LabelSet<I>` holds the finite universe of state (or event) names for a
//! model.  Codes are assigned densely in declaration order, so the code of a
//! label is also its position in [`LabelSet::names`] and in every per-label
//! `Vec` kept by the kernel (counts, listener lists, …).

use std::fmt;

use crate::{EventId, IbmError, IbmResult, StateId};

#[cfg(feature = "fx-hash")]
type LabelMap<I> = rustc_hash::FxHashMap<String, I>;
#[cfg(not(feature = "fx-hash"))]
type LabelMap<I> = std::collections::HashMap<String, I>;

/// An ID type that can index a [`LabelSet`].
pub trait LabelId: Copy + Eq + fmt::Debug + Into<usize> {
    /// Human-readable label kind used in error messages.
    const KIND: &'static str;

    /// Convert a dense position into an ID; `None` if it does not fit or
    /// would collide with the `INVALID` sentinel.
    fn from_index(index: usize) -> Option<Self>;
}

impl LabelId for StateId {
    const KIND: &'static str = "state";

    fn from_index(index: usize) -> Option<Self> {
        StateId::try_from(index).ok().filter(|id| id.is_valid())
    }
}

impl LabelId for EventId {
    const KIND: &'static str = "event";

    fn from_index(index: usize) -> Option<Self> {
        EventId::try_from(index).ok().filter(|id| id.is_valid())
    }
}

/// Finite, ordered set of label names with O(1) lookup in both directions.
#[derive(Clone, Debug)]
pub struct LabelSet<I: LabelId> {
    names:  Vec<String>,
    lookup: LabelMap<I>,
}

impl<I: LabelId> Default for LabelSet<I> {
    fn default() -> Self {
        Self { names: Vec::new(), lookup: LabelMap::default() }
    }
}

impl<I: LabelId> LabelSet<I> {
    /// Build a label set from names in declaration order.
    ///
    /// Fails with `InvalidParameter` on a duplicate name or when the set
    /// outgrows the ID type.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> IbmResult<Self> {
        let mut set = Self::default();
        for name in names {
            let name = name.into();
            if set.lookup.contains_key(&name) {
                return Err(IbmError::invalid(format!(
                    "duplicate {} label {name:?}",
                    I::KIND
                )));
            }
            let id = I::from_index(set.names.len()).ok_or_else(|| {
                IbmError::invalid(format!("too many {} labels", I::KIND))
            })?;
            set.lookup.insert(name.clone(), id);
            set.names.push(name);
        }
        Ok(set)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Code for `name`, or `None` if it was never declared.
    #[inline]
    pub fn get(&self, name: &str) -> Option<I> {
        self.lookup.get(name).copied()
    }

    /// Code for `name`; `UnknownLabel` if it was never declared.
    pub fn resolve(&self, name: &str) -> IbmResult<I> {
        self.get(name).ok_or_else(|| IbmError::UnknownLabel {
            kind:  I::KIND,
            label: name.to_owned(),
        })
    }

    /// Resolve every name, failing on the first unknown one.
    pub fn resolve_all<S: AsRef<str>>(&self, names: &[S]) -> IbmResult<Vec<I>> {
        names.iter().map(|n| self.resolve(n.as_ref())).collect()
    }

    /// `id` itself if it names a declared label; `UnknownLabel` otherwise.
    pub fn check(&self, id: I) -> IbmResult<I> {
        if id.into() < self.names.len() {
            Ok(id)
        } else {
            Err(IbmError::UnknownLabel {
                kind:  I::KIND,
                label: format!("{id:?}"),
            })
        }
    }

    /// Name of `id`, or `None` for a code outside the set.
    #[inline]
    pub fn name(&self, id: I) -> Option<&str> {
        self.names.get(id.into()).map(String::as_str)
    }

    /// All names in code order.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// `(code, name)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .filter_map(|(i, n)| I::from_index(i).map(|id| (id, n.as_str())))
    }
}
