//! Per-person attribute arrays keyed by Rust type.
//!
//! Models often need more than the categorical state: an age, a household,
//! a vaccination dose count.  Each such attribute type `T` is held as one
//! `Vec<T>` of length N behind a `Box<dyn AttributeColumn>`, indexed by
//! `PersonId::index()`.  The store only hands out slices, so a column can
//! never drift from the population size.
//!
//! ```rust
//! use ibm_state::AttributeMap;
//!
//! #[derive(Default, Clone, Copy)]
//! struct Age(u8);
//!
//! let mut attrs = AttributeMap::new();
//! attrs.register::<Age>(4);
//! attrs.get_mut::<Age>().unwrap()[2] = Age(31);
//! assert_eq!(attrs.get::<Age>().unwrap()[2].0, 31);
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Type-erased view of one attribute column.
pub trait AttributeColumn: Send + 'static {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Column<T>(Vec<T>);

impl<T: Default + Send + 'static> AttributeColumn for Column<T> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Registry of attribute columns, at most one per type.
#[derive(Default)]
pub struct AttributeMap {
    columns: HashMap<TypeId, Box<dyn AttributeColumn>>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` with `count` default values.  Re-registering keeps the
    /// existing column untouched.
    pub fn register<T: Default + Send + 'static>(&mut self, count: usize) {
        self.columns.entry(TypeId::of::<T>()).or_insert_with(|| {
            let mut values = Vec::with_capacity(count);
            values.resize_with(count, T::default);
            Box::new(Column(values))
        });
    }

    /// Column `T`, or `None` if it was never registered.
    pub fn get<T: Default + Send + 'static>(&self) -> Option<&[T]> {
        self.columns
            .get(&TypeId::of::<T>())
            .and_then(|c| c.as_any().downcast_ref::<Column<T>>())
            .map(|c| c.0.as_slice())
    }

    /// Mutable column `T`.  Values can be rewritten but not added or removed.
    pub fn get_mut<T: Default + Send + 'static>(&mut self) -> Option<&mut [T]> {
        self.columns
            .get_mut(&TypeId::of::<T>())
            .and_then(|c| c.as_any_mut().downcast_mut::<Column<T>>())
            .map(|c| c.0.as_mut_slice())
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.columns.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered attribute types.
    pub fn type_count(&self) -> usize {
        self.columns.len()
    }
}

impl std::fmt::Debug for AttributeMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeMap")
            .field("types", &self.columns.len())
            .finish()
    }
}
