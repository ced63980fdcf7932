//! `ibm-state` — the State Store of the `rust_ibm` kernel.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`store`]     | `StateStore`: current/pending buffers, queries, commit     |
//! | [`attribute`] | `AttributeMap`, `AttributeColumn` (per-person typed arrays) |
//! | [`builder`]   | `StateStoreBuilder`                                        |

pub mod attribute;
pub mod builder;
pub mod store;


pub use attribute::{AttributeColumn, AttributeMap};
pub use builder::StateStoreBuilder;
pub use store::StateStore;
