//! `ibm-core` — foundational types for the `rust_ibm` simulation kernel.
//!
//! This crate is a dependency of every other `ibm-*` crate.  It intentionally
//! has no `ibm-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde` and `rustc-hash`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `PersonId`, `StateId`, `EventId`                      |
//! | [`labels`]      | `LabelSet<I>`, `LabelId`                              |
//! | [`time`]        | `Tick`, `StepClock`, `SimConfig`                      |
//! | [`rng`]         | `SimRng`                                              |
//! | [`error`]       | `IbmError`, `IbmResult`                               |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `serde`   | Adds `Serialize`/`Deserialize` to ids, time and config.  |
//! | `fx-hash` | FxHash instead of SipHash for label name lookups.        |

pub mod error;
pub mod ids;
pub mod labels;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{IbmError, IbmResult};
pub use ids::{EventId, PersonId, StateId};
pub use labels::{LabelId, LabelSet};
pub use rng::SimRng;
pub use time::{SimConfig, StepClock, Tick};
