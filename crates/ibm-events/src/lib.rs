//! `ibm-events` — the Event Scheduler of the `rust_ibm` kernel.
//!
//! Per-person events are scheduled with a whole-step delay, counted down by
//! `tick`, and fired to user listeners when they reach zero.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`queue`]     | `EventQueue`, `ScheduledEntry`, `Delays`                 |
//! | [`listener`]  | `Listener` trait (closures implement it)                 |
//! | [`context`]   | `EventContext` (what a listener may touch)               |
//! | [`scheduler`] | `Scheduler`: labels, listeners, `tick`/`process`/`advance` |

pub mod context;
pub mod listener;
pub mod queue;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use context::EventContext;
pub use listener::Listener;
pub use queue::{Delays, EventQueue, ScheduledEntry};
pub use scheduler::Scheduler;
