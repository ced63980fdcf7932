//! `ibm-sim` — step driver for the `rust_ibm` kernel.
//!
//! # Step loop
//!
//! ```text
//! for t in 1..=config.steps:
//!   ① Processes — user transition rules, registration order; each reads the
//!                 same current state and queues updates / schedules events.
//!   ② Events    — Scheduler::advance: fire due events to their listeners
//!                 (label order, then registration order), then decrement
//!                 every delay.  Delay d scheduled in step t fires in t + d.
//!   ③ Commit    — StateStore::apply_updates.
//!   ④ Observe   — SimObserver::on_step_end with the committed state.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                               |
//! |------------|------------------------------------------------------|
//! | `parallel` | Enables `ibm_sampling::par_bernoulli_select`.        |
//! | `serde`    | `SimConfig` (and ids, ticks) become (de)serialisable. |
//! | `fx-hash`  | FxHash for label lookups.                            |
//!
//! # Quick-start
//!
//! ```rust
//! use ibm_core::{IbmResult, SimConfig};
//! use ibm_sampling::bernoulli_select_rate;
//! use ibm_sim::{ModelBuilder, StepContext, Trajectory};
//!
//! let config = SimConfig { population: 100, steps: 50, ..SimConfig::default() };
//! let initial: Vec<&str> = (0..100).map(|i| if i < 10 { "I" } else { "S" }).collect();
//!
//! let mut model = ModelBuilder::new(config)
//!     .states(["S", "I", "R"])
//!     .initial_states(&initial)
//!     .process(|ctx: &mut StepContext<'_>| -> IbmResult<()> {
//!         let infectious = ctx.state.query_by_state(&["I"])?;
//!         let recovered = bernoulli_select_rate(&infectious, 0.1, ctx.dt, ctx.rng)?;
//!         ctx.state.queue_update(&recovered, "R")
//!     })
//!     .build()
//!     .unwrap();
//!
//! let mut trajectory = Trajectory::new();
//! model.run(&mut trajectory).unwrap();
//! assert_eq!(trajectory.len(), 50);
//! ```

pub mod builder;
pub mod error;
pub mod model;
pub mod observer;
pub mod process;


pub use builder::ModelBuilder;
pub use error::{SimError, SimResult};
pub use model::Model;
pub use observer::{NoopObserver, SimObserver, StepSummary, Trajectory};
pub use process::{Process, StepContext};

/// Everything a model definition usually needs, across the kernel crates.
pub mod prelude {
    pub use ibm_core::{EventId, IbmError, IbmResult, PersonId, SimConfig, SimRng, StateId, Tick};
    pub use ibm_events::{Delays, EventContext, Listener, Scheduler};
    pub use ibm_sampling::{
        bernoulli_select, bernoulli_select_each, bernoulli_select_each_rate,
        bernoulli_select_rate, choose, delay_sample, rate_to_prob,
    };
    pub use ibm_state::{StateStore, StateStoreBuilder};

    pub use crate::{
        Model, ModelBuilder, NoopObserver, Process, SimError, SimObserver, SimResult,
        StepContext, StepSummary, Trajectory,
    };
}
