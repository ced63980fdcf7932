//! `ibm-sampling` — stochastic primitives for individual-based models.
//!
//! Every function takes the random source explicitly and has no other side
//! effect, so a run is reproducible from its seed alone.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`prob`]      | `rate_to_prob` (`1 - exp(-rate * dt)`)                      |
//! | [`bernoulli`] | `bernoulli_select`, `_rate`, `_each`, `_each_rate`          |
//! | [`delay`]     | `delay_sample` (geometric whole-step delays, minimum 1)     |
//! | [`choose`]    | `choose` (k of n without replacement)                       |
//! | `par`         | `par_bernoulli_select`, `_rate` (feature `parallel`)        |
//!
//! # Example
//!
//! ```rust
//! use ibm_core::SimRng;
//! use ibm_sampling::{bernoulli_select, delay_sample};
//!
//! let mut rng = SimRng::new(42);
//! let everyone: Vec<u32> = (0..100).collect();
//! assert!(bernoulli_select(&everyone, 0.0, &mut rng).unwrap().is_empty());
//! assert_eq!(bernoulli_select(&everyone, 1.0, &mut rng).unwrap(), everyone);
//!
//! let delays = delay_sample(5, 0.1, 1.0, &mut rng).unwrap();
//! assert!(delays.iter().all(|&d| d >= 1));
//! ```

pub mod bernoulli;
pub mod choose;
pub mod delay;
pub mod prob;

#[cfg(feature = "parallel")]
pub mod par;


pub use bernoulli::{
    bernoulli_select, bernoulli_select_each, bernoulli_select_each_rate, bernoulli_select_rate,
};
pub use choose::choose;
pub use delay::delay_sample;
pub use prob::rate_to_prob;

#[cfg(feature = "parallel")]
pub use par::{par_bernoulli_select, par_bernoulli_select_rate, PAR_CHUNK};
