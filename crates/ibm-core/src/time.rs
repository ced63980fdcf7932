//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  The
//! mapping to model time is held in `StepClock`:
//!
//!   time = tick * dt
//!
//! The kernel's own bookkeeping (delays, firing) always counts whole ticks;
//! `dt` only matters to sampler calls that convert rates to per-step
//! probabilities.  Step 1 is the first simulated step; `Tick::ZERO` is the
//! initial condition before any step has run.

use std::fmt;

use crate::{IbmError, IbmResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── StepClock ─────────────────────────────────────────────────────────────────

/// Converts between tick counts and model time.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepClock {
    /// Model-time length of one step (Δt).
    pub dt: f64,
    /// The last completed tick.
    pub current_tick: Tick,
}

impl StepClock {
    pub fn new(dt: f64) -> Self {
        Self { dt, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick and return the new tick.
    #[inline]
    pub fn advance(&mut self) -> Tick {
        self.current_tick = Tick(self.current_tick.0 + 1);
        self.current_tick
    }

    /// Model time at the current tick.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time_of(self.current_tick)
    }

    /// Model time at an arbitrary tick.
    #[inline]
    pub fn time_of(&self, tick: Tick) -> f64 {
        tick.0 as f64 * self.dt
    }
}

impl fmt::Display for StepClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (t = {:.3})", self.current_tick, self.time())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed
/// to the model builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Population size N.  Fixed for the whole run.
    pub population: usize,

    /// Total steps to simulate (T).  Steps are numbered `1..=steps`.
    pub steps: u64,

    /// Step size Δt in model time units.  Must be positive and finite.
    pub dt: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Write output every N steps.  1 = every step; 0 = never.
    pub output_interval_steps: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            population:            1_000,
            steps:                 1_000,
            dt:                    0.1,
            seed:                  42,
            output_interval_steps: 1,
        }
    }
}

impl SimConfig {
    /// Configuration covering model time `[0, tmax]` at step size `dt`.
    ///
    /// `steps = round(tmax / dt)`.
    pub fn from_horizon(population: usize, tmax: f64, dt: f64, seed: u64) -> IbmResult<Self> {
        if !(tmax.is_finite() && tmax >= 0.0) {
            return Err(IbmError::invalid(format!("tmax must be finite and >= 0, got {tmax}")));
        }
        let config = Self {
            population,
            steps: 0,
            dt,
            seed,
            output_interval_steps: 1,
        };
        config.validate()?;
        Ok(Self { steps: (tmax / dt).round() as u64, ..config })
    }

    /// Reject configurations the kernel cannot run.
    pub fn validate(&self) -> IbmResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(IbmError::invalid(format!(
                "dt must be finite and > 0, got {}",
                self.dt
            )));
        }
        Ok(())
    }

    /// The last tick of the run (inclusive).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.steps)
    }

    /// Construct a `StepClock` pre-configured for this run.
    pub fn make_clock(&self) -> StepClock {
        StepClock::new(self.dt)
    }
}
