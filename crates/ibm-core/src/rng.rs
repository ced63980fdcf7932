//! Deterministic simulation RNG.
//!
//! # Determinism strategy
//!
//! There is no process-wide generator.  A run owns exactly one `SimRng`,
//! seeded from `SimConfig::seed`, and threads `&mut SimRng` explicitly into
//! every sampling call.  Two runs with the same seed, the same processes, and
//! the same listeners therefore produce identical trajectories.
//!
//! Work that fans out (e.g. the `parallel` sampler in `ibm-sampling`) derives
//! independent children with [`SimRng::child`].  Children are drawn from the
//! parent in a fixed order, so results do not depend on thread scheduling.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Simulation-level RNG passed explicitly to every sampler.
///
/// Implements [`RngCore`], so the whole [`rand::Rng`] extension API
/// (`gen_bool`, `gen_range`, …) is available on it.
#[derive(Clone, Debug)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` mixed with `offset`, for
    /// seeding per-chunk RNGs deterministically from the root seed.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }
}

impl RngCore for SimRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}
