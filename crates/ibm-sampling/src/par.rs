//! Rayon-parallel Bernoulli selection (feature `parallel`).
//!
//! Targets are split into fixed-size chunks and each chunk gets its own child
//! RNG, drawn from the caller's `SimRng` in chunk order before any parallel
//! work starts.  The output therefore depends only on the RNG state and the
//! input, never on the thread count.

use ibm_core::{IbmResult, SimRng};
use rayon::prelude::*;

use crate::bernoulli::select_with;
use crate::prob::{check_prob, rate_to_prob};

/// Targets per parallel work unit.
pub const PAR_CHUNK: usize = 16_384;

/// Parallel counterpart of [`bernoulli_select`](crate::bernoulli_select).
pub fn par_bernoulli_select<T>(targets: &[T], prob: f64, rng: &mut SimRng) -> IbmResult<Vec<T>>
where
    T: Copy + Send + Sync,
{
    let prob = check_prob(prob)?;
    Ok(par_select_with(targets, prob, rng))
}

/// Parallel counterpart of [`bernoulli_select_rate`](crate::bernoulli_select_rate).
pub fn par_bernoulli_select_rate<T>(
    targets: &[T],
    rate:    f64,
    dt:      f64,
    rng:     &mut SimRng,
) -> IbmResult<Vec<T>>
where
    T: Copy + Send + Sync,
{
    let prob = rate_to_prob(rate, dt)?;
    Ok(par_select_with(targets, prob, rng))
}

fn par_select_with<T>(targets: &[T], prob: f64, rng: &mut SimRng) -> Vec<T>
where
    T: Copy + Send + Sync,
{
    let chunks = targets.len().div_ceil(PAR_CHUNK) as u64;
    let mut children: Vec<SimRng> = (0..chunks).map(|i| rng.child(i)).collect();

    let parts: Vec<Vec<T>> = targets
        .par_chunks(PAR_CHUNK)
        .zip(children.par_iter_mut())
        .map(|(chunk, child)| select_with(chunk, prob, child))
        .collect();
    parts.concat()
}
