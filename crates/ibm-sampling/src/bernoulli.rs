//! Independent-inclusion (Bernoulli) selection from a target set.
//!
//! Every function returns a subsequence of `targets`: input order is kept and
//! each element appears at most once.  Callers typically pass the ascending
//! output of `StateStore::query_by_state` and hand the result straight to
//! `queue_update` or `schedule`.

use ibm_core::{IbmError, IbmResult};
use rand::Rng;

use crate::prob::{check_dt, check_prob, rate_to_prob};

/// Below this probability, selection jumps between successes with geometric
/// skips instead of drawing one uniform per target.
const SKIP_THRESHOLD: f64 = 0.1;

/// Keep each element of `targets` independently with probability `prob`.
///
/// `prob` outside `[0, 1]` (or NaN) fails with `InvalidParameter`.
/// `prob == 0` always returns an empty vec; `prob == 1` returns all targets.
pub fn bernoulli_select<T, R>(targets: &[T], prob: f64, rng: &mut R) -> IbmResult<Vec<T>>
where
    T: Copy,
    R: Rng + ?Sized,
{
    let prob = check_prob(prob)?;
    Ok(select_with(targets, prob, rng))
}

/// Keep each element with probability `1 - exp(-rate * dt)`.
pub fn bernoulli_select_rate<T, R>(
    targets: &[T],
    rate:    f64,
    dt:      f64,
    rng:     &mut R,
) -> IbmResult<Vec<T>>
where
    T: Copy,
    R: Rng + ?Sized,
{
    let prob = rate_to_prob(rate, dt)?;
    Ok(select_with(targets, prob, rng))
}

/// Keep `targets[i]` with its own probability `probs[i]`.
///
/// Fails with `LengthMismatch` if the slices differ in length, or
/// `InvalidParameter` if any probability is outside `[0, 1]`.
pub fn bernoulli_select_each<T, R>(
    targets: &[T],
    probs:   &[f64],
    rng:     &mut R,
) -> IbmResult<Vec<T>>
where
    T: Copy,
    R: Rng + ?Sized,
{
    check_len(targets.len(), probs.len(), "probability vector")?;
    for &p in probs {
        check_prob(p)?;
    }
    Ok(targets
        .iter()
        .zip(probs)
        .filter(|&(_, &p)| rng.gen_bool(p))
        .map(|(&t, _)| t)
        .collect())
}

/// Keep `targets[i]` with probability `1 - exp(-rates[i] * dt)`.
pub fn bernoulli_select_each_rate<T, R>(
    targets: &[T],
    rates:   &[f64],
    dt:      f64,
    rng:     &mut R,
) -> IbmResult<Vec<T>>
where
    T: Copy,
    R: Rng + ?Sized,
{
    check_len(targets.len(), rates.len(), "rate vector")?;
    check_dt(dt)?;
    let probs = rates
        .iter()
        .map(|&rate| rate_to_prob(rate, dt))
        .collect::<IbmResult<Vec<f64>>>()?;
    bernoulli_select_each(targets, &probs, rng)
}

/// Selection with an already-validated probability.
pub(crate) fn select_with<T, R>(targets: &[T], prob: f64, rng: &mut R) -> Vec<T>
where
    T: Copy,
    R: Rng + ?Sized,
{
    if prob <= 0.0 || targets.is_empty() {
        return Vec::new();
    }
    if prob >= 1.0 {
        return targets.to_vec();
    }
    if prob < SKIP_THRESHOLD {
        return skip_select(targets, prob, rng);
    }
    targets.iter().copied().filter(|_| rng.gen_bool(prob)).collect()
}

/// Geometric-skip selection: the gap before the next kept element is
/// `floor(ln U / ln(1 - p))` with `U ~ Uniform(0, 1]`.
fn skip_select<T, R>(targets: &[T], prob: f64, rng: &mut R) -> Vec<T>
where
    T: Copy,
    R: Rng + ?Sized,
{
    let log_q = (-prob).ln_1p();
    let mut out = Vec::with_capacity((targets.len() as f64 * prob) as usize + 1);
    let mut i = 0usize;
    loop {
        let u = 1.0 - rng.r#gen::<f64>();
        // Float → int `as` saturates, so astronomically long gaps just end the scan.
        let skip = (u.ln() / log_q).floor() as usize;
        i = i.saturating_add(skip);
        match targets.get(i) {
            Some(&t) => {
                out.push(t);
                i += 1;
            }
            None => break,
        }
    }
    out
}

fn check_len(expected: usize, got: usize, what: &'static str) -> IbmResult<()> {
    if expected == got {
        Ok(())
    } else {
        Err(IbmError::LengthMismatch { what, expected, got })
    }
}
