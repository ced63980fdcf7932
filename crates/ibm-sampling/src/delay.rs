//! Discretised exponential waiting times.

use ibm_core::{IbmError, IbmResult};
use rand::Rng;

use crate::prob::check_dt;

/// Draw `count` independent delays, in whole steps, until an event with
/// hazard `rate` fires.
///
/// Each delay is geometric with per-step success probability
/// `1 - exp(-rate * dt)`, counting the step of the first success, so the
/// minimum is 1.  Sampling inverts the exponential waiting time
/// `W = -ln(U) / rate` and rounds `W / dt` up to the next whole step, which
/// is exactly that geometric law.
///
/// `rate` must be finite and `> 0`; `dt` finite and `> 0`.
pub fn delay_sample<R>(count: usize, rate: f64, dt: f64, rng: &mut R) -> IbmResult<Vec<u32>>
where
    R: Rng + ?Sized,
{
    if !(rate.is_finite() && rate > 0.0) {
        return Err(IbmError::InvalidParameter(format!(
            "delay rate must be finite and > 0, got {rate}"
        )));
    }
    let scale = rate * check_dt(dt)?;
    Ok((0..count)
        .map(|_| {
            let u = 1.0 - rng.r#gen::<f64>();
            let steps = (-u.ln() / scale).ceil();
            (steps as u32).max(1)
        })
        .collect())
}
