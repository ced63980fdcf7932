//! Rate → probability conversion and argument checks shared by the samplers.

use ibm_core::{IbmError, IbmResult};

/// Per-step event probability for a constant hazard `rate` over a step of
/// length `dt`: `1 - exp(-rate * dt)`.
///
/// `rate` must be finite and `>= 0`; `dt` must be finite and `> 0`.
pub fn rate_to_prob(rate: f64, dt: f64) -> IbmResult<f64> {
    check_rate(rate)?;
    check_dt(dt)?;
    // exp_m1 keeps precision for the tiny rate*dt products typical of small steps.
    Ok(-(-rate * dt).exp_m1())
}

pub(crate) fn check_prob(prob: f64) -> IbmResult<f64> {
    if (0.0..=1.0).contains(&prob) {
        Ok(prob)
    } else {
        Err(IbmError::InvalidParameter(format!(
            "probability must be in [0, 1], got {prob}"
        )))
    }
}

pub(crate) fn check_rate(rate: f64) -> IbmResult<f64> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(rate)
    } else {
        Err(IbmError::InvalidParameter(format!(
            "rate must be finite and >= 0, got {rate}"
        )))
    }
}

pub(crate) fn check_dt(dt: f64) -> IbmResult<f64> {
    if dt.is_finite() && dt > 0.0 {
        Ok(dt)
    } else {
        Err(IbmError::InvalidParameter(format!(
            "dt must be finite and > 0, got {dt}"
        )))
    }
}
