//! Plain data rows written by output backends.

/// Number of persons in every state after one committed step.
#[derive(Debug, Clone, PartialEq)]
pub struct StateCountRow {
    pub tick:   u64,
    /// Model time, `tick * dt`.
    pub time:   f64,
    /// One entry per state, in label order.
    pub counts: Vec<u64>,
}

/// Activity during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSummaryRow {
    pub tick:    u64,
    pub time:    f64,
    pub fired:   u64,
    pub applied: u64,
}
