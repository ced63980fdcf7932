//! Kernel error type.
//!
//! Every variant is a caller contract violation raised synchronously at the
//! call that triggered it.  A call that returns an error has not modified the
//! state store or the scheduler.  Sub-crates with extra failure modes (I/O,
//! configuration) wrap `IbmError` as one variant of their own enum.

use thiserror::Error;

/// The error type shared by `ibm-sampling`, `ibm-state`, and `ibm-events`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IbmError {
    /// Malformed probability, rate, delay, step size, or count argument.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A state or event label that is not part of the declared universe.
    #[error("unknown {kind} label {label:?}")]
    UnknownLabel {
        kind:  &'static str,
        label: String,
    },

    /// A person index outside `[0, count)`.
    #[error("person index {index} out of range for population of {count}")]
    InvalidIndex {
        index: usize,
        count: usize,
    },

    /// Paired sequences (or a sequence and the population) of unequal length.
    #[error("{what} length {got} does not match expected length {expected}")]
    LengthMismatch {
        what:     &'static str,
        expected: usize,
        got:      usize,
    },
}

impl IbmError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        IbmError::InvalidParameter(msg.into())
    }
}

/// Shorthand result type for all `ibm-*` kernel crates.
pub type IbmResult<T> = Result<T, IbmError>;
