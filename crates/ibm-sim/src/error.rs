use ibm_core::IbmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} has {got} persons but the configured population is {expected}")]
    PopulationMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error(transparent)]
    Model(#[from] IbmError),
}

pub type SimResult<T> = Result<T, SimError>;
