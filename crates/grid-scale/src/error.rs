//! Scaling error types.

use thiserror::Error;

pub type ScaleResult<T> = Result<T, ScaleError>;

/// Errors raised while preparing a scaling request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScaleError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("not logged in")]
    NotLoggedIn,

    #[error("desired scaling equals the current state")]
    DesiredEqualsCurrentState,

    #[error("conflicting worker flags used")]
    ConflictingWorkerFlags,

    #[error("not enough worker nodes specified")]
    NotEnoughWorkerNodes,

    #[error("cannot scale below the minimum number of worker nodes")]
    CannotScaleBelowMinimumWorkers,

    #[error("minimum number of workers must not exceed the maximum")]
    WorkersMinMaxInvalid,

    #[error("command aborted")]
    CommandAborted,
}

impl ScaleError {
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, ScaleError::InvalidConfig(_))
    }
}
