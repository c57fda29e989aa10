//! Errors

use thiserror::Error;

/// Status of a failed relight operation. Success is `Ok(())`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelightError {
    /// A precondition of the call was violated.
    #[error("invalid call: {0}")]
    InvalidCall(String),

    /// The capability is not provided by the current implementation.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// The bake was stopped through a `CancellationToken`.
    #[error("bake cancelled")]
    Cancelled,

    /// A worker could not accept or report a job.
    #[error("worker failed: {0}")]
    WorkerFailed(String),
}

impl RelightError {
    /// Creates an `InvalidCall` error.
    ///
    /// * `msg` - Description of the violated precondition.
    pub fn invalid_call<S: Into<String>>(msg: S) -> Self {
        Self::InvalidCall(msg.into())
    }

    /// Creates a `NotImplemented` error.
    ///
    /// * `what` - Missing capability.
    pub fn not_implemented<S: Into<String>>(what: S) -> Self {
        Self::NotImplemented(what.into())
    }
}

/// Result type used throughout relight.
pub type Result<T> = std::result::Result<T, RelightError>;
