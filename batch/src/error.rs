//! Batch engine error types.

use centime_core::MoneyError;
use centime_fx::FxError;
use thiserror::Error;

/// Errors from batch operations.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Batch operations require at least one input.
    #[error("cannot run a batch operation on an empty input")]
    EmptyBatch,

    /// The worker pool could not be built.
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// A per-item conversion or merge failed.
    #[error(transparent)]
    Fx(#[from] FxError),
}

impl From<MoneyError> for BatchError {
    fn from(err: MoneyError) -> Self {
        BatchError::Fx(FxError::Money(err))
    }
}
