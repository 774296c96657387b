//! Job error types.

use shopsmart_core::ShopError;
use thiserror::Error;

/// Result type for job operations.
pub type JobResult<T> = Result<T, JobError>;

/// Job-related errors.
#[derive(Debug, Error)]
pub enum JobError {
    /// Job execution failed.
    #[error("Job execution failed: {0}")]
    ExecutionFailed(String),

    /// A service call made by the job failed.
    #[error("Service error: {0}")]
    Service(#[from] ShopError),

    /// Scheduler error.
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// Configuration error, such as an invalid cron expression.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl JobError {
    /// Returns true if running the job again later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            JobError::ExecutionFailed(_) => true,
            JobError::Service(e) => e.is_retriable(),
            _ => false,
        }
    }
}
