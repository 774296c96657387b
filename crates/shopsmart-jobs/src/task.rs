//! Units of work run by the scheduler.

use crate::error::JobResult;
use async_trait::async_trait;

/// A job the scheduler can run on a cron schedule.
#[async_trait]
pub trait ScheduledTask: Send + Sync {
    /// Stable name used in logs and for manual triggers.
    fn name(&self) -> &str;

    /// Runs the job once.
    async fn run(&self) -> JobResult<()>;
}
