//! In-process cron scheduler.

use crate::error::{JobError, JobResult};
use crate::task::ScheduledTask;
use chrono::{DateTime, Utc};
use cron::Schedule;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

/// A task bound to a cron schedule.
#[derive(Clone)]
pub struct ScheduledJob {
    /// Cron expression, with a seconds field.
    pub cron: String,
    schedule: Schedule,
    task: Arc<dyn ScheduledTask>,
    next_run: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for ScheduledJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledJob")
            .field("name", &self.task.name())
            .field("cron", &self.cron)
            .field("next_run", &self.next_run)
            .finish()
    }
}

impl ScheduledJob {
    /// Binds `task` to `cron_expr`.
    pub fn new(cron_expr: &str, task: Arc<dyn ScheduledTask>) -> JobResult<Self> {
        let schedule = Schedule::from_str(cron_expr)
            .map_err(|e| JobError::Configuration(format!("Invalid cron expression '{cron_expr}': {e}")))?;

        Ok(Self {
            cron: cron_expr.to_string(),
            schedule,
            task,
            next_run: None,
        })
    }

    pub fn name(&self) -> &str {
        self.task.name()
    }

    /// First fire time strictly after `from`.
    pub fn next_run_from(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&from).next()
    }
}

/// Runs registered jobs when their cron schedule comes due.
///
/// The tick loop runs until a value is sent on the channel returned by
/// [`Scheduler::shutdown_handle`]. A failing job is
/// logged and rescheduled; it never stops the loop.
pub struct Scheduler {
    jobs: RwLock<HashMap<String, ScheduledJob>>,
    tick: Duration,
    shutdown_tx: broadcast::Sender<()>,
    running: AtomicBool,
}

impl Scheduler {
    /// Creates a scheduler that checks for due jobs every `tick`.
    pub fn new(tick: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            jobs: RwLock::new(HashMap::new()),
            tick: tick.max(Duration::from_millis(10)),
            shutdown_tx,
            running: AtomicBool::new(false),
        }
    }

    fn register_at(&self, mut job: ScheduledJob, now: DateTime<Utc>) {
        job.next_run = job.next_run_from(now);
        let name = job.name().to_string();
        info!(job_name = %name, cron = %job.cron, next_run = ?job.next_run, "Registered scheduled job");
        self.jobs.write().insert(name, job);
    }

    /// Registers `task` under a cron expression, first running at the next
    /// fire time after now.
    pub fn schedule(&self, cron_expr: &str, task: Arc<dyn ScheduledTask>) -> JobResult<()> {
        self.register_at(ScheduledJob::new(cron_expr, task)?, Utc::now());
        Ok(())
    }

    /// Sender that stops the tick loop when a value is sent on it.
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Runs the tick loop until shutdown.
    pub async fn start(&self) -> JobResult<()> {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(JobError::Scheduler("Scheduler already running".to_string()));
        }

        info!(tick = ?self.tick, jobs = self.jobs.read().len(), "Starting scheduler");

        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Scheduler received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_due_jobs(Utc::now()).await;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        info!("Scheduler stopped");
        Ok(())
    }

    /// Runs every job whose next run is at or before `now`, then
    /// schedules its following run. Returns how many jobs ran.
    pub async fn run_due_jobs(&self, now: DateTime<Utc>) -> usize {
        let due: Vec<Arc<dyn ScheduledTask>> = {
            let mut jobs = self.jobs.write();
            jobs.values_mut()
                .filter(|job| job.next_run.is_some_and(|at| at <= now))
                .map(|job| {
                    job.next_run = job.next_run_from(now);
                    job.task.clone()
                })
                .collect()
        };

        for task in &due {
            self.execute(task.as_ref()).await;
        }
        due.len()
    }

    async fn execute(&self, task: &dyn ScheduledTask) {
        debug!(job_name = %task.name(), "Running scheduled job");
        match task.run().await {
            Ok(()) => debug!(job_name = %task.name(), "Scheduled job completed"),
            Err(e) => {
                error!(job_name = %task.name(), error = %e, retryable = e.is_retryable(), "Scheduled job failed");
            }
        }
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("tick", &self.tick)
            .field("jobs", &self.jobs.read().len())
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::AtomicUsize;

    struct CountingTask {
        name: &'static str,
        runs: AtomicUsize,
        fail: bool,
    }

    impl CountingTask {
        fn new(name: &'static str, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                runs: AtomicUsize::new(0),
                fail,
            })
        }

        fn runs(&self) -> usize {
            self.runs.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ScheduledTask for CountingTask {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(&self) -> JobResult<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(JobError::ExecutionFailed("boom".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
    }

    fn daily_at_nine(scheduler: &Scheduler, task: Arc<CountingTask>, now: DateTime<Utc>) {
        scheduler.register_at(ScheduledJob::new("0 0 9 * * *", task).unwrap(), now);
    }

    #[test]
    fn test_invalid_cron_is_a_configuration_error() {
        let task = CountingTask::new("report", false);
        let err = ScheduledJob::new("every morning", task).unwrap_err();
        assert!(matches!(err, JobError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_job_runs_once_when_due() {
        let scheduler = Scheduler::new(Duration::from_secs(1));
        let task = CountingTask::new("report", false);
        daily_at_nine(&scheduler, task.clone(), at(8, 0));

        assert_eq!(scheduler.run_due_jobs(at(8, 59)).await, 0);
        assert_eq!(scheduler.run_due_jobs(at(9, 0)).await, 1);
        assert_eq!(scheduler.run_due_jobs(at(9, 1)).await, 0);
        assert_eq!(task.runs(), 1);

        let next = scheduler.jobs.read()["report"].next_run;
        assert_eq!(next, Some(Utc.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap()));
    }

    #[tokio::test]
    async fn test_failed_job_runs_again_next_day() {
        let scheduler = Scheduler::new(Duration::from_secs(1));
        let task = CountingTask::new("report", true);
        daily_at_nine(&scheduler, task.clone(), at(8, 0));

        assert_eq!(scheduler.run_due_jobs(at(9, 0)).await, 1);
        assert_eq!(scheduler.run_due_jobs(at(23, 0)).await, 0);
        let next_day = Utc.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap();
        assert_eq!(scheduler.run_due_jobs(next_day).await, 1);
        assert_eq!(task.runs(), 2);
    }

    #[tokio::test]
    async fn test_start_stops_on_shutdown_signal() {
        let scheduler = Arc::new(Scheduler::new(Duration::from_millis(10)));
        let handle = scheduler.shutdown_handle();

        let runner = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.start().await })
        };

        while !scheduler.is_running() {
            tokio::task::yield_now().await;
        }
        assert!(scheduler.start().await.is_err());

        handle.send(()).unwrap();
        runner.await.unwrap().unwrap();
        assert!(!scheduler.is_running());
    }
}
