//! # ShopSmart Jobs
//!
//! Background jobs run on cron schedules inside the server process. The
//! [`Scheduler`] owns the tick loop and stops through a broadcast shutdown
//! channel; [`LowStockReportTask`] mails the daily low-stock report.

pub mod error;
pub mod low_stock;
pub mod scheduler;
pub mod task;

pub use error::{JobError, JobResult};
pub use low_stock::{low_stock_scheduler, LowStockReportTask};
pub use scheduler::{ScheduledJob, Scheduler};
pub use task::ScheduledTask;
