//! Daily low-stock report.

use crate::error::JobResult;
use crate::scheduler::Scheduler;
use crate::task::ScheduledTask;
use async_trait::async_trait;
use shopsmart_config::SchedulerConfig;
use shopsmart_service::ProductService;
use std::sync::Arc;
use tracing::debug;

/// Mails the admin a list of products whose stock is at or below a threshold.
pub struct LowStockReportTask {
    product_service: Arc<dyn ProductService>,
    threshold: u32,
}

impl LowStockReportTask {
    pub const NAME: &'static str = "low_stock_report";

    pub fn new(product_service: Arc<dyn ProductService>, threshold: u32) -> Self {
        Self {
            product_service,
            threshold,
        }
    }
}

impl std::fmt::Debug for LowStockReportTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LowStockReportTask")
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ScheduledTask for LowStockReportTask {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self) -> JobResult<()> {
        let reported = self.product_service.send_low_stock_report(self.threshold).await?;
        if reported == 0 {
            debug!("Low-stock report skipped: no product at or below {}", self.threshold);
        } else {
            debug!("Low-stock report sent for {} products", reported);
        }
        Ok(())
    }
}

/// Builds a scheduler with the low-stock report registered on the configured cron.
pub fn low_stock_scheduler(config: &SchedulerConfig, product_service: Arc<dyn ProductService>) -> JobResult<Scheduler> {
    let scheduler = Scheduler::new(config.tick_interval());
    let task = LowStockReportTask::new(product_service, config.low_stock_threshold);
    scheduler.schedule(&config.low_stock_cron, Arc::new(task))?;
    Ok(scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JobError;
    use chrono::{Duration, Utc};
    use shopsmart_core::UserRole;
    use shopsmart_service::testing::{InMemoryCache, TestContext};

    #[tokio::test]
    async fn test_report_mails_low_stock_products() {
        let ctx = TestContext::new();
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        ctx.seed_product(seller.id, "Kettle", 25, 2);
        ctx.seed_product(seller.id, "Toaster", 40, 30);

        let task = LowStockReportTask::new(ctx.product_service.clone(), 5);
        task.run().await.unwrap();

        let sent = ctx.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("Kettle"));
        assert!(!sent[0].body.contains("Toaster"));
    }

    #[tokio::test]
    async fn test_nothing_low_sends_nothing() {
        let ctx = TestContext::with_cache(Arc::new(InMemoryCache::new()));
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        ctx.seed_product(seller.id, "Toaster", 40, 30);

        LowStockReportTask::new(ctx.product_service.clone(), 5).run().await.unwrap();
        assert!(ctx.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_mail_failure_surfaces_as_service_error() {
        let ctx = TestContext::new();
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        ctx.seed_product(seller.id, "Kettle", 25, 1);
        ctx.mailer.set_failing(true);

        let err = LowStockReportTask::new(ctx.product_service.clone(), 5).run().await.unwrap_err();
        assert!(matches!(err, JobError::Service(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_scheduler_from_config_runs_report_when_due() {
        let ctx = TestContext::new();
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        ctx.seed_product(seller.id, "Kettle", 25, 1);
        let scheduler = low_stock_scheduler(&SchedulerConfig::default(), ctx.product_service.clone()).unwrap();

        assert_eq!(scheduler.run_due_jobs(Utc::now()).await, 0);
        assert_eq!(scheduler.run_due_jobs(Utc::now() + Duration::days(2)).await, 1);
        assert_eq!(ctx.mailer.sent().len(), 1);
    }

    #[test]
    fn test_scheduler_from_config_rejects_bad_cron() {
        let ctx = TestContext::new();
        let config = SchedulerConfig {
            low_stock_cron: "every morning".to_string(),
            ..SchedulerConfig::default()
        };

        let err = low_stock_scheduler(&config, ctx.product_service.clone()).unwrap_err();
        assert!(matches!(err, JobError::Configuration(_)));
    }
}
