use async_trait::async_trait;
use chrono::Utc;

use crate::errors::AppResult;
use crate::scheduler::{CronJob, JobContext};

/// Logs the current time at the top of every minute.
pub struct MinuteJob;

#[async_trait]
impl CronJob for MinuteJob {
    fn name(&self) -> &'static str {
        "minute_job"
    }

    fn expression(&self) -> &str {
        "0 * * * * *"
    }

    async fn run(&self, ctx: &JobContext) -> AppResult<()> {
        let now = Utc::now().with_timezone(&ctx.config.scheduler.timezone);
        tracing::info!("minute_job tick at {}", now.format("%Y-%m-%d %H:%M:%S %:z"));
        Ok(())
    }
}
