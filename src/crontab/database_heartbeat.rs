use std::time::Instant;

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::scheduler::{CronJob, JobContext};

/// Pings the database every five minutes.
pub struct DatabaseHeartbeat;

#[async_trait]
impl CronJob for DatabaseHeartbeat {
    fn name(&self) -> &'static str {
        "database_heartbeat"
    }

    fn expression(&self) -> &str {
        "0 */5 * * * *"
    }

    async fn run(&self, ctx: &JobContext) -> AppResult<()> {
        let started = Instant::now();
        ctx.database.ping().await?;
        tracing::info!(
            "database heartbeat ok in {:.3}ms",
            started.elapsed().as_secs_f64() * 1000.0
        );
        Ok(())
    }
}
