//! Cron job contract.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

/// Resources handed to every run
#[derive(Clone)]
pub struct JobContext {
    pub database: Arc<Database>,
    pub config: Arc<Config>,
}

/// A recurring job with a six-field cron expression
/// (`sec min hour day-of-month month day-of-week`).
#[async_trait]
pub trait CronJob: Send + Sync {
    /// Unique job name, also the worker name
    fn name(&self) -> &'static str;

    fn expression(&self) -> &str;

    async fn run(&self, ctx: &JobContext) -> AppResult<()>;
}

/// One fire time produced by the cron stream
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Tick {
    pub scheduled_at: DateTime<FixedOffset>,
}

impl From<DateTime<FixedOffset>> for Tick {
    fn from(scheduled_at: DateTime<FixedOffset>) -> Self {
        Self { scheduled_at }
    }
}
