//! Registered cron jobs.
//!
//! Add a job by implementing [`CronJob`] in its own module and listing it
//! in [`registry`].

mod database_heartbeat;
mod minute_job;

use std::sync::Arc;

use crate::scheduler::CronJob;

pub use database_heartbeat::DatabaseHeartbeat;
pub use minute_job::MinuteJob;

pub fn registry() -> Vec<Arc<dyn CronJob>> {
    vec![Arc::new(MinuteJob), Arc::new(DatabaseHeartbeat)]
}
