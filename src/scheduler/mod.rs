//! Cron scheduler bootstrap.
//!
//! Every registered [`CronJob`] gets its own apalis worker fed by a
//! `CronStream` in the configured timezone. A [`FireGuard`] per job applies
//! the misfire, coalesce and max-instance defaults before each run.
//!
//! The stream stamps a tick with the time it woke up and sleeps until the
//! next slot after that, so slots passed over while a run was in flight are
//! never delivered. Each job therefore remembers its last handled slot and
//! turns every tick into the slots that fell due since. The newest of those
//! is observed first, which lets the guard coalesce the older ones.

mod guard;
mod job;

use std::collections::HashSet;
use std::future::Future;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use apalis::prelude::*;
use apalis_cron::{CronStream, Schedule};
use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::errors::{AppError, AppResult};

pub use guard::{Decision, FireGuard, JobOptions, RunPermit};
pub use job::{CronJob, JobContext, Tick};

/// Result of loading the job registry
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registration {
    pub loaded: Vec<String>,
    /// `(job name, reason)`
    pub failed: Vec<(String, String)>,
}

impl Registration {
    pub fn log_summary(&self) {
        for (name, reason) in &self.failed {
            tracing::error!(job = %name, "Failed to register cron job: {}", reason);
        }
        tracing::info!(
            "Cron jobs registered: {} loaded, {} failed",
            self.loaded.len(),
            self.failed.len()
        );
    }
}

/// What a single tick ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Ran,
    Skipped,
}

/// How far ahead of a slot a tick may wake and still count for it
const WAKE_TOLERANCE_MS: i64 = 500;

/// Slots due at `stamp`, oldest first.
///
/// Without a previous slot only the slot `stamp` woke for is returned.
pub fn due_slots(
    schedule: &Schedule,
    last_slot: Option<DateTime<FixedOffset>>,
    stamp: DateTime<FixedOffset>,
) -> Vec<DateTime<FixedOffset>> {
    let horizon = stamp + Duration::milliseconds(WAKE_TOLERANCE_MS);
    let from = last_slot.unwrap_or(stamp - Duration::seconds(1));

    let mut due: Vec<_> = schedule
        .after(&from)
        .take_while(|slot| *slot <= horizon)
        .collect();

    if last_slot.is_none() && due.len() > 1 {
        due.drain(..due.len() - 1);
    }
    due
}

/// A job with its parsed schedule and guard
pub struct ScheduledJob {
    job: Arc<dyn CronJob>,
    schedule: Schedule,
    guard: Arc<FireGuard>,
    ctx: JobContext,
    timezone: FixedOffset,
    last_slot: Mutex<Option<DateTime<FixedOffset>>>,
}

impl ScheduledJob {
    pub fn name(&self) -> &'static str {
        self.job.name()
    }

    pub fn expression(&self) -> &str {
        self.job.expression()
    }

    pub fn guard(&self) -> &Arc<FireGuard> {
        &self.guard
    }

    /// Next `n` fire times in the scheduler timezone.
    pub fn upcoming(&self, n: usize) -> Vec<DateTime<FixedOffset>> {
        self.schedule.upcoming(self.timezone).take(n).collect()
    }

    fn take_due(&self, stamp: DateTime<FixedOffset>) -> Vec<DateTime<FixedOffset>> {
        let mut last_slot = self
            .last_slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let due = due_slots(&self.schedule, *last_slot, stamp);
        match due.last() {
            Some(newest) => *last_slot = Some(*newest),
            None => {
                tracing::debug!(job = self.name(), %stamp, "Tick matched no slot, running as stamped");
                return vec![stamp];
            }
        }
        due
    }

    /// Fire every slot that fell due by `stamp`, oldest first.
    pub async fn handle_tick(
        &self,
        stamp: DateTime<FixedOffset>,
        now: DateTime<FixedOffset>,
    ) -> AppResult<Vec<FireOutcome>> {
        let due = self.take_due(stamp);
        if let Some(newest) = due.last() {
            self.guard.observe(*newest);
        }

        let mut outcomes = Vec::with_capacity(due.len());
        let mut failure = None;
        for slot in due {
            match self.fire(slot, now).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => failure = Some(e),
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(outcomes),
        }
    }

    /// Run the job for one tick unless the guard says otherwise.
    pub async fn fire(
        &self,
        scheduled_at: DateTime<FixedOffset>,
        now: DateTime<FixedOffset>,
    ) -> AppResult<FireOutcome> {
        let permit = match self.guard.decide(scheduled_at, now) {
            Decision::Run(permit) => permit,
            Decision::Misfired { late_by } => {
                tracing::warn!(
                    job = self.name(),
                    %scheduled_at,
                    "Run skipped: missed by {}s",
                    late_by.num_seconds()
                );
                return Ok(FireOutcome::Skipped);
            }
            Decision::Coalesced => {
                tracing::debug!(job = self.name(), %scheduled_at, "Run coalesced into a newer tick");
                return Ok(FireOutcome::Skipped);
            }
            Decision::AtCapacity { running } => {
                tracing::warn!(
                    job = self.name(),
                    %scheduled_at,
                    "Run skipped: {} instance(s) still running",
                    running
                );
                return Ok(FireOutcome::Skipped);
            }
        };

        let started = Instant::now();
        tracing::debug!(job = self.name(), %scheduled_at, "Job started");
        let result = self.job.run(&self.ctx).await;
        drop(permit);

        match result {
            Ok(()) => {
                tracing::info!(
                    job = self.name(),
                    "Job finished in {:.3}ms",
                    started.elapsed().as_secs_f64() * 1000.0
                );
                Ok(FireOutcome::Ran)
            }
            Err(e) => {
                tracing::error!(job = self.name(), "Job failed: {}", e);
                Err(e)
            }
        }
    }
}

/// Worker entry point for one tick
async fn run_tick(tick: Tick, job: Data<Arc<ScheduledJob>>) -> Result<(), AppError> {
    let now = Utc::now().with_timezone(&job.timezone);
    job.handle_tick(tick.scheduled_at, now).await.map(|_| ())
}

/// Loaded jobs ready to be run
pub struct Scheduler {
    jobs: Vec<Arc<ScheduledJob>>,
    registration: Registration,
    timezone: FixedOffset,
}

impl Scheduler {
    /// Parse every job's expression. Invalid or duplicate jobs are recorded
    /// in [`Registration::failed`] and left out.
    pub fn from_registry(jobs: Vec<Arc<dyn CronJob>>, ctx: JobContext) -> Self {
        let scheduler_config = ctx.config.scheduler.clone();
        let options = JobOptions::from(&scheduler_config);
        let timezone = scheduler_config.timezone;

        let mut registration = Registration::default();
        let mut seen = HashSet::new();
        let mut loaded = Vec::new();

        for job in jobs {
            let name = job.name().to_string();

            if !seen.insert(name.clone()) {
                registration
                    .failed
                    .push((name, "duplicate job name".to_string()));
                continue;
            }

            match Schedule::from_str(job.expression()) {
                Ok(schedule) => {
                    registration.loaded.push(name);
                    loaded.push(Arc::new(ScheduledJob {
                        job,
                        schedule,
                        guard: FireGuard::new(options),
                        ctx: ctx.clone(),
                        timezone,
                        last_slot: Mutex::new(None),
                    }));
                }
                Err(e) => {
                    registration.failed.push((
                        name,
                        format!("invalid cron expression {:?}: {}", job.expression(), e),
                    ));
                }
            }
        }

        Self {
            jobs: loaded,
            registration,
            timezone,
        }
    }

    pub fn registration(&self) -> &Registration {
        &self.registration
    }

    pub fn jobs(&self) -> &[Arc<ScheduledJob>] {
        &self.jobs
    }

    pub fn timezone(&self) -> FixedOffset {
        self.timezone
    }

    /// `(job name, next fire times)` for every loaded job.
    pub fn upcoming(&self, n: usize) -> Vec<(&'static str, Vec<DateTime<FixedOffset>>)> {
        self.jobs
            .iter()
            .map(|job| (job.name(), job.upcoming(n)))
            .collect()
    }

    /// Start one worker per job and block until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> AppResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.jobs.is_empty() {
            tracing::warn!("No cron jobs loaded, scheduler not started");
            return Ok(());
        }

        let mut monitor = Monitor::new();
        for job in &self.jobs {
            let stream = CronStream::new_with_timezone(job.schedule.clone(), self.timezone);
            let worker = WorkerBuilder::new(job.name())
                .data(Arc::clone(job))
                .backend(stream)
                .build_fn(run_tick);
            monitor = monitor.register(worker);
        }

        tracing::info!(
            "Scheduler started with {} job(s), timezone {}",
            self.jobs.len(),
            self.timezone
        );

        monitor
            .run_with_signal(async move {
                shutdown.await;
                Ok(())
            })
            .await
            .map_err(|e| AppError::internal(format!("Scheduler error: {}", e)))?;

        tracing::info!("Scheduler stopped");
        Ok(())
    }
}
