//! Per-job fire policy: misfire grace, coalescing and instance limits.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, FixedOffset};

use crate::config::SchedulerConfig;

/// Options applied to one scheduled job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobOptions {
    pub coalesce: bool,
    pub max_instances: usize,
    pub misfire_grace: Duration,
}

impl From<&SchedulerConfig> for JobOptions {
    fn from(config: &SchedulerConfig) -> Self {
        Self {
            coalesce: config.coalesce,
            max_instances: config.max_instances.max(1),
            misfire_grace: config.misfire_grace,
        }
    }
}

#[derive(Debug, Default)]
struct JobState {
    latest_seen: Option<DateTime<FixedOffset>>,
    running: usize,
}

impl JobState {
    fn see(&mut self, slot: DateTime<FixedOffset>) {
        if self.latest_seen.map_or(true, |latest| slot > latest) {
            self.latest_seen = Some(slot);
        }
    }
}

/// What to do with one tick
#[derive(Debug)]
pub enum Decision {
    Run(RunPermit),
    /// Started more than the grace period after it was due
    Misfired { late_by: chrono::Duration },
    /// A newer tick has already been handled
    Coalesced,
    /// `max_instances` runs are still in flight
    AtCapacity { running: usize },
}

impl Decision {
    pub fn is_run(&self) -> bool {
        matches!(self, Decision::Run(_))
    }
}

/// Tracks in-flight runs of one job.
#[derive(Debug)]
pub struct FireGuard {
    options: JobOptions,
    state: Mutex<JobState>,
}

impl FireGuard {
    pub fn new(options: JobOptions) -> Arc<Self> {
        Arc::new(Self {
            options,
            state: Mutex::new(JobState::default()),
        })
    }

    /// Number of runs currently holding a permit.
    pub fn running(&self) -> usize {
        self.lock().running
    }

    /// Record `slot` as seen without running it. Older ticks decided
    /// afterwards are coalesced.
    pub fn observe(&self, slot: DateTime<FixedOffset>) {
        self.lock().see(slot);
    }

    fn lock(&self) -> MutexGuard<'_, JobState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Decide a tick that was due at `scheduled_at`, observed at `now`.
    pub fn decide(
        self: &Arc<Self>,
        scheduled_at: DateTime<FixedOffset>,
        now: DateTime<FixedOffset>,
    ) -> Decision {
        let late_by = now.signed_duration_since(scheduled_at);
        let grace = chrono::Duration::from_std(self.options.misfire_grace)
            .unwrap_or(chrono::Duration::MAX);
        if late_by > grace {
            return Decision::Misfired { late_by };
        }

        let mut state = self.lock();

        if let Some(latest) = state.latest_seen {
            if self.options.coalesce && scheduled_at < latest {
                return Decision::Coalesced;
            }
        }
        state.see(scheduled_at);

        if state.running >= self.options.max_instances {
            return Decision::AtCapacity {
                running: state.running,
            };
        }

        state.running += 1;
        Decision::Run(RunPermit {
            guard: Arc::clone(self),
        })
    }
}

/// Held for the duration of one run; releases the slot on drop.
#[derive(Debug)]
pub struct RunPermit {
    guard: Arc<FireGuard>,
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        let mut state = self.guard.lock();
        state.running = state.running.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn options(coalesce: bool, max_instances: usize, grace_secs: u64) -> JobOptions {
        JobOptions {
            coalesce,
            max_instances,
            misfire_grace: Duration::from_secs(grace_secs),
        }
    }

    fn at(minute: u32, second: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 1, 12, minute, second)
            .unwrap()
    }

    // =========================================================================
    // Misfire
    // =========================================================================

    #[test]
    fn test_on_time_tick_runs() {
        let guard = FireGuard::new(options(true, 1, 30));
        assert!(guard.decide(at(0, 0), at(0, 1)).is_run());
    }

    #[test]
    fn test_late_tick_is_misfired() {
        let guard = FireGuard::new(options(true, 1, 30));

        match guard.decide(at(0, 0), at(0, 31)) {
            Decision::Misfired { late_by } => assert_eq!(late_by.num_seconds(), 31),
            other => panic!("expected misfire, got {:?}", other),
        }
        assert_eq!(guard.running(), 0);
    }

    #[test]
    fn test_tick_exactly_at_grace_still_runs() {
        let guard = FireGuard::new(options(true, 1, 30));
        assert!(guard.decide(at(0, 0), at(0, 30)).is_run());
    }

    // =========================================================================
    // Coalesce
    // =========================================================================

    #[test]
    fn test_older_tick_is_coalesced() {
        let guard = FireGuard::new(options(true, 5, 600));

        let newer = guard.decide(at(2, 0), at(2, 0));
        assert!(newer.is_run());

        let older = guard.decide(at(1, 0), at(2, 0));
        assert!(matches!(older, Decision::Coalesced));
    }

    #[test]
    fn test_observed_slot_coalesces_older_ticks() {
        let guard = FireGuard::new(options(true, 5, 600));
        guard.observe(at(3, 0));

        assert!(matches!(guard.decide(at(1, 0), at(3, 0)), Decision::Coalesced));
        assert!(matches!(guard.decide(at(2, 0), at(3, 0)), Decision::Coalesced));
        assert!(guard.decide(at(3, 0), at(3, 0)).is_run());
    }

    #[test]
    fn test_without_coalesce_backlog_runs() {
        let guard = FireGuard::new(options(false, 5, 600));

        let _newer = guard.decide(at(2, 0), at(2, 0));
        assert!(guard.decide(at(1, 0), at(2, 0)).is_run());
    }

    // =========================================================================
    // Max instances
    // =========================================================================

    #[test]
    fn test_max_instances_blocks_until_permit_dropped() {
        let guard = FireGuard::new(options(true, 1, 30));

        let first = guard.decide(at(0, 0), at(0, 0));
        assert!(first.is_run());
        assert_eq!(guard.running(), 1);

        match guard.decide(at(1, 0), at(1, 0)) {
            Decision::AtCapacity { running } => assert_eq!(running, 1),
            other => panic!("expected capacity skip, got {:?}", other),
        }

        drop(first);
        assert_eq!(guard.running(), 0);
        assert!(guard.decide(at(2, 0), at(2, 0)).is_run());
    }

    #[test]
    fn test_two_instances_allowed() {
        let guard = FireGuard::new(options(true, 2, 30));

        let a = guard.decide(at(0, 0), at(0, 0));
        let b = guard.decide(at(1, 0), at(1, 0));
        let c = guard.decide(at(2, 0), at(2, 0));

        assert!(a.is_run());
        assert!(b.is_run());
        assert!(matches!(c, Decision::AtCapacity { running: 2 }));
    }

    #[test]
    fn test_options_from_config_clamps_instances() {
        let config = SchedulerConfig {
            timezone: FixedOffset::east_opt(0).unwrap(),
            coalesce: false,
            max_instances: 0,
            misfire_grace: Duration::from_secs(5),
        };
        let options = JobOptions::from(&config);
        assert_eq!(options.max_instances, 1);
        assert!(!options.coalesce);
    }
}
