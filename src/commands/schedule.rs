//! Schedule command - Runs or lists the cron jobs.

use std::sync::Arc;

use crate::cli::args::{ScheduleAction, ScheduleArgs};
use crate::config::Config;
use crate::crontab;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::scheduler::{JobContext, Scheduler};
use crate::shutdown;

/// Execute the schedule command
pub async fn execute(args: ScheduleArgs, config: Config) -> AppResult<()> {
    let database = Database::connect(&config).await?;
    let ctx = JobContext {
        database: Arc::new(database),
        config: Arc::new(config),
    };

    let scheduler = Scheduler::from_registry(crontab::registry(), ctx);
    scheduler.registration().log_summary();

    match args.action {
        ScheduleAction::Run => scheduler.run(shutdown::signal()).await,
        ScheduleAction::List { count } => {
            println!("timezone: {}", scheduler.timezone());
            for job in scheduler.jobs() {
                println!("{} [{}]", job.name(), job.expression());
                for time in job.upcoming(count) {
                    println!("  {}", time.format("%Y-%m-%d %H:%M:%S %:z"));
                }
            }
            Ok(())
        }
    }
}
