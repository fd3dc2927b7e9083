//! Worker command - Consumes or lists background tasks.

use crate::cli::args::{WorkerAction, WorkerArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::shutdown;
use crate::tasks;
use crate::worker::{self, QueueBackend};

/// Execute the worker command
pub async fn execute(args: WorkerArgs, config: Config) -> AppResult<()> {
    match args.action {
        WorkerAction::Run => worker::run(&config, shutdown::signal()).await,
        WorkerAction::List => {
            let backend = QueueBackend::from_url(&config.database_url)?;
            println!("backend: {}", backend.as_str());
            println!("concurrency: {}", worker::concurrency());
            for name in tasks::registered() {
                println!("{}", name);
            }
            Ok(())
        }
    }
}
