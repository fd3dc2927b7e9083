//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Axum API skeleton with a SeaORM data layer and a cron scheduler
#[derive(Parser, Debug)]
#[command(name = "api-skeleton")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file in dotenv format
    #[arg(short, long, global = true, env = "CONFIG_PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Run or inspect the cron scheduler
    Schedule(ScheduleArgs),

    /// Run or inspect the background task worker
    Worker(WorkerArgs),
}

/// Arguments for the serve command
///
/// Both flags fall back to `SERVER_HOST` / `SERVER_PORT` from the settings.
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
    /// Create the default admin account if it does not exist
    Seed,
}

/// Arguments for the schedule command
#[derive(Parser, Debug)]
pub struct ScheduleArgs {
    #[command(subcommand)]
    pub action: ScheduleAction,
}

/// Scheduler actions
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleAction {
    /// Start the scheduler and block until shutdown
    Run,
    /// Show registered jobs and their next fire times
    List {
        /// Number of upcoming fire times per job
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
    },
}

/// Arguments for the worker command
#[derive(Parser, Debug)]
pub struct WorkerArgs {
    #[command(subcommand)]
    pub action: WorkerAction,
}

/// Worker actions
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerAction {
    /// Consume queued tasks until shutdown
    Run,
    /// Show registered tasks and the queue backend
    List,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from(["api-skeleton", "serve", "-H", "127.0.0.1", "-p", "9000"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.host.as_deref(), Some("127.0.0.1"));
                assert_eq!(args.port, Some(9000));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["api-skeleton", "migrate", "seed", "--verbose", "--config", "prod.env"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("prod.env")));
        match cli.command {
            Commands::Migrate(args) => assert_eq!(args.action, MigrateAction::Seed),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_schedule_list_default_count() {
        let cli = Cli::try_parse_from(["api-skeleton", "schedule", "list"]).unwrap();
        match cli.command {
            Commands::Schedule(args) => assert_eq!(args.action, ScheduleAction::List { count: 3 }),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_worker_run() {
        let cli = Cli::try_parse_from(["api-skeleton", "worker", "run"]).unwrap();
        match cli.command {
            Commands::Worker(args) => assert_eq!(args.action, WorkerAction::Run),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_migrate_action_rejected() {
        assert!(Cli::try_parse_from(["api-skeleton", "migrate", "sideways"]).is_err());
    }
}
