//! Migrate command - Database migration management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::seed::{ensure_default_admin, SeedOutcome};
use crate::infra::{Database, Persistence};

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    tracing::info!("Running migration command...");

    // Connect without auto-running migrations for manual control
    let db = Database::connect_without_migrations(&config).await?;

    match args.action {
        MigrateAction::Up => {
            tracing::info!("Running pending migrations...");
            db.run_migrations().await?;
            tracing::info!("Migrations completed successfully");
        }
        MigrateAction::Down => {
            tracing::info!("Rolling back last migration...");
            db.rollback_migration().await?;
            tracing::info!("Rollback completed successfully");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await? {
                let status = if applied { "applied" } else { "pending" };
                println!("{}: {}", name, status);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Resetting database and running all migrations...");
            db.fresh_migrations().await?;
            tracing::info!("Fresh migrations completed successfully");
        }
        MigrateAction::Seed => {
            db.run_migrations().await?;
            let uow = Persistence::new(db.get_connection());
            match ensure_default_admin(&uow, &config).await? {
                SeedOutcome::Created => {
                    tracing::info!("Default admin '{}' created", config.admin_username)
                }
                SeedOutcome::AlreadyPresent => {
                    tracing::info!("Default admin '{}' already present", config.admin_username)
                }
            }
        }
    }

    Ok(())
}
