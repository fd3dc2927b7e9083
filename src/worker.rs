//! Task queue worker.
//!
//! Tasks are persisted by apalis-sql in the application database, so only
//! sqlite and postgres URLs can host the queue.

use std::future::Future;

use apalis::prelude::*;
use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlite::SqliteStorage;
use apalis_sql::sqlx::postgres::PgPoolOptions;
use apalis_sql::sqlx::sqlite::SqlitePoolOptions;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::tasks::{self, welcome_email, WelcomeEmail};

/// Upper bound on consumers per task
pub const MAX_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueBackend {
    Sqlite,
    Postgres,
}

impl QueueBackend {
    pub fn from_url(url: &str) -> AppResult<Self> {
        if url.starts_with("sqlite:") {
            Ok(Self::Sqlite)
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Self::Postgres)
        } else {
            Err(AppError::internal(
                "The task queue needs a sqlite or postgres DATABASE_URL",
            ))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
        }
    }
}

/// CPU count capped at [`MAX_CONCURRENCY`].
pub fn concurrency() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    cpus.clamp(1, MAX_CONCURRENCY)
}

/// Consumer names for one task, `<task>-<n>`.
pub fn consumer_names(task: &str, count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("{}-{}", task, n)).collect()
}

fn setup_error(e: apalis_sql::sqlx::Error) -> AppError {
    AppError::internal(format!("Failed to set up task storage: {}", e))
}

/// Create the queue tables if they are missing.
pub async fn prepare_sqlite(url: &str) -> AppResult<SqliteStorage<WelcomeEmail>> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to database: {}", e)))?;
    SqliteStorage::setup(&pool).await.map_err(setup_error)?;
    Ok(SqliteStorage::new(pool))
}

pub async fn prepare_postgres(url: &str) -> AppResult<PostgresStorage<WelcomeEmail>> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to database: {}", e)))?;
    PostgresStorage::setup(&pool).await.map_err(setup_error)?;
    Ok(PostgresStorage::new(pool))
}

/// Consume queued tasks until `shutdown` resolves.
pub async fn run<F>(config: &Config, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let backend = QueueBackend::from_url(&config.database_url)?;
    let names = tasks::registered();
    tasks::log_summary(&names);

    let count = concurrency();
    let mut monitor = Monitor::new();

    match backend {
        QueueBackend::Sqlite => {
            let storage = prepare_sqlite(&config.database_url).await?;
            for name in consumer_names(WelcomeEmail::NAME, count) {
                let worker = WorkerBuilder::new(name.as_str())
                    .backend(storage.clone())
                    .build_fn(welcome_email);
                monitor = monitor.register(worker);
            }
        }
        QueueBackend::Postgres => {
            let storage = prepare_postgres(&config.database_url).await?;
            for name in consumer_names(WelcomeEmail::NAME, count) {
                let worker = WorkerBuilder::new(name.as_str())
                    .backend(storage.clone())
                    .build_fn(welcome_email);
                monitor = monitor.register(worker);
            }
        }
    }

    tracing::info!(
        "Task worker started on {} with concurrency {}",
        backend.as_str(),
        count
    );

    monitor
        .run_with_signal(async move {
            shutdown.await;
            Ok(())
        })
        .await
        .map_err(|e| AppError::internal(format!("Task worker error: {}", e)))?;

    tracing::info!("Task worker stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_url() {
        assert_eq!(QueueBackend::from_url("sqlite::memory:").unwrap(), QueueBackend::Sqlite);
        assert_eq!(
            QueueBackend::from_url("sqlite://data/app.db?mode=rwc").unwrap(),
            QueueBackend::Sqlite
        );
        assert_eq!(
            QueueBackend::from_url("postgres://app:pw@localhost/app").unwrap(),
            QueueBackend::Postgres
        );
        assert_eq!(
            QueueBackend::from_url("postgresql://localhost/app").unwrap(),
            QueueBackend::Postgres
        );
    }

    #[test]
    fn test_mysql_cannot_host_queue() {
        let err = QueueBackend::from_url("mysql://root@localhost/app").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_concurrency_is_capped() {
        let count = concurrency();
        assert!((1..=MAX_CONCURRENCY).contains(&count));
    }

    #[test]
    fn test_consumer_names() {
        assert_eq!(
            consumer_names("welcome_email", 2),
            vec!["welcome_email-1".to_string(), "welcome_email-2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_sqlite_queue_accepts_tasks() {
        let mut storage = prepare_sqlite("sqlite::memory:").await.unwrap();
        let pushed = storage
            .push(WelcomeEmail::new("carol@example.com", "carol"))
            .await;
        assert!(pushed.is_ok());
    }
}
