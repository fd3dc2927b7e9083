//! Tracing subscriber setup.
//!
//! Logs go to stdout and to a daily-rotated file under `LOG_DIR`.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Pick the filter directive: `RUST_LOG`, then `--verbose`, then `LOG_LEVEL`.
fn filter_directive(rust_log: Option<String>, verbose: bool, log_level: &str) -> String {
    match rust_log {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ if verbose => "debug".to_string(),
        _ => log_level.to_string(),
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held
/// until the process exits.
pub fn init_tracing(config: &Config, verbose: bool) -> AppResult<WorkerGuard> {
    std::fs::create_dir_all(&config.log_dir).map_err(|e| {
        AppError::internal(format!(
            "Failed to create log directory {}: {}",
            config.log_dir.display(),
            e
        ))
    })?;

    let appender = Builder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(&config.log_file_prefix)
        .filename_suffix("log")
        .max_log_files(config.log_retention_days.max(1))
        .build(&config.log_dir)
        .map_err(|e| AppError::internal(format!("Failed to open log file: {}", e)))?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let directive = filter_directive(std::env::var("RUST_LOG").ok(), verbose, &config.log_level);
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| AppError::internal(format!("Invalid log filter {:?}: {}", directive, e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init()
        .map_err(|e| AppError::internal(format!("Failed to install subscriber: {}", e)))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_wins() {
        let directive = filter_directive(Some("warn,sqlx=off".to_string()), true, "info");
        assert_eq!(directive, "warn,sqlx=off");
    }

    #[test]
    fn test_verbose_over_log_level() {
        assert_eq!(filter_directive(None, true, "info"), "debug");
        assert_eq!(filter_directive(Some("  ".to_string()), true, "info"), "debug");
    }

    #[test]
    fn test_log_level_fallback() {
        assert_eq!(filter_directive(None, false, "warn"), "warn");
    }
}
