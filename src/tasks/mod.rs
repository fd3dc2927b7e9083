//! Background tasks consumed by the queue worker.
//!
//! Each task is a serde payload plus an async handler. Add new ones to
//! [`registered`] so the worker announces them on startup.

mod welcome_email;

pub use welcome_email::{welcome_email, WelcomeEmail};

/// Names shown in the startup summary
const SUMMARY_LIMIT: usize = 5;

pub fn registered() -> Vec<&'static str> {
    vec![WelcomeEmail::NAME]
}

/// Startup lines: the count, up to five names and how many were left out.
/// `None` means nothing is registered.
pub fn summary(names: &[&str]) -> Option<Vec<String>> {
    if names.is_empty() {
        return None;
    }

    let mut lines = vec![format!("Loaded {} task(s):", names.len())];
    lines.extend(names.iter().take(SUMMARY_LIMIT).map(|name| format!("  - {}", name)));
    if names.len() > SUMMARY_LIMIT {
        lines.push(format!("  - and {} more...", names.len() - SUMMARY_LIMIT));
    }
    Some(lines)
}

pub fn log_summary(names: &[&str]) {
    match summary(names) {
        Some(lines) => {
            for line in lines {
                tracing::info!("{}", line);
            }
        }
        None => tracing::warn!("No background tasks registered"),
    }
}
