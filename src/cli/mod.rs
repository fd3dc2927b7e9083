//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations and seeding
//! - `schedule` - Cron scheduler

pub mod args;

pub use args::{Cli, Commands};
