//! Application configuration module
//!
//! Handles environment variables, settings files and application-wide constants.

mod constants;
mod settings;

pub use constants::*;
pub use settings::{Config, ConfigError, SchedulerConfig};
