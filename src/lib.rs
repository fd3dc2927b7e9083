//! API Skeleton - A starter layout for HTTP APIs
//!
//! This crate wires axum, SeaORM, a JWT auth stub, tracing and a cron
//! scheduler into a conventional project layout.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **logging**: Tracing subscriber setup (stdout + rotated files)
//! - **domain**: Core entities (users, products)
//! - **services**: Application use cases
//! - **infra**: Database, migrations, repositories
//! - **api**: Application factory, providers, handlers, middleware
//! - **scheduler**: Cron scheduler bootstrap and job guards
//! - **crontab**: Registered cron jobs
//! - **tasks** / **worker**: Queued background tasks and their consumer
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations and create the default admin
//! cargo run -- migrate up
//! cargo run -- migrate seed
//!
//! # Start the cron scheduler
//! cargo run -- schedule run
//!
//! # Consume background tasks
//! cargo run -- worker run
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod crontab;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod logging;
pub mod scheduler;
pub mod services;
pub mod shutdown;
pub mod tasks;
pub mod types;
pub mod worker;

// Re-export commonly used types at crate root
pub use api::{create_app, AppState};
pub use config::Config;
pub use domain::{Password, Product, User, UserState};
pub use errors::{AppError, AppResult};
pub use infra::Database;
