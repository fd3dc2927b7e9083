//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Application
// =============================================================================

/// Default application name (used in logs and the OpenAPI document)
pub const DEFAULT_APP_NAME: &str = "API Skeleton";

/// Message returned by the index route
pub const WELCOME_MESSAGE: &str = "welcome to api skeleton";

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

// =============================================================================
// Authentication & Security
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 3;

/// Longest accepted token lifetime (one year)
pub const MAX_JWT_EXPIRATION_HOURS: i64 = 8760;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Secret used by debug builds when JWT_SECRET is missing
pub const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// Token type reported by the login endpoint
pub const TOKEN_TYPE_BEARER: &str = "bearer";

// =============================================================================
// User States
// =============================================================================

/// Account may log in
pub const STATE_ENABLED: &str = "enabled";

/// Account is locked out
pub const STATE_DISABLED: &str = "disabled";

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8000;

// =============================================================================
// Database
// =============================================================================

/// Default database connection URL (SQLite file under storage/)
pub const DEFAULT_DATABASE_URL: &str = "sqlite://storage/db.sqlite3?mode=rwc";

/// Default connection pool size
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

// =============================================================================
// Logging
// =============================================================================

/// Default log level filter
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default directory for rotated log files
pub const DEFAULT_LOG_DIR: &str = "storage/logs";

/// Default log file name prefix (`<prefix>.<date>.log`)
pub const DEFAULT_LOG_FILE_PREFIX: &str = "app";

/// Default number of daily log files kept on disk
pub const DEFAULT_LOG_RETENTION_DAYS: usize = 14;

// =============================================================================
// Scheduler
// =============================================================================

/// Default scheduler timezone as a fixed UTC offset
pub const DEFAULT_SCHEDULER_TIMEZONE: &str = "+00:00";

/// Collapse a backlog of missed runs into one by default
pub const DEFAULT_SCHEDULER_COALESCE: bool = true;

/// Default maximum concurrently running instances of one job
pub const DEFAULT_SCHEDULER_MAX_INSTANCES: usize = 1;

/// Default seconds a tick may start late before it is dropped
pub const DEFAULT_SCHEDULER_MISFIRE_GRACE_SECONDS: u64 = 30;

// =============================================================================
// Default Admin (seed)
// =============================================================================

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

pub const DEFAULT_ADMIN_PASSWORD: &str = "123456";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 6;

