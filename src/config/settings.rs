//! Application settings loaded from environment variables or a settings file.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono::FixedOffset;
use thiserror::Error;

use super::constants::{
    DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME, DEFAULT_APP_NAME,
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_LOG_DIR, DEFAULT_LOG_FILE_PREFIX, DEFAULT_LOG_LEVEL, DEFAULT_LOG_RETENTION_DAYS,
    DEFAULT_SCHEDULER_COALESCE, DEFAULT_SCHEDULER_MAX_INSTANCES,
    DEFAULT_SCHEDULER_MISFIRE_GRACE_SECONDS, DEFAULT_SCHEDULER_TIMEZONE, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, DEV_JWT_SECRET, MAX_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH,
};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings file {path}: {source}")]
    SettingsFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },

    #[error("JWT_SECRET environment variable must be set in production")]
    MissingSecret,

    #[error("JWT_SECRET must be at least {MIN_JWT_SECRET_LENGTH} characters long")]
    SecretTooShort,
}

/// Default options applied to every scheduled job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Timezone cron expressions are evaluated in
    pub timezone: FixedOffset,
    /// Collapse a backlog of missed runs into a single run
    pub coalesce: bool,
    /// Maximum concurrently running instances of one job
    pub max_instances: usize,
    /// How late a run may start before it is dropped
    pub misfire_grace: Duration,
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub app_name: String,
    pub debug: bool,
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_echo: bool,
    jwt_secret: String,
    insecure_secret: bool,
    pub jwt_expiration_hours: i64,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub log_file_prefix: String,
    pub log_retention_days: usize,
    pub scheduler: SchedulerConfig,
    pub admin_username: String,
    pub admin_email: String,
    admin_password: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("app_name", &self.app_name)
            .field("debug", &self.debug)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("database_url", &"[REDACTED]")
            .field("database_max_connections", &self.database_max_connections)
            .field("database_echo", &self.database_echo)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .field("log_file_prefix", &self.log_file_prefix)
            .field("log_retention_days", &self.log_retention_days)
            .field("scheduler", &self.scheduler)
            .field("admin_username", &self.admin_username)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    /// Load configuration from `.env` (if present) and environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load a dotenv-style settings file, then read environment variables.
    ///
    /// Variables already present in the process environment take precedence
    /// over the file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        dotenvy::from_path(path).map_err(|source| ConfigError::SettingsFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (jwt_secret, insecure_secret) = match lookup("JWT_SECRET") {
            Some(secret) => (secret, false),
            None if cfg!(debug_assertions) => (DEV_JWT_SECRET.to_string(), true),
            None => return Err(ConfigError::MissingSecret),
        };

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::SecretTooShort);
        }

        let timezone = lookup("SCHEDULER_TIMEZONE")
            .unwrap_or_else(|| DEFAULT_SCHEDULER_TIMEZONE.to_string());
        let timezone = parse_utc_offset(&timezone).ok_or(ConfigError::Invalid {
            key: "SCHEDULER_TIMEZONE",
            value: timezone,
        })?;

        let max_instances: usize = parse_or(
            &lookup,
            "SCHEDULER_MAX_INSTANCES",
            DEFAULT_SCHEDULER_MAX_INSTANCES,
        )?;
        if max_instances == 0 {
            return Err(ConfigError::Invalid {
                key: "SCHEDULER_MAX_INSTANCES",
                value: "0".to_string(),
            });
        }

        let jwt_expiration_hours: i64 = parse_or(
            &lookup,
            "JWT_EXPIRATION_HOURS",
            DEFAULT_JWT_EXPIRATION_HOURS,
        )?;
        if !(1..=MAX_JWT_EXPIRATION_HOURS).contains(&jwt_expiration_hours) {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRATION_HOURS",
                value: jwt_expiration_hours.to_string(),
            });
        }

        let scheduler = SchedulerConfig {
            timezone,
            coalesce: bool_or(&lookup, "SCHEDULER_COALESCE", DEFAULT_SCHEDULER_COALESCE)?,
            max_instances,
            misfire_grace: Duration::from_secs(parse_or(
                &lookup,
                "SCHEDULER_MISFIRE_GRACE_SECONDS",
                DEFAULT_SCHEDULER_MISFIRE_GRACE_SECONDS,
            )?),
        };

        Ok(Self {
            app_name: lookup("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            debug: bool_or(&lookup, "APP_DEBUG", false)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", DEFAULT_SERVER_PORT)?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            )?,
            database_echo: bool_or(&lookup, "DATABASE_ECHO", false)?,
            jwt_secret,
            insecure_secret,
            jwt_expiration_hours,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_dir: lookup("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
            log_file_prefix: lookup("LOG_FILE_PREFIX")
                .unwrap_or_else(|| DEFAULT_LOG_FILE_PREFIX.to_string()),
            log_retention_days: parse_or(
                &lookup,
                "LOG_RETENTION_DAYS",
                DEFAULT_LOG_RETENTION_DAYS,
            )?,
            scheduler,
            admin_username: lookup("ADMIN_USERNAME")
                .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string()),
            admin_email: lookup("ADMIN_EMAIL").unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string()),
            admin_password: lookup("ADMIN_PASSWORD")
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// True when the built-in development secret is in use.
    pub fn uses_insecure_secret(&self) -> bool {
        self.insecure_secret
    }

    /// Password given to the seeded admin account.
    pub fn admin_password(&self) -> &str {
        &self.admin_password
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn bool_or<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
        None => Ok(default),
    }
}

/// Parse `Z`, `UTC` or a `+HH:MM` / `-HH:MM` offset.
fn parse_utc_offset(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("JWT_SECRET", SECRET)]).unwrap();

        assert_eq!(config.server_port, DEFAULT_SERVER_PORT);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.jwt_expiration_hours, 3);
        assert_eq!(config.log_retention_days, 14);
        assert!(!config.debug);
        assert!(!config.uses_insecure_secret());
        assert!(config.scheduler.coalesce);
        assert_eq!(config.scheduler.max_instances, 1);
        assert_eq!(config.scheduler.misfire_grace, Duration::from_secs(30));
        assert_eq!(config.scheduler.timezone.local_minus_utc(), 0);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("JWT_SECRET", SECRET),
            ("SERVER_PORT", "9000"),
            ("APP_DEBUG", "true"),
            ("SCHEDULER_TIMEZONE", "+08:00"),
            ("SCHEDULER_COALESCE", "no"),
            ("SCHEDULER_MAX_INSTANCES", "3"),
            ("SCHEDULER_MISFIRE_GRACE_SECONDS", "5"),
            ("LOG_DIR", "/tmp/logs"),
        ])
        .unwrap();

        assert_eq!(config.server_addr(), "0.0.0.0:9000");
        assert!(config.debug);
        assert_eq!(config.scheduler.timezone.local_minus_utc(), 8 * 3600);
        assert!(!config.scheduler.coalesce);
        assert_eq!(config.scheduler.max_instances, 3);
        assert_eq!(config.scheduler.misfire_grace, Duration::from_secs(5));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/logs"));
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = load(&[("JWT_SECRET", "short")]);
        assert!(matches!(result, Err(ConfigError::SecretTooShort)));
    }

    #[test]
    fn test_invalid_number_rejected() {
        let result = load(&[("JWT_SECRET", SECRET), ("SERVER_PORT", "eighty")]);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "SERVER_PORT", .. })
        ));
    }

    #[test]
    fn test_zero_max_instances_rejected() {
        let result = load(&[("JWT_SECRET", SECRET), ("SCHEDULER_MAX_INSTANCES", "0")]);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "SCHEDULER_MAX_INSTANCES", .. })
        ));
    }

    #[test]
    fn test_out_of_range_jwt_expiration_rejected() {
        for hours in ["0", "-3", "8761", "9223372036854775807"] {
            let result = load(&[("JWT_SECRET", SECRET), ("JWT_EXPIRATION_HOURS", hours)]);
            assert!(
                matches!(
                    result,
                    Err(ConfigError::Invalid { key: "JWT_EXPIRATION_HOURS", .. })
                ),
                "{} should be rejected",
                hours
            );
        }
    }

    #[test]
    fn test_jwt_expiration_bounds_accepted() {
        for hours in ["1", "8760"] {
            let config = load(&[("JWT_SECRET", SECRET), ("JWT_EXPIRATION_HOURS", hours)]).unwrap();
            assert_eq!(config.jwt_expiration_hours.to_string(), hours);
        }
    }

    #[test]
    fn test_invalid_timezone_rejected() {
        let result = load(&[("JWT_SECRET", SECRET), ("SCHEDULER_TIMEZONE", "Mars/Olympus")]);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "SCHEDULER_TIMEZONE", .. })
        ));
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("UTC").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("-05:30").unwrap().local_minus_utc(), -(5 * 3600 + 1800));
        assert!(parse_utc_offset("08:00").is_none());
        assert!(parse_utc_offset("+24:00").is_none());
        assert!(parse_utc_offset("+8").is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = load(&[("JWT_SECRET", SECRET)]).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains(SECRET));
        assert!(!debug.contains(DEFAULT_ADMIN_PASSWORD));
    }
}
