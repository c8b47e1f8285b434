//! Process configuration.
//!
//! Built once at startup from the environment and handed to every component
//! by reference. Nothing below the binaries reads the environment directly.
//!
//! | Variable               | Default      | Used by      |
//! |------------------------|--------------|--------------|
//! | `DATABASE_URL`         | (required)   | both         |
//! | `MIGRATIONS_DIR`       | `migrations` | migrate      |
//! | `MIGRATE_TIMEOUT_SECS` | `30`         | migrate      |
//! | `ADMIN_TIMEOUT_SECS`   | `5`          | create-admin |
//! | `DB_MAX_CONNECTIONS`   | `2`          | both         |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};
use crate::logging;

/// Default directory scanned for `*.sql` migration files.
pub const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

/// Default overall deadline for a migration run.
pub const DEFAULT_MIGRATE_TIMEOUT_SECS: u64 = 30;

/// Default overall deadline for admin creation.
pub const DEFAULT_ADMIN_TIMEOUT_SECS: u64 = 5;

/// Default pool size. Both tools run strictly sequentially.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 2;

/// Environment-derived settings shared by the `migrate` and `create-admin` tools.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Directory holding the `*.sql` migration files.
    pub migrations_dir: PathBuf,
    /// Overall deadline for `migrate`.
    pub migrate_timeout: Duration,
    /// Overall deadline for `create-admin`.
    pub admin_timeout: Duration,
    /// Maximum pool connections.
    pub max_connections: u32,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::Config("DATABASE_URL not set".to_string()))?;

        let migrations_dir = lookup("MIGRATIONS_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MIGRATIONS_DIR));

        let migrate_timeout = Duration::from_secs(parse_or(
            &lookup,
            "MIGRATE_TIMEOUT_SECS",
            DEFAULT_MIGRATE_TIMEOUT_SECS,
        )?);
        let admin_timeout = Duration::from_secs(parse_or(
            &lookup,
            "ADMIN_TIMEOUT_SECS",
            DEFAULT_ADMIN_TIMEOUT_SECS,
        )?);
        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;

        if max_connections == 0 {
            return Err(Error::Config(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        let config = Self {
            database_url,
            migrations_dir,
            migrate_timeout,
            admin_timeout,
            max_connections,
        };
        debug!({ logging::CONFIG } = ?config, "Configuration loaded");
        Ok(config)
    }

    /// Override the migrations directory.
    pub fn with_migrations_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.migrations_dir = dir.into();
        self
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{key}={raw:?} is invalid: {e}"))),
    }
}

// Connection strings carry credentials.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("migrations_dir", &self.migrations_dir)
            .field("migrate_timeout", &self.migrate_timeout)
            .field("admin_timeout", &self.admin_timeout)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/app")]))
                .unwrap();

        assert_eq!(config.database_url, "postgres://localhost/app");
        assert_eq!(config.migrations_dir, PathBuf::from("migrations"));
        assert_eq!(config.migrate_timeout, Duration::from_secs(30));
        assert_eq!(config.admin_timeout, Duration::from_secs(5));
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn test_missing_database_url() {
        let result = Config::from_lookup(lookup_from(&[]));
        match result {
            Err(Error::Config(msg)) => assert_eq!(msg, "DATABASE_URL not set"),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_database_url_is_missing() {
        let result = Config::from_lookup(lookup_from(&[("DATABASE_URL", "   ")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/app"),
            ("MIGRATIONS_DIR", "db/migrations"),
            ("MIGRATE_TIMEOUT_SECS", "120"),
            ("ADMIN_TIMEOUT_SECS", "10"),
            ("DB_MAX_CONNECTIONS", "4"),
        ]))
        .unwrap();

        assert_eq!(config.migrations_dir, PathBuf::from("db/migrations"));
        assert_eq!(config.migrate_timeout, Duration::from_secs(120));
        assert_eq!(config.admin_timeout, Duration::from_secs(10));
        assert_eq!(config.max_connections, 4);
    }

    #[test]
    fn test_malformed_timeout() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/app"),
            ("MIGRATE_TIMEOUT_SECS", "soon"),
        ]));
        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("MIGRATE_TIMEOUT_SECS")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_connections_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/app"),
            ("DB_MAX_CONNECTIONS", "0"),
        ]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = Config::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://admin:hunter2@db/app",
        )]))
        .unwrap();
        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("hunter2"));
    }

    #[test]
    fn test_with_migrations_dir() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://db/app")]))
            .unwrap()
            .with_migrations_dir("/srv/app/migrations");
        assert_eq!(
            config.migrations_dir,
            PathBuf::from("/srv/app/migrations")
        );
    }
}
