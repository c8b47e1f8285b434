//! Connection pool for the operator tools.
//!
//! Both tools hold the pool for one short, sequential job, so the defaults
//! are small and the acquire timeout doubles as the connect deadline.

use std::str::FromStr;
use std::time::{Duration, Instant};

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Connection;
use tracing::{debug, info};

use atelier_core::{logging, Error, Result};

/// Default pool ceiling.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 2;

/// Seconds to wait for a connection before giving up.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Seconds an idle connection is kept before it is closed.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 60;

/// Sizing and timeouts handed to `PgPoolOptions`.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Connections kept open while idle.
    pub min_connections: u32,
    /// Upper bound on acquiring a connection, including the first connect.
    pub connect_timeout: Duration,
    /// Idle connections older than this are closed.
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: 1,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
        }
    }
}

impl PoolConfig {
    /// Pool configuration with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of connections.
    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    /// Set the minimum number of connections.
    pub fn min_connections(mut self, n: u32) -> Self {
        self.min_connections = n;
        self
    }

    /// Set the connect and acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the idle connection timeout.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }
}

/// Parse a PostgreSQL connection string.
pub fn parse_database_url(database_url: &str) -> Result<PgConnectOptions> {
    PgConnectOptions::from_str(database_url)
        .map_err(|e| Error::Config(format!("invalid DATABASE_URL: {}", e)))
}

/// Parse `database_url` and connect.
pub async fn create_pool_with_config(database_url: &str, config: PoolConfig) -> Result<PgPool> {
    let options = parse_database_url(database_url)?;
    create_pool_with_options(options, config).await
}

/// Connect from prepared options (used by the test fixtures to pin a schema).
pub async fn create_pool_with_options(
    options: PgConnectOptions,
    config: PoolConfig,
) -> Result<PgPool> {
    let start = Instant::now();

    info!(
        { logging::SUBSYSTEM } = "database",
        { logging::COMPONENT } = "pool",
        { logging::OPERATION } = "create",
        { logging::DB_HOST } = options.get_host(),
        { logging::DB_NAME } = options.get_database().unwrap_or("(default)"),
        { logging::MAX_CONNECTIONS } = config.max_connections,
        { logging::CONNECT_TIMEOUT_SECS } = config.connect_timeout.as_secs(),
        "Creating database connection pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .connect_with(options)
        .await
        .map_err(|e| Error::Connectivity(format!("db connect: {}", e)))?;

    info!(
        { logging::SUBSYSTEM } = "database",
        { logging::COMPONENT } = "pool",
        { logging::OPERATION } = "established",
        { logging::POOL_SIZE } = pool.size(),
        { logging::DURATION_MS } = start.elapsed().as_millis() as u64,
        "Database connection pool established"
    );
    Ok(pool)
}

/// Round-trip to the server on one pooled connection.
pub async fn ping(pool: &PgPool) -> Result<()> {
    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| Error::Connectivity(format!("unable to connect to database: {}", e)))?;
    conn.ping()
        .await
        .map_err(|e| Error::Connectivity(format!("unable to connect to database: {}", e)))?;
    debug!(
        { logging::SUBSYSTEM } = "database",
        { logging::COMPONENT } = "pool",
        { logging::OPERATION } = "ping",
        "Database reachable"
    );
    Ok(())
}
