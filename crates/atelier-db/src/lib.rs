//! # atelier-db
//!
//! PostgreSQL database layer for atelier.
//!
//! This crate provides:
//! - Connection pool management
//! - The `schema_migrations` bookkeeping store and batch executor
//! - Administrator provisioning in `users`
//!
//! ## Example
//!
//! ```rust,ignore
//! use atelier_db::{Database, PoolConfig};
//! use atelier_core::{MigrationLoader, MigrationRunner};
//!
//! let db = Database::connect_with_config("postgres://localhost/app", PoolConfig::new()).await?;
//! let runner = MigrationRunner::new(
//!     MigrationLoader::new("migrations"),
//!     db.migrations.clone(),
//!     db.executor(),
//! );
//! let report = runner.run().await?;
//! println!("applied {}", report.applied_count());
//! ```

pub mod identifier;
pub mod migrations;
pub mod pool;
pub mod users;

// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

pub use atelier_core::*;

pub use identifier::validate_identifier;
pub use migrations::{PgMigrationStore, PgSqlExecutor, DEFAULT_MIGRATIONS_TABLE};
pub use pool::{
    create_pool_with_config, create_pool_with_options, parse_database_url, ping,
    PoolConfig,
};
pub use users::PgUserRepository;

/// Combined database context with all repositories.
#[derive(Debug, Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Migration bookkeeping table.
    pub migrations: PgMigrationStore,
    /// User provisioning.
    pub users: PgUserRepository,
}

impl Database {
    /// Create a new Database instance from an existing pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            migrations: PgMigrationStore::new(pool.clone()),
            users: PgUserRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Verify the server answers.
    pub async fn ping(&self) -> Result<()> {
        ping(&self.pool).await
    }

    /// Executor for migration bodies.
    pub fn executor(&self) -> PgSqlExecutor {
        PgSqlExecutor::new(self.pool.clone())
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
