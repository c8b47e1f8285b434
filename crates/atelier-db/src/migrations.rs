//! PostgreSQL migration bookkeeping and batch execution.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::debug;

use atelier_core::{
    logging, Error, MigrationRecord, MigrationStore, MigrationVersion, Result, SqlExecutor,
};

use crate::identifier::validate_identifier;

/// Default bookkeeping table name.
pub const DEFAULT_MIGRATIONS_TABLE: &str = "schema_migrations";

/// Bookkeeping table stored in PostgreSQL.
///
/// Layout: `(version TEXT PRIMARY KEY, applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW())`.
#[derive(Debug, Clone)]
pub struct PgMigrationStore {
    pool: PgPool,
    table: String,
}

impl PgMigrationStore {
    /// Create a store backed by `schema_migrations`.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table: DEFAULT_MIGRATIONS_TABLE.to_string(),
        }
    }

    /// Create a store backed by a differently named table.
    pub fn with_table(pool: PgPool, table: &str) -> Result<Self> {
        validate_identifier(table)?;
        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl MigrationStore for PgMigrationStore {
    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                version TEXT PRIMARY KEY,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Store(format!("ensure {}: {}", self.table, e)))?;

        debug!(
            { logging::SUBSYSTEM } = "migrate",
            { logging::COMPONENT } = "store",
            { logging::OPERATION } = "ensure_schema",
            { logging::DB_TABLE } = %self.table,
            "Bookkeeping table present"
        );
        Ok(())
    }

    async fn is_applied(&self, version: &MigrationVersion) -> Result<bool> {
        // A missing table means nothing has been applied yet.
        self.ensure_schema().await?;

        let exists: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE version = $1)",
            self.table
        ))
        .bind(version.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Error::Store(format!("check applied {}: {}", version, e)))?;

        Ok(exists)
    }

    async fn record_applied(&self, version: &MigrationVersion) -> Result<()> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (version) VALUES ($1)",
            self.table
        ))
        .bind(version.as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(Error::DuplicateVersion(version.clone()))
            }
            Err(e) => Err(Error::Store(format!("record migration {}: {}", version, e))),
        }
    }

    async fn list_applied(&self) -> Result<Vec<MigrationRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT version, applied_at FROM {} ORDER BY version",
            self.table
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Store(format!("list {}: {}", self.table, e)))?;

        rows.into_iter()
            .map(|row| {
                let version: String = row.try_get("version")?;
                let applied_at: DateTime<Utc> = row.try_get("applied_at")?;
                Ok(MigrationRecord {
                    version: MigrationVersion::new(version),
                    applied_at,
                })
            })
            .collect::<std::result::Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| Error::Store(format!("decode {}: {}", self.table, e)))
    }
}

/// Runs migration bodies over the simple-query protocol, so one file may
/// hold several statements.
#[derive(Debug, Clone)]
pub struct PgSqlExecutor {
    pool: PgPool,
}

impl PgSqlExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SqlExecutor for PgSqlExecutor {
    async fn execute_batch(&self, sql: &str) -> Result<()> {
        let result = sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            { logging::SUBSYSTEM } = "migrate",
            { logging::COMPONENT } = "executor",
            { logging::OPERATION } = "execute_batch",
            { logging::ROWS_AFFECTED } = result.rows_affected(),
            "Batch executed"
        );
        Ok(())
    }
}
