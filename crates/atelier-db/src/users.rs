//! Administrator provisioning.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use atelier_core::{logging, Error, NewAdminUser, Result, UserRepository};

/// PostgreSQL implementation of user provisioning.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert_admin(&self, user: &NewAdminUser) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (name, phone, role, password_hash)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&user.name)
        .bind(&user.phone)
        .bind(user.role())
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        info!(
            { logging::SUBSYSTEM } = "admin",
            { logging::COMPONENT } = "users",
            { logging::OPERATION } = "insert_admin",
            { logging::DB_TABLE } = "users",
            { logging::USER_NAME } = %user.name,
            "Admin user inserted"
        );
        Ok(())
    }
}
