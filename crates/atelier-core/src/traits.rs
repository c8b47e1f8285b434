//! Core traits for atelier abstractions.
//!
//! The migration runner only talks to these seams; PostgreSQL
//! implementations live in `atelier-db`.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// MIGRATION BOOKKEEPING
// =============================================================================

/// Bookkeeping table of applied migrations.
///
/// Implementations own the table's schema and contents exclusively.
#[async_trait]
pub trait MigrationStore: Send + Sync {
    /// Create the bookkeeping table if it does not exist. Idempotent.
    async fn ensure_schema(&self) -> Result<()>;

    /// Whether `version` has been recorded.
    ///
    /// Also guarantees the table exists, so calling it before
    /// [`ensure_schema`](Self::ensure_schema) reports "not applied" instead
    /// of failing.
    async fn is_applied(&self, version: &MigrationVersion) -> Result<bool>;

    /// Record `version` as applied now.
    ///
    /// Fails with [`Error::DuplicateVersion`](crate::Error::DuplicateVersion)
    /// if it is already recorded.
    async fn record_applied(&self, version: &MigrationVersion) -> Result<()>;

    /// All recorded migrations, ordered by version.
    async fn list_applied(&self) -> Result<Vec<MigrationRecord>>;
}

/// Executes a migration body against the database.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Execute `sql` as a single batch; it may hold several statements.
    async fn execute_batch(&self, sql: &str) -> Result<()>;
}

// =============================================================================
// USERS
// =============================================================================

/// Repository for administrator provisioning.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert an admin row. Phone uniqueness is the table's concern; a
    /// violation comes back as the store's own error.
    async fn insert_admin(&self, user: &NewAdminUser) -> Result<()>;
}
