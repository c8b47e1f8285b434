//! Domain models shared by the migration runner and the admin tool.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// MIGRATIONS
// =============================================================================

/// Identifier of a migration: the base name of its file (`001_init.sql`).
///
/// Ordering is plain lexical string comparison, which is also the apply
/// order. Authors must name files so the two coincide (zero-padded prefixes).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigrationVersion(String);

impl MigrationVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MigrationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for MigrationVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MigrationVersion {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A row of the bookkeeping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub version: MigrationVersion,
    pub applied_at: DateTime<Utc>,
}

/// A candidate migration loaded from disk for the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    version: MigrationVersion,
    path: PathBuf,
    sql: String,
}

impl MigrationFile {
    /// Build a migration file; `sql` is stored trimmed.
    pub fn new(version: MigrationVersion, path: impl Into<PathBuf>, sql: &str) -> Self {
        Self {
            version,
            path: path.into(),
            sql: sql.trim().to_string(),
        }
    }

    pub fn version(&self) -> &MigrationVersion {
        &self.version
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Trimmed SQL body.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// True when the file holds nothing but whitespace. Such files are
    /// never executed nor recorded.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Where a discovered migration stands relative to the bookkeeping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationState {
    Applied,
    Pending,
    Empty,
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Applied => "applied",
            Self::Pending => "pending",
            Self::Empty => "empty",
        })
    }
}

/// One line of `migrate --status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub version: MigrationVersion,
    pub state: MigrationState,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Newly applied in this run, in apply order.
    pub applied: Vec<MigrationVersion>,
    /// Skipped because the bookkeeping table already lists them.
    pub skipped_applied: Vec<MigrationVersion>,
    /// Skipped because the trimmed body was empty.
    pub skipped_empty: Vec<MigrationVersion>,
    pub elapsed: Duration,
}

impl MigrationReport {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    pub fn discovered_count(&self) -> usize {
        self.applied.len() + self.skipped_applied.len() + self.skipped_empty.len()
    }
}

// =============================================================================
// USERS
// =============================================================================

/// Role stored for users created by `create-admin`.
pub const ADMIN_ROLE: &str = "admin";

/// Administrator row to insert into `users`.
///
/// The password is already hashed; plaintext never reaches this type.
#[derive(Clone, PartialEq, Eq)]
pub struct NewAdminUser {
    pub name: String,
    pub phone: String,
    pub password_hash: String,
}

impl NewAdminUser {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn role(&self) -> &'static str {
        ADMIN_ROLE
    }
}

impl fmt::Debug for NewAdminUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAdminUser")
            .field("name", &self.name)
            .field("phone", &self.phone)
            .field("role", &ADMIN_ROLE)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}
