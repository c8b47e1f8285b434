//! Error types for atelier operations.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::models::MigrationVersion;

/// Result type alias using atelier's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for atelier operations.
///
/// Every variant is terminal: nothing in the workspace retries or recovers
/// locally, the binaries turn any of these into a non-zero exit status.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Required configuration missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Could not reach the database
    #[error("Connection error: {0}")]
    Connectivity(String),

    /// Migration directory or file could not be read
    #[error("Cannot read {}: {source}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Migration directory holds no `*.sql` files
    #[error("No .sql files found in {}", .0.display())]
    NoMigrations(PathBuf),

    /// Bookkeeping table operation failed
    #[error("Migration store error: {0}")]
    Store(String),

    /// Version already present in the bookkeeping table
    #[error("Migration {0} is already recorded as applied")]
    DuplicateVersion(MigrationVersion),

    /// A migration body failed to execute
    #[error("Apply {version} failed: {source}")]
    Execution {
        version: MigrationVersion,
        #[source]
        source: Box<Error>,
    },

    /// Password hash generation failed
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Overall operation deadline elapsed
    #[error("Operation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
