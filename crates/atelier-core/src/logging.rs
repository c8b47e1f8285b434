//! Structured logging field names for atelier.
//!
//! Use them as constant field names so events stay greppable across crates:
//!
//! ```rust,ignore
//! tracing::info!({ logging::OPERATION } = "apply", "apply 001_init.sql");
//! ```
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | WARN  | Recoverable oddities (nothing currently) |
//! | INFO  | Lifecycle events, per-migration transitions, completions |
//! | DEBUG | Configuration, discovered files, the error behind a non-zero exit |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "migrate", "admin", "database", "crypto"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "runner", "loader", "store", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "discover", "skip", "apply", "record", "insert_admin"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Migration version (file base name) being operated on.
pub const VERSION: &str = "version";

/// Bookkeeping or target table.
pub const DB_TABLE: &str = "db_table";

/// Migrations directory being scanned.
pub const DIRECTORY: &str = "dir";

/// Display name of the user being provisioned.
pub const USER_NAME: &str = "name";

/// Database server host.
pub const DB_HOST: &str = "host";

/// Database name.
pub const DB_NAME: &str = "database";

/// Loaded configuration (redacted `Debug`).
pub const CONFIG: &str = "config";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of migration files discovered.
pub const MIGRATION_COUNT: &str = "migration_count";

/// Number of migrations newly applied in a run.
pub const APPLIED_COUNT: &str = "applied_count";

/// Size in bytes of a loaded migration body.
pub const BYTES: &str = "bytes";

/// Rows reported by the server for an executed batch.
pub const ROWS_AFFECTED: &str = "rows_affected";

/// Pool ceiling.
pub const MAX_CONNECTIONS: &str = "max_connections";

/// Connect deadline in seconds.
pub const CONNECT_TIMEOUT_SECS: &str = "connect_timeout_secs";

/// Open connections after the pool is built.
pub const POOL_SIZE: &str = "pool_size";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Reason a migration was skipped ("already_applied", "empty").
pub const SKIP_REASON: &str = "reason";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
