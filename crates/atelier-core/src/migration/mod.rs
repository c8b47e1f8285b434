//! Apply-once, ordered SQL migrations.
//!
//! Migrations are `*.sql` files in a single directory. A file's base name is
//! its version and its place in the apply order: files are applied in plain
//! lexical order of their names, so prefixes must be zero-padded
//! (`001_init.sql`, `002_users.sql`, ... `010_audit.sql`).

pub mod loader;
#[cfg(test)]
pub(crate) mod memory;
pub mod runner;

pub use loader::{MigrationLoader, MIGRATION_EXTENSION};
pub use runner::MigrationRunner;
