//! # atelier-core
//!
//! Core types, traits, and the migration protocol shared by the atelier
//! operational tools.
//!
//! This crate provides:
//! - The error taxonomy and [`Result`] alias
//! - Explicit process [`Config`]
//! - [`MigrationStore`] / [`SqlExecutor`] / [`UserRepository`] seams
//! - [`MigrationLoader`] and [`MigrationRunner`]

pub mod config;
pub mod error;
pub mod logging;
pub mod migration;
pub mod models;
pub mod traits;

pub use config::Config;
pub use error::{Error, Result};
pub use migration::{MigrationLoader, MigrationRunner};
pub use models::*;
pub use traits::*;
