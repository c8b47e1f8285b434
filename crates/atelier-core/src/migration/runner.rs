//! Forward-only migration runner.
//!
//! Each discovered file moves through
//! `Discovered -> {Skipped(already applied) | Skipped(empty) | Applying -> Applied}`
//! in lexical order. The first failure ends the run: earlier migrations stay
//! recorded, the failing one and everything after it stay unapplied. Nothing
//! is retried and nothing is rolled back.

use std::time::Instant;

use tracing::info;

use crate::error::{Error, Result};
use crate::logging;
use crate::migration::loader::MigrationLoader;
use crate::models::{MigrationReport, MigrationState, MigrationStatus};
use crate::traits::{MigrationStore, SqlExecutor};

/// Applies pending migrations through a store and an executor.
pub struct MigrationRunner<S, E> {
    loader: MigrationLoader,
    store: S,
    executor: E,
}

impl<S, E> MigrationRunner<S, E>
where
    S: MigrationStore,
    E: SqlExecutor,
{
    pub fn new(loader: MigrationLoader, store: S, executor: E) -> Self {
        Self {
            loader,
            store,
            executor,
        }
    }

    /// Apply every pending migration once, in order.
    ///
    /// Re-running after success applies nothing and still succeeds.
    pub async fn run(&self) -> Result<MigrationReport> {
        let start = Instant::now();

        self.store.ensure_schema().await?;

        let files = self.loader.discover().await?;
        info!(
            { logging::SUBSYSTEM } = "migrate",
            { logging::COMPONENT } = "runner",
            { logging::OPERATION } = "discover",
            { logging::MIGRATION_COUNT } = files.len(),
            { logging::DIRECTORY } = %self.loader.directory().display(),
            "Discovered migrations"
        );

        let mut report = MigrationReport::default();
        for file in &files {
            let version = file.version();

            if self.store.is_applied(version).await? {
                info!(
                    { logging::SUBSYSTEM } = "migrate",
                    { logging::COMPONENT } = "runner",
                    { logging::OPERATION } = "skip",
                    { logging::VERSION } = %version,
                    { logging::SKIP_REASON } = "already_applied",
                    "skip {} (already applied)",
                    version
                );
                report.skipped_applied.push(version.clone());
                continue;
            }

            if file.is_empty() {
                info!(
                    { logging::SUBSYSTEM } = "migrate",
                    { logging::COMPONENT } = "runner",
                    { logging::OPERATION } = "skip",
                    { logging::VERSION } = %version,
                    { logging::SKIP_REASON } = "empty",
                    "skip {} (empty)",
                    version
                );
                report.skipped_empty.push(version.clone());
                continue;
            }

            let applied_at = Instant::now();
            info!(
                { logging::SUBSYSTEM } = "migrate",
                { logging::COMPONENT } = "runner",
                { logging::OPERATION } = "apply",
                { logging::VERSION } = %version,
                "apply {}",
                version
            );
            self.executor
                .execute_batch(file.sql())
                .await
                .map_err(|e| Error::Execution {
                    version: version.clone(),
                    source: Box::new(e),
                })?;

            // The body may have dropped the bookkeeping table.
            self.store.ensure_schema().await.map_err(|e| {
                Error::Store(format!(
                    "{version} was executed but the bookkeeping table could not be re-ensured: {e}"
                ))
            })?;
            self.store.record_applied(version).await?;

            info!(
                { logging::SUBSYSTEM } = "migrate",
                { logging::COMPONENT } = "runner",
                { logging::OPERATION } = "record",
                { logging::VERSION } = %version,
                { logging::DURATION_MS } = applied_at.elapsed().as_millis() as u64,
                "applied {}",
                version
            );
            report.applied.push(version.clone());
        }

        report.elapsed = start.elapsed();
        info!(
            { logging::SUBSYSTEM } = "migrate",
            { logging::COMPONENT } = "runner",
            { logging::OPERATION } = "complete",
            { logging::APPLIED_COUNT } = report.applied_count(),
            { logging::MIGRATION_COUNT } = report.discovered_count(),
            { logging::DURATION_MS } = report.elapsed.as_millis() as u64,
            "Migration run finished"
        );
        Ok(report)
    }

    /// Report where each discovered migration stands without executing any.
    ///
    /// Like [`MigrationStore::is_applied`], this creates the bookkeeping
    /// table if it is missing.
    pub async fn status(&self) -> Result<Vec<MigrationStatus>> {
        let files = self.loader.discover().await?;

        let mut statuses = Vec::with_capacity(files.len());
        for file in files {
            let state = if self.store.is_applied(file.version()).await? {
                MigrationState::Applied
            } else if file.is_empty() {
                MigrationState::Empty
            } else {
                MigrationState::Pending
            };
            statuses.push(MigrationStatus {
                version: file.version().clone(),
                state,
            });
        }
        Ok(statuses)
    }
}
