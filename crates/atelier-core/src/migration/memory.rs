//! In-memory [`MigrationStore`] and [`SqlExecutor`] for deterministic tests.
//!
//! The store models the bookkeeping table closely enough to exercise the
//! runner protocol: the table can be absent, dropped, and it enforces the
//! primary key on `version`.
//!
//! ```rust,ignore
//! use crate::migration::memory::{MemoryMigrationStore, RecordingExecutor};
//!
//! let store = MemoryMigrationStore::new();
//! let executor = RecordingExecutor::new().fail_on("002_b");
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::models::{MigrationRecord, MigrationVersion};
use crate::traits::{MigrationStore, SqlExecutor};

#[derive(Debug, Default)]
struct StoreState {
    table_exists: bool,
    records: BTreeMap<MigrationVersion, MigrationRecord>,
    ensure_calls: usize,
}

/// Bookkeeping table held in memory. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryMigrationStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryMigrationStore {
    /// Create a store whose table does not exist yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed versions as already applied (creates the table).
    pub async fn seed(&self, versions: &[&str]) {
        let mut state = self.state.lock().await;
        state.table_exists = true;
        for v in versions {
            let version = MigrationVersion::new(*v);
            state.records.insert(
                version.clone(),
                MigrationRecord {
                    version,
                    applied_at: Utc::now(),
                },
            );
        }
    }

    /// Drop the table and everything in it.
    pub async fn drop_table(&self) {
        let mut state = self.state.lock().await;
        state.table_exists = false;
        state.records.clear();
    }

    pub async fn table_exists(&self) -> bool {
        self.state.lock().await.table_exists
    }

    /// Recorded versions in version order.
    pub async fn recorded(&self) -> Vec<String> {
        self.state
            .lock()
            .await
            .records
            .keys()
            .map(|v| v.to_string())
            .collect()
    }

    /// How many times `ensure_schema` ran, directly or via `is_applied`.
    pub async fn ensure_calls(&self) -> usize {
        self.state.lock().await.ensure_calls
    }
}

#[async_trait]
impl MigrationStore for MemoryMigrationStore {
    async fn ensure_schema(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.table_exists = true;
        state.ensure_calls += 1;
        Ok(())
    }

    async fn is_applied(&self, version: &MigrationVersion) -> Result<bool> {
        self.ensure_schema().await?;
        Ok(self.state.lock().await.records.contains_key(version))
    }

    async fn record_applied(&self, version: &MigrationVersion) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.table_exists {
            return Err(Error::Store(format!(
                "record migration {version}: relation \"schema_migrations\" does not exist"
            )));
        }
        if state.records.contains_key(version) {
            return Err(Error::DuplicateVersion(version.clone()));
        }
        state.records.insert(
            version.clone(),
            MigrationRecord {
                version: version.clone(),
                applied_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn list_applied(&self) -> Result<Vec<MigrationRecord>> {
        let state = self.state.lock().await;
        if !state.table_exists {
            return Ok(Vec::new());
        }
        Ok(state.records.values().cloned().collect())
    }
}

/// Executor that records every batch it runs. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    executed: Arc<Mutex<Vec<String>>>,
    fail_fragments: Arc<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any batch containing `fragment`.
    pub fn fail_on(mut self, fragment: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.fail_fragments).push(fragment.into());
        self
    }

    /// Batches executed successfully, in order.
    pub async fn executed(&self) -> Vec<String> {
        self.executed.lock().await.clone()
    }
}

#[async_trait]
impl SqlExecutor for RecordingExecutor {
    async fn execute_batch(&self, sql: &str) -> Result<()> {
        if let Some(fragment) = self.fail_fragments.iter().find(|f| sql.contains(f.as_str())) {
            return Err(Error::Store(format!(
                "simulated failure executing batch containing {fragment:?}"
            )));
        }
        self.executed.lock().await.push(sql.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_is_applied_creates_table() {
        let store = MemoryMigrationStore::new();
        assert!(!store.table_exists().await);
        assert!(!store.is_applied(&"001_a.sql".into()).await.unwrap());
        assert!(store.table_exists().await);
    }

    #[tokio::test]
    async fn test_record_without_table_fails() {
        let store = MemoryMigrationStore::new();
        let result = store.record_applied(&"001_a.sql".into()).await;
        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[tokio::test]
    async fn test_duplicate_record_rejected() {
        let store = MemoryMigrationStore::new();
        store.ensure_schema().await.unwrap();
        store.record_applied(&"001_a.sql".into()).await.unwrap();
        let result = store.record_applied(&"001_a.sql".into()).await;
        assert!(matches!(result, Err(Error::DuplicateVersion(v)) if v.as_str() == "001_a.sql"));
        assert_eq!(store.recorded().await, vec!["001_a.sql"]);
    }

    #[tokio::test]
    async fn test_executor_fail_on() {
        let executor = RecordingExecutor::new().fail_on("boom");
        executor.execute_batch("SELECT 1").await.unwrap();
        assert!(executor.execute_batch("SELECT boom").await.is_err());
        assert_eq!(executor.executed().await, vec!["SELECT 1"]);
    }
}
