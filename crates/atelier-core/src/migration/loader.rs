//! Migration file discovery.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::{Error, Result};
use crate::logging;
use crate::models::{MigrationFile, MigrationVersion};

/// Extension a file must carry to be treated as a migration.
pub const MIGRATION_EXTENSION: &str = "sql";

/// Discovers `*.sql` files directly inside one directory.
#[derive(Debug, Clone)]
pub struct MigrationLoader {
    directory: PathBuf,
}

impl MigrationLoader {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Load every migration in lexical file-name order.
    ///
    /// Non-recursive. Bodies are read eagerly and trimmed; empty bodies are
    /// returned as-is and left to the runner to skip.
    pub async fn discover(&self) -> Result<Vec<MigrationFile>> {
        let mut candidates = self.list_candidates().await?;
        if candidates.is_empty() {
            return Err(Error::NoMigrations(self.directory.clone()));
        }

        // Enumeration order is file-system dependent; the name is the contract.
        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        let mut files = Vec::with_capacity(candidates.len());
        for (name, path) in candidates {
            let sql = read_utf8(&path).await?;
            debug!(
                { logging::SUBSYSTEM } = "migrate",
                { logging::COMPONENT } = "loader",
                { logging::OPERATION } = "read",
                { logging::VERSION } = %name,
                { logging::BYTES } = sql.len(),
                "Loaded migration file"
            );
            files.push(MigrationFile::new(MigrationVersion::new(name), path, &sql));
        }

        Ok(files)
    }

    async fn list_candidates(&self) -> Result<Vec<(String, PathBuf)>> {
        let discovery_error = |source: io::Error| Error::Discovery {
            path: self.directory.clone(),
            source,
        };

        let mut entries = fs::read_dir(&self.directory)
            .await
            .map_err(discovery_error)?;

        let mut candidates = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(discovery_error)? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(MIGRATION_EXTENSION) {
                continue;
            }

            // Follows symlinks, like a shell glob would.
            let metadata = fs::metadata(&path)
                .await
                .map_err(|source| Error::Discovery {
                    path: path.clone(),
                    source,
                })?;
            if !metadata.is_file() {
                continue;
            }

            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    return Err(Error::Discovery {
                        path,
                        source: io::Error::new(
                            io::ErrorKind::InvalidData,
                            "migration file name is not valid UTF-8",
                        ),
                    })
                }
            };
            candidates.push((name, path));
        }

        Ok(candidates)
    }
}

async fn read_utf8(path: &Path) -> Result<String> {
    let bytes = fs::read(path).await.map_err(|source| Error::Discovery {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|e| Error::Discovery {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    fn versions(files: &[MigrationFile]) -> Vec<&str> {
        files.iter().map(|f| f.version().as_str()).collect()
    }

    #[tokio::test]
    async fn test_discover_orders_by_file_name() {
        let dir = tempdir().unwrap();
        // Created out of order on purpose.
        write(dir.path(), "003_c.sql", "SELECT 3;");
        write(dir.path(), "001_a.sql", "SELECT 1;");
        write(dir.path(), "002_b.sql", "SELECT 2;");

        let files = MigrationLoader::new(dir.path()).discover().await.unwrap();
        assert_eq!(versions(&files), vec!["001_a.sql", "002_b.sql", "003_c.sql"]);
    }

    #[tokio::test]
    async fn test_version_is_base_name() {
        let dir = tempdir().unwrap();
        write(dir.path(), "001_init.sql", "CREATE TABLE t (id INT);");

        let files = MigrationLoader::new(dir.path()).discover().await.unwrap();
        assert_eq!(files[0].version().as_str(), "001_init.sql");
        assert_eq!(files[0].path(), dir.path().join("001_init.sql"));
    }

    #[tokio::test]
    async fn test_only_sql_files_are_candidates() {
        let dir = tempdir().unwrap();
        write(dir.path(), "001_a.sql", "SELECT 1;");
        write(dir.path(), "README.md", "# notes");
        write(dir.path(), "002_b.sql.bak", "SELECT 2;");
        write(dir.path(), "003_c.SQL", "SELECT 3;");

        let files = MigrationLoader::new(dir.path()).discover().await.unwrap();
        assert_eq!(versions(&files), vec!["001_a.sql"]);
    }

    #[tokio::test]
    async fn test_discover_is_not_recursive() {
        let dir = tempdir().unwrap();
        write(dir.path(), "001_a.sql", "SELECT 1;");
        let nested = dir.path().join("archive");
        std::fs::create_dir(&nested).unwrap();
        write(&nested, "000_old.sql", "SELECT 0;");
        // A directory whose name looks like a migration is skipped too.
        std::fs::create_dir(dir.path().join("002_dir.sql")).unwrap();

        let files = MigrationLoader::new(dir.path()).discover().await.unwrap();
        assert_eq!(versions(&files), vec!["001_a.sql"]);
    }

    #[tokio::test]
    async fn test_bodies_are_trimmed_and_empty_files_kept() {
        let dir = tempdir().unwrap();
        write(dir.path(), "001_a.sql", "\n  CREATE TABLE a (id INT);\n\n");
        write(dir.path(), "002_empty.sql", "  \n\t\n");

        let files = MigrationLoader::new(dir.path()).discover().await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].sql(), "CREATE TABLE a (id INT);");
        assert!(files[1].is_empty());
    }

    #[tokio::test]
    async fn test_no_migrations() {
        let dir = tempdir().unwrap();
        write(dir.path(), "notes.txt", "nothing here");

        let result = MigrationLoader::new(dir.path()).discover().await;
        match result {
            Err(Error::NoMigrations(path)) => assert_eq!(path, dir.path()),
            other => panic!("Expected NoMigrations, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let result = MigrationLoader::new(&missing).discover().await;
        match result {
            Err(Error::Discovery { path, source }) => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("Expected Discovery error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_utf8_body() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("001_bad.sql"), [0xff, 0xfe, 0x00]).unwrap();

        let result = MigrationLoader::new(dir.path()).discover().await;
        match result {
            Err(Error::Discovery { path, source }) => {
                assert!(path.ends_with("001_bad.sql"));
                assert_eq!(source.kind(), io::ErrorKind::InvalidData);
            }
            other => panic!("Expected Discovery error, got {:?}", other),
        }
    }
}
