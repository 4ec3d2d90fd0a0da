//! Lazily opened shared database handle
//!
//! Every caller awaits the same initialization future, so the database is
//! opened (and migrated) once no matter how many tasks ask for it first.
//! The outcome is kept: a failed open is handed to every caller until the
//! handle is reset.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::OnceCell;

use super::database::Database;
use crate::error::FinanzenResult;

pub struct SharedDatabase {
    path: PathBuf,
    version: u32,
    cell: OnceCell<FinanzenResult<Arc<Database>>>,
    open_attempts: AtomicUsize,
}

impl SharedDatabase {
    pub fn new(path: impl Into<PathBuf>, version: u32) -> Self {
        Self {
            path: path.into(),
            version,
            cell: OnceCell::new(),
            open_attempts: AtomicUsize::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The open database, opening it on first use
    pub async fn get(&self) -> FinanzenResult<Arc<Database>> {
        self.cell
            .get_or_init(|| async {
                self.open_attempts.fetch_add(1, Ordering::SeqCst);
                let result = Database::open(&self.path, self.version).await;
                if let Err(e) = &result {
                    tracing::error!(path = %self.path.display(), error = %e, "failed to open database");
                }
                result.map(Arc::new)
            })
            .await
            .clone()
    }

    /// Whether an open has completed successfully
    pub fn is_open(&self) -> bool {
        matches!(self.cell.get(), Some(Ok(_)))
    }

    /// Number of times an open was started
    pub fn open_attempts(&self) -> usize {
        self.open_attempts.load(Ordering::SeqCst)
    }

    /// Forget the stored outcome so the next `get` opens again
    pub fn reset(&mut self) {
        self.cell.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::CURRENT_VERSION;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_returns_same_handle() {
        let temp_dir = TempDir::new().unwrap();
        let shared = SharedDatabase::new(temp_dir.path().join("db.json"), CURRENT_VERSION);
        assert!(!shared.is_open());

        let a = shared.get().await.unwrap();
        let b = shared.get().await.unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(shared.is_open());
        assert_eq!(shared.open_attempts(), 1);
    }

    #[tokio::test]
    async fn test_failed_open_is_not_retried() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut shared = SharedDatabase::new(&path, CURRENT_VERSION);
        assert!(shared.get().await.is_err());
        assert!(shared.get().await.is_err());
        assert_eq!(shared.open_attempts(), 1);

        std::fs::remove_file(&path).unwrap();
        shared.reset();
        assert!(shared.get().await.is_ok());
        assert_eq!(shared.open_attempts(), 2);
    }
}
