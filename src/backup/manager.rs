//! Backup creation and discovery
//!
//! Backups are dated JSON documents in the backup directory, one per UTC
//! day. Taking a second backup on the same day replaces the first.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use tokio::fs;

use super::document::{backup_filename, parse_backup_filename, BackupDocument};
use crate::error::{FinanzenError, FinanzenResult};
use crate::models::{Account, Goal, Transaction};
use crate::storage::{write_json_atomic, Storage};

/// Metadata about a backup file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    /// Date encoded in the file name
    pub date: NaiveDate,
    pub size_bytes: u64,
}

/// Creates and lists backups
pub struct BackupManager<'a> {
    storage: &'a Storage,
    backup_dir: PathBuf,
}

impl<'a> BackupManager<'a> {
    /// Manager writing to the configured backup directory
    pub fn new(storage: &'a Storage) -> Self {
        let backup_dir = storage.paths().backup_dir();
        Self {
            storage,
            backup_dir,
        }
    }

    pub fn with_backup_dir(storage: &'a Storage, backup_dir: PathBuf) -> Self {
        Self {
            storage,
            backup_dir,
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Accounts, transactions and goals from one consistent read
    pub async fn snapshot(&self) -> FinanzenResult<BackupDocument> {
        self.storage
            .db()
            .read(|tx| {
                Ok(BackupDocument {
                    accounts: tx.get_all::<Account>()?,
                    transactions: tx.get_all::<Transaction>()?,
                    goals: tx.get_all::<Goal>()?,
                    backup_date: Some(Utc::now()),
                })
            })
            .await
    }

    /// Write today's backup and return its path
    pub async fn create_backup(&self) -> FinanzenResult<PathBuf> {
        let document = self.snapshot().await?;
        let date = document
            .backup_date
            .unwrap_or_else(Utc::now)
            .date_naive();
        let path = self.backup_dir.join(backup_filename(date));

        write_json_atomic(&path, &document).await?;

        tracing::info!(
            path = %path.display(),
            accounts = document.accounts.len(),
            transactions = document.transactions.len(),
            goals = document.goals.len(),
            "created backup"
        );

        Ok(path)
    }

    /// Write a backup to an explicit path
    pub async fn write_backup(&self, path: &Path) -> FinanzenResult<BackupDocument> {
        let document = self.snapshot().await?;
        write_json_atomic(path, &document).await?;
        tracing::info!(path = %path.display(), "wrote backup");
        Ok(document)
    }

    /// Backups in the backup directory, newest first
    pub async fn list_backups(&self) -> FinanzenResult<Vec<BackupInfo>> {
        let mut entries = match fs::read_dir(&self.backup_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(FinanzenError::Io(format!(
                    "Failed to read backup directory: {}",
                    e
                )))
            }
        };

        let mut backups = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FinanzenError::Io(format!("Failed to read directory entry: {}", e)))?
        {
            let filename = entry.file_name().to_string_lossy().to_string();
            let Some(date) = parse_backup_filename(&filename) else {
                continue;
            };
            let size_bytes = entry.metadata().await.map(|m| m.len()).unwrap_or(0);

            backups.push(BackupInfo {
                path: entry.path(),
                filename,
                date,
                size_bytes,
            });
        }

        backups.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(backups)
    }

    pub async fn latest_backup(&self) -> FinanzenResult<Option<BackupInfo>> {
        Ok(self.list_backups().await?.into_iter().next())
    }
}
