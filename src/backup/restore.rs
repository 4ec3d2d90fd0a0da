//! Backup restoration
//!
//! A restore replaces every account, transaction and goal with the contents
//! of a backup document in a single write scope. If anything fails, for
//! example two records sharing an id, the database is left as it was.
//! Categories are never touched.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::json;

use super::document::BackupDocument;
use crate::audit::AuditEntry;
use crate::error::{FinanzenError, FinanzenResult};
use crate::models::{Account, Goal, Transaction};
use crate::storage::Storage;

/// Handles restoring from backups
pub struct RestoreManager<'a> {
    storage: &'a Storage,
}

impl<'a> RestoreManager<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Read, validate and restore a backup file
    pub async fn restore_from_file(&self, backup_path: &Path) -> FinanzenResult<RestoreResult> {
        let document = read_document(backup_path).await?;
        let source = backup_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| backup_path.display().to_string());
        self.restore_with_source(&document, &source).await
    }

    /// Replace accounts, transactions and goals with the document's contents
    pub async fn restore(&self, document: &BackupDocument) -> FinanzenResult<RestoreResult> {
        self.restore_with_source(document, "backup document").await
    }

    async fn restore_with_source(
        &self,
        document: &BackupDocument,
        source: &str,
    ) -> FinanzenResult<RestoreResult> {
        let replaced = self
            .storage
            .db()
            .write(|tx| {
                let replaced = RecordCounts {
                    accounts: tx.get_all::<Account>()?.len(),
                    transactions: tx.get_all::<Transaction>()?.len(),
                    goals: tx.get_all::<Goal>()?.len(),
                };

                tx.clear::<Transaction>()?;
                tx.clear::<Goal>()?;
                tx.clear::<Account>()?;

                for account in &document.accounts {
                    tx.insert(account)?;
                }
                for transaction in &document.transactions {
                    tx.insert(transaction)?;
                }
                for goal in &document.goals {
                    tx.insert(goal)?;
                }

                Ok(replaced)
            })
            .await
            .map_err(|e| match e {
                FinanzenError::Constraint(msg) => {
                    FinanzenError::Validation(format!("Backup cannot be restored: {}", msg))
                }
                other => other,
            })?;

        let result = RestoreResult {
            backup_date: document.backup_date,
            restored: RecordCounts::of(document),
            replaced,
        };

        tracing::info!(
            source,
            accounts = result.restored.accounts,
            transactions = result.restored.transactions,
            goals = result.restored.goals,
            "restored backup"
        );

        if self.storage.audit().is_some() {
            self.storage
                .log(AuditEntry::restore(
                    source,
                    result.replaced.to_json(),
                    result.restored.to_json(),
                ))
                .await;
        }

        Ok(result)
    }

    /// Report what a backup file contains without restoring it
    pub async fn validate_file(&self, backup_path: &Path) -> FinanzenResult<ValidationResult> {
        let document = read_document(backup_path).await?;
        Ok(ValidationResult {
            backup_date: document.backup_date,
            counts: RecordCounts::of(&document),
        })
    }
}

async fn read_document(path: &Path) -> FinanzenResult<BackupDocument> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FinanzenError::Io(format!("Failed to read backup file: {}", e)))?;
    BackupDocument::parse(&json)
}

/// Number of records per collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordCounts {
    pub accounts: usize,
    pub transactions: usize,
    pub goals: usize,
}

impl RecordCounts {
    pub fn of(document: &BackupDocument) -> Self {
        Self {
            accounts: document.accounts.len(),
            transactions: document.transactions.len(),
            goals: document.goals.len(),
        }
    }

    fn to_json(self) -> serde_json::Value {
        json!({
            "accounts": self.accounts,
            "transactions": self.transactions,
            "goals": self.goals,
        })
    }
}

impl std::fmt::Display for RecordCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} accounts, {} transactions, {} goals",
            self.accounts, self.transactions, self.goals
        )
    }
}

/// Result of a restore operation
#[derive(Debug, Clone)]
pub struct RestoreResult {
    pub backup_date: Option<DateTime<Utc>>,
    /// Records now in the database
    pub restored: RecordCounts,
    /// Records that were replaced
    pub replaced: RecordCounts,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        let mut summary = format!("Restored {}", self.restored);
        if let Some(date) = self.backup_date {
            summary.push_str(&format!(" from backup taken {}", date.format("%Y-%m-%d %H:%M UTC")));
        }
        summary
    }
}

/// What a backup file holds
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub backup_date: Option<DateTime<Utc>>,
    pub counts: RecordCounts,
}

impl ValidationResult {
    pub fn is_empty(&self) -> bool {
        self.counts == RecordCounts::default()
    }

    pub fn summary(&self) -> String {
        match self.backup_date {
            Some(date) => format!(
                "Valid backup from {}: {}",
                date.format("%Y-%m-%d"),
                self.counts
            ),
            None => format!("Valid backup (undated): {}", self.counts),
        }
    }
}
