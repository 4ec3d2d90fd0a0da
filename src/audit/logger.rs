//! Append-only audit log
//!
//! Each entry is written as one JSON line and flushed immediately.

use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::entry::AuditEntry;
use crate::error::{FinanzenError, FinanzenResult};

/// Writes audit entries to the audit log file (JSONL)
#[derive(Debug, Clone)]
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry
    pub async fn log(&self, entry: &AuditEntry) -> FinanzenResult<()> {
        self.log_batch(std::slice::from_ref(entry)).await
    }

    /// Append several entries with a single flush
    pub async fn log_batch(&self, entries: &[AuditEntry]) -> FinanzenResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut buffer = String::new();
        for entry in entries {
            let line = serde_json::to_string(entry).map_err(|e| {
                FinanzenError::Json(format!("Failed to serialize audit entry: {}", e))
            })?;
            buffer.push_str(&line);
            buffer.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .await
            .map_err(|e| FinanzenError::Io(format!("Failed to open audit log: {}", e)))?;

        file.write_all(buffer.as_bytes())
            .await
            .map_err(|e| FinanzenError::Io(format!("Failed to write audit entry: {}", e)))?;

        file.flush()
            .await
            .map_err(|e| FinanzenError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// All entries, oldest first
    pub async fn read_all(&self) -> FinanzenResult<Vec<AuditEntry>> {
        let contents = match fs::read_to_string(&self.log_path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(FinanzenError::Io(format!(
                    "Failed to read audit log: {}",
                    e
                )))
            }
        };

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(line_num, line)| {
                serde_json::from_str(line).map_err(|e| {
                    FinanzenError::Json(format!(
                        "Failed to parse audit entry at line {}: {}",
                        line_num + 1,
                        e
                    ))
                })
            })
            .collect()
    }

    /// The most recent `count` entries, oldest first
    pub async fn read_recent(&self, count: usize) -> FinanzenResult<Vec<AuditEntry>> {
        let mut entries = self.read_all().await?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn account_entry(i: u64) -> AuditEntry {
        AuditEntry::create(
            EntityType::Account,
            format!("acc-{}", i),
            Some(format!("Account {}", i)),
            &json!({"id": i}),
        )
    }

    #[tokio::test]
    async fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        logger.log(&account_entry(1)).await.unwrap();

        let entries = logger.read_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::Account);
    }

    #[tokio::test]
    async fn test_entries_append_across_loggers() {
        let (logger, temp) = create_test_logger();
        logger.log(&account_entry(1)).await.unwrap();

        let reopened = AuditLogger::new(temp.path().join("audit.log"));
        reopened
            .log_batch(&[account_entry(2), account_entry(3)])
            .await
            .unwrap();

        assert_eq!(reopened.read_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_read_recent() {
        let (logger, _temp) = create_test_logger();
        for i in 0..10 {
            logger.log(&account_entry(i)).await.unwrap();
        }

        let recent = logger.read_recent(3).await.unwrap();
        let ids: Vec<&str> = recent.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["acc-7", "acc-8", "acc-9"]);
    }

    #[tokio::test]
    async fn test_empty_log() {
        let (logger, _temp) = create_test_logger();

        assert!(!logger.exists());
        assert!(logger.read_all().await.unwrap().is_empty());
        logger.log_batch(&[]).await.unwrap();
        assert!(!logger.exists());
    }
}
