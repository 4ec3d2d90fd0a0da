//! Backup and restore for FinanZen
//!
//! - `BackupDocument`: the portable JSON format (accounts, transactions,
//!   goals and the backup date), with validation on load.
//! - `BackupManager`: takes snapshots and writes dated backup files.
//! - `RestoreManager`: validates and restores backups atomically.
//!
//! # Example
//!
//! ```rust,ignore
//! use finanzen::backup::{BackupManager, RestoreManager};
//!
//! let backup_path = BackupManager::new(&storage).create_backup().await?;
//!
//! // Later
//! let result = RestoreManager::new(&storage)
//!     .restore_from_file(&backup_path)
//!     .await?;
//! println!("{}", result.summary());
//! ```

mod document;
mod manager;
mod restore;

pub use document::{backup_filename, parse_backup_filename, BackupDocument};
pub use manager::{BackupInfo, BackupManager};
pub use restore::{RecordCounts, RestoreManager, RestoreResult, ValidationResult};
