//! Backup and restore CLI commands

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::Subcommand;

use crate::backup::{BackupManager, RestoreManager};
use crate::error::{FinanzenError, FinanzenResult};
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Write a backup of accounts, transactions and goals
    Create {
        /// Write to this file instead of the backup directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List backups in the backup directory
    List,
}

/// Handle a backup command
pub async fn handle_backup_command(storage: &Storage, cmd: BackupCommands) -> FinanzenResult<()> {
    let manager = BackupManager::new(storage);

    match cmd {
        BackupCommands::Create { output } => {
            println!("Creating backup...");
            let path = match output {
                Some(path) => {
                    manager.write_backup(&path).await?;
                    path
                }
                None => manager.create_backup().await?,
            };
            println!("Backup created: {}", display_name(&path));
            println!("Location: {}", path.display());
        }

        BackupCommands::List => {
            let backups = manager.list_backups().await?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: finanzen backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            for (i, backup) in backups.iter().enumerate() {
                println!(
                    "  {}. {} ({})",
                    i + 1,
                    backup.filename,
                    format_size(backup.size_bytes)
                );
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }
    }

    Ok(())
}

/// Restore from a backup file, or `latest`
///
/// Without `force` only the backup's contents are shown. With it, the
/// current data is saved to a pre-restore backup first.
pub async fn handle_restore_command(
    storage: &Storage,
    backup: &str,
    force: bool,
) -> FinanzenResult<()> {
    let manager = BackupManager::new(storage);
    let backup_path = resolve_backup_path(&manager, backup).await?;

    let restore_manager = RestoreManager::new(storage);
    let validation = restore_manager.validate_file(&backup_path).await?;

    println!("Backup Information");
    println!("==================");
    println!("File: {}", backup_path.display());
    println!("Status: {}", validation.summary());
    println!();

    if !force {
        println!("WARNING: This will overwrite ALL current accounts, transactions and goals!");
        println!("To proceed, run again with --force flag:");
        println!("  finanzen restore {} --force", backup);
        return Ok(());
    }

    println!("Creating backup of current data before restore...");
    let pre_restore = manager.backup_dir().join(format!(
        "pre-restore-{}.json",
        Utc::now().format("%Y%m%d-%H%M%S")
    ));
    manager.write_backup(&pre_restore).await?;
    println!("Pre-restore backup saved: {}", display_name(&pre_restore));
    println!();

    println!("Restoring from backup...");
    let result = restore_manager.restore_from_file(&backup_path).await?;

    println!("Restore complete!");
    println!("{}", result.summary());
    println!("Replaced {}", result.replaced);

    Ok(())
}

async fn resolve_backup_path(manager: &BackupManager<'_>, backup: &str) -> FinanzenResult<PathBuf> {
    if backup == "latest" {
        return manager
            .latest_backup()
            .await?
            .map(|info| info.path)
            .ok_or_else(|| FinanzenError::NotFound {
                entity_type: "Backup",
                identifier: "latest".into(),
            });
    }

    let direct = PathBuf::from(backup);
    if direct.exists() {
        return Ok(direct);
    }

    let in_backup_dir = manager.backup_dir().join(backup);
    if in_backup_dir.exists() {
        return Ok(in_backup_dir);
    }

    Err(FinanzenError::NotFound {
        entity_type: "Backup",
        identifier: backup.to_string(),
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
