//! Audit log CLI command

use crate::error::FinanzenResult;
use crate::storage::Storage;

/// Print the most recent audit entries, oldest first
pub async fn handle_audit_command(storage: &Storage, limit: usize) -> FinanzenResult<()> {
    let Some(logger) = storage.audit() else {
        println!("Audit logging is disabled in the settings.");
        return Ok(());
    };

    if !logger.exists() {
        println!("No audit entries yet.");
        return Ok(());
    }

    let entries = logger.read_recent(limit).await?;
    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    println!();
    println!("Showing {} entries from {}", entries.len(), logger.path().display());

    Ok(())
}
