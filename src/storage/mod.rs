//! Storage layer for FinanZen
//!
//! A versioned, indexed record store persisted as one JSON document with
//! atomic writes, plus the coordinator the services share.

pub mod database;
pub mod file_io;
pub mod init;
pub mod object_store;
pub mod records;
pub mod schema;
pub mod shared;

pub use database::{Database, ReadTx, WriteTx};
pub use file_io::{read_json, read_json_required, write_json_atomic};
pub use init::{seed_if_empty, SeedSummary};
pub use records::Record;
pub use schema::{StoreName, CURRENT_VERSION, DATABASE_NAME};
pub use shared::SharedDatabase;

use std::sync::Arc;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::FinanzenPaths;
use crate::config::settings::Settings;
use crate::error::FinanzenResult;

/// Main storage coordinator: the open database plus the audit trail
pub struct Storage {
    paths: FinanzenPaths,
    db: Arc<Database>,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Open the database under `paths`, creating directories and settings
    /// on first use
    pub async fn open(paths: FinanzenPaths) -> FinanzenResult<Self> {
        paths.ensure_directories()?;
        let settings = Settings::load_or_create(&paths)?;
        let db = Database::open(paths.database_file(), CURRENT_VERSION).await?;
        Ok(Self::new(paths, Arc::new(db), settings.audit_enabled))
    }

    pub fn new(paths: FinanzenPaths, db: Arc<Database>, audit_enabled: bool) -> Self {
        let audit = audit_enabled.then(|| AuditLogger::new(paths.audit_log()));
        Self { paths, db, audit }
    }

    pub fn paths(&self) -> &FinanzenPaths {
        &self.paths
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The audit logger, when auditing is enabled
    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Check if the data directory has been set up
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Append an audit entry
    ///
    /// Called after a write scope has committed, so a failed append is only
    /// logged: the change is already on disk and must be reported as done.
    pub async fn log(&self, entry: AuditEntry) {
        let Some(logger) = &self.audit else {
            return;
        };
        if let Err(e) = logger.log(&entry).await {
            tracing::warn!(
                path = %logger.path().display(),
                operation = ?entry.operation,
                entity = %entry.entity_id,
                error = %e,
                "failed to append audit entry"
            );
        }
    }

    pub async fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        if self.audit.is_none() {
            return;
        }
        self.log(AuditEntry::create(entity_type, entity_id, entity_name, entity))
            .await
    }

    pub async fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) {
        if self.audit.is_none() {
            return;
        }
        self.log(AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
        .await
    }

    pub async fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        if self.audit.is_none() {
            return;
        }
        self.log(AuditEntry::delete(entity_type, entity_id, entity_name, entity))
            .await
    }
}
