//! Path management for FinanZen
//!
//! ## Path Resolution Order
//!
//! 1. `FINANZEN_DATA_DIR` environment variable (if set)
//! 2. The platform data directory for `finanzen` (via `directories`)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::FinanzenError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "FINANZEN_DATA_DIR";

/// Manages all paths used by FinanZen
#[derive(Debug, Clone)]
pub struct FinanzenPaths {
    /// Base directory for all FinanZen data
    base_dir: PathBuf,
}

impl FinanzenPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no platform data directory can be determined.
    pub fn new() -> Result<Self, FinanzenError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) => PathBuf::from(custom),
            None => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create FinanzenPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the embedded database document
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Default destination for backup documents
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// The embedded database document (all object stores)
    pub fn database_file(&self) -> PathBuf {
        self.data_dir().join("finanzen.db.json")
    }

    /// Ensure the base, data and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), FinanzenError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FinanzenError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| FinanzenError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| FinanzenError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if FinanZen has been initialized (settings file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, FinanzenError> {
    ProjectDirs::from("", "", "finanzen")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            FinanzenError::Config(format!(
                "Could not determine a data directory; set {}",
                DATA_DIR_ENV
            ))
        })
}
