//! File I/O utilities with atomic writes
//!
//! The database document and backup files are written to a temp file,
//! synced, and renamed over the target, so a crash leaves either the old or
//! the new contents on disk.

use std::io::ErrorKind;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::error::FinanzenError;

/// Read JSON from a file, returning a default value if the file doesn't exist
pub async fn read_json<T, P>(path: P) -> Result<T, FinanzenError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    match fs::read(path).await {
        Ok(bytes) => parse_json(path, &bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(FinanzenError::Storage(format!(
            "Failed to open {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Read JSON from a file, returning an error if the file doesn't exist
pub async fn read_json_required<T, P>(path: P) -> Result<T, FinanzenError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let bytes = fs::read(path).await.map_err(|e| {
        FinanzenError::Io(format!("Failed to read {}: {}", path.display(), e))
    })?;

    parse_json(path, &bytes)
}

fn parse_json<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<T, FinanzenError> {
    serde_json::from_slice(bytes).map_err(|e| {
        FinanzenError::Json(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Write JSON to a file atomically (write to temp, then rename)
pub async fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), FinanzenError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(|e| {
            FinanzenError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let bytes = serde_json::to_vec_pretty(data)
        .map_err(|e| FinanzenError::Storage(format!("Failed to serialize data: {}", e)))?;

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let mut file = File::create(&temp_path)
        .await
        .map_err(|e| FinanzenError::Storage(format!("Failed to create temp file: {}", e)))?;

    file.write_all(&bytes)
        .await
        .map_err(|e| FinanzenError::Storage(format!("Failed to write data: {}", e)))?;

    file.sync_all()
        .await
        .map_err(|e| FinanzenError::Storage(format!("Failed to sync data: {}", e)))?;
    drop(file);

    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(FinanzenError::Storage(format!(
            "Failed to rename temp file: {}",
            e
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn sample() -> TestData {
        TestData {
            name: "test".to_string(),
            value: 42,
        }
    }

    #[tokio::test]
    async fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let data: TestData = read_json(&path).await.unwrap();
        assert_eq!(data, TestData::default());
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        write_json_atomic(&path, &sample()).await.unwrap();

        let loaded: TestData = read_json(&path).await.unwrap();
        assert_eq!(loaded, sample());
        assert!(!temp_dir.path().join("test.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("test.json");

        write_json_atomic(&path, &sample()).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "not json at all").unwrap();

        let err = read_json::<TestData, _>(&path).await.unwrap_err();
        assert!(matches!(err, FinanzenError::Json(_)));
    }

    #[tokio::test]
    async fn test_read_json_required() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        assert!(read_json_required::<TestData, _>(&path).await.is_err());

        write_json_atomic(&path, &sample()).await.unwrap();
        let loaded: TestData = read_json_required(&path).await.unwrap();
        assert_eq!(loaded, sample());
    }
}
