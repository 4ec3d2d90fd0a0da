//! The versioned database and its read/write scopes
//!
//! The whole database is one JSON document on disk. A write scope works on a
//! copy of the in-memory state; when the closure returns `Ok` the copy is
//! written atomically and swapped in, otherwise it is dropped and nothing
//! changes. Writers are serialized by the lock, so a scope spanning several
//! stores is all-or-nothing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use super::file_io::{read_json, write_json_atomic};
use super::object_store::{ObjectStore, StoredObjectStore};
use super::records::Record;
use super::schema::{self, StoreName, DATABASE_NAME};
use crate::error::{FinanzenError, FinanzenResult};

/// On-disk form of the database
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatabaseDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: u32,
    #[serde(default)]
    stores: BTreeMap<StoreName, StoredObjectStore>,
}

#[derive(Debug, Clone, Default)]
struct DatabaseState {
    version: u32,
    stores: BTreeMap<StoreName, ObjectStore>,
}

impl DatabaseState {
    fn from_document(document: DatabaseDocument) -> FinanzenResult<Self> {
        let mut stores = BTreeMap::new();
        for (name, stored) in document.stores {
            stores.insert(name, ObjectStore::from_stored(name, stored)?);
        }
        Ok(Self {
            version: document.version,
            stores,
        })
    }

    fn to_document(&self) -> DatabaseDocument {
        DatabaseDocument {
            name: DATABASE_NAME.to_string(),
            version: self.version,
            stores: self
                .stores
                .iter()
                .map(|(name, store)| (*name, store.to_stored()))
                .collect(),
        }
    }

    fn store(&self, name: StoreName) -> FinanzenResult<&ObjectStore> {
        self.stores.get(&name).ok_or_else(|| missing_store(name))
    }

    fn store_mut(&mut self, name: StoreName) -> FinanzenResult<&mut ObjectStore> {
        self.stores.get_mut(&name).ok_or_else(|| missing_store(name))
    }
}

fn missing_store(name: StoreName) -> FinanzenError {
    FinanzenError::Schema(format!("Object store '{}' does not exist", name))
}

fn decode<T: Record>(value: &Value) -> FinanzenResult<T> {
    serde_json::from_value(value.clone()).map_err(|e| {
        FinanzenError::Storage(format!("Corrupt record in '{}': {}", T::STORE, e))
    })
}

fn encode<S: Serialize>(store: StoreName, record: &S) -> FinanzenResult<Value> {
    serde_json::to_value(record).map_err(|e| {
        FinanzenError::Storage(format!("Failed to encode record for '{}': {}", store, e))
    })
}

/// Read access to a consistent snapshot
pub struct ReadTx<'a> {
    state: &'a DatabaseState,
}

impl<'a> ReadTx<'a> {
    /// All records of a store in key order
    pub fn get_all<T: Record>(&self) -> FinanzenResult<Vec<T>> {
        self.state
            .store(T::STORE)?
            .values()
            .map(decode::<T>)
            .collect()
    }

    pub fn get<T: Record>(&self, key: u64) -> FinanzenResult<Option<T>> {
        self.state
            .store(T::STORE)?
            .get(key)
            .map(decode::<T>)
            .transpose()
    }

    /// Records whose indexed field equals `value`
    pub fn get_all_by_index<T: Record>(
        &self,
        index: &str,
        value: impl Serialize,
    ) -> FinanzenResult<Vec<T>> {
        let store = self.state.store(T::STORE)?;
        let value = encode(T::STORE, &value)?;
        store
            .keys_by_index(index, &value)?
            .into_iter()
            .filter_map(|key| store.get(key))
            .map(decode::<T>)
            .collect()
    }

    pub fn count<T: Record>(&self) -> FinanzenResult<usize> {
        Ok(self.state.store(T::STORE)?.count())
    }
}

/// Read/write access to the working copy of a write scope
pub struct WriteTx<'a> {
    state: &'a mut DatabaseState,
}

impl<'a> WriteTx<'a> {
    fn reader(&self) -> ReadTx<'_> {
        ReadTx { state: &*self.state }
    }

    pub fn get_all<T: Record>(&self) -> FinanzenResult<Vec<T>> {
        self.reader().get_all::<T>()
    }

    pub fn get<T: Record>(&self, key: u64) -> FinanzenResult<Option<T>> {
        self.reader().get::<T>(key)
    }

    pub fn get_all_by_index<T: Record>(
        &self,
        index: &str,
        value: impl Serialize,
    ) -> FinanzenResult<Vec<T>> {
        self.reader().get_all_by_index::<T>(index, value)
    }

    /// Store a draft under the next key and return the stored record
    pub fn add<T: Record>(&mut self, draft: &T::Draft) -> FinanzenResult<T> {
        let store = self.state.store_mut(T::STORE)?;
        let key = store.add(encode(T::STORE, draft)?)?;
        let stored = store
            .get(key)
            .ok_or_else(|| FinanzenError::Storage(format!("Record {} vanished", key)))?;
        decode::<T>(stored)
    }

    /// Store a record under its own key, failing if the key is taken
    pub fn insert<T: Record>(&mut self, record: &T) -> FinanzenResult<u64> {
        self.state
            .store_mut(T::STORE)?
            .add(encode(T::STORE, record)?)
    }

    /// Replace an existing record
    pub fn update<T: Record>(&mut self, record: &T) -> FinanzenResult<()> {
        self.state
            .store_mut(T::STORE)?
            .put(encode(T::STORE, record)?)?;
        Ok(())
    }

    /// Delete by key, reporting whether the record existed
    pub fn delete<T: Record>(&mut self, key: u64) -> FinanzenResult<bool> {
        Ok(self.state.store_mut(T::STORE)?.delete(key))
    }

    pub fn clear<T: Record>(&mut self) -> FinanzenResult<()> {
        self.state.store_mut(T::STORE)?.clear();
        Ok(())
    }

    /// Clear a store, then insert every record with its key preserved
    pub fn bulk_replace<T: Record>(&mut self, records: &[T]) -> FinanzenResult<()> {
        self.clear::<T>()?;
        for record in records {
            self.insert(record)?;
        }
        Ok(())
    }
}

/// An open database
pub struct Database {
    path: PathBuf,
    state: RwLock<DatabaseState>,
}

impl Database {
    /// Open (creating if missing) the database at `path`, upgrading it to
    /// `version`
    pub async fn open(path: impl Into<PathBuf>, version: u32) -> FinanzenResult<Self> {
        let path = path.into();

        if version == 0 {
            return Err(FinanzenError::Schema(
                "Database version must be at least 1".into(),
            ));
        }

        let document: DatabaseDocument = read_json(&path).await?;
        if !document.name.is_empty() && document.name != DATABASE_NAME {
            return Err(FinanzenError::Schema(format!(
                "{} holds database '{}', expected '{}'",
                path.display(),
                document.name,
                DATABASE_NAME
            )));
        }

        let stored_version = document.version;
        if version < stored_version {
            return Err(FinanzenError::Schema(format!(
                "Requested version {} is older than the stored version {}",
                version, stored_version
            )));
        }

        let mut state = DatabaseState::from_document(document)?;

        if version > stored_version {
            let applied = schema::upgrade(&mut state.stores, stored_version, version)?;
            state.version = version;
            write_json_atomic(&path, &state.to_document()).await?;
            tracing::info!(
                path = %path.display(),
                from = stored_version,
                to = version,
                steps = applied.len(),
                "upgraded database"
            );
        }

        tracing::info!(path = %path.display(), version, "opened database");

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn version(&self) -> u32 {
        self.state.read().await.version
    }

    pub async fn store_names(&self) -> Vec<StoreName> {
        self.state.read().await.stores.keys().copied().collect()
    }

    pub async fn index_names(&self, store: StoreName) -> FinanzenResult<Vec<String>> {
        Ok(self.state.read().await.store(store)?.index_names())
    }

    /// Run a read-only closure against the current state
    pub async fn read<T, F>(&self, f: F) -> FinanzenResult<T>
    where
        F: FnOnce(&ReadTx<'_>) -> FinanzenResult<T>,
    {
        let state = self.state.read().await;
        f(&ReadTx { state: &*state })
    }

    /// Run a closure as one all-or-nothing write scope
    pub async fn write<T, F>(&self, f: F) -> FinanzenResult<T>
    where
        F: FnOnce(&mut WriteTx<'_>) -> FinanzenResult<T>,
    {
        let mut state = self.state.write().await;
        let mut working = state.clone();

        let value = match f(&mut WriteTx {
            state: &mut working,
        }) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "write scope rolled back");
                return Err(e);
            }
        };

        if let Err(e) = write_json_atomic(&self.path, &working.to_document()).await {
            tracing::debug!(error = %e, "write scope rolled back: commit failed");
            return Err(e);
        }

        *state = working;
        tracing::debug!(path = %self.path.display(), "write scope committed");
        Ok(value)
    }

    pub async fn get_all<T: Record>(&self) -> FinanzenResult<Vec<T>> {
        self.read(|tx| tx.get_all::<T>()).await
    }

    pub async fn get<T: Record>(&self, key: u64) -> FinanzenResult<Option<T>> {
        self.read(|tx| tx.get::<T>(key)).await
    }

    pub async fn get_all_by_index<T: Record>(
        &self,
        index: &str,
        value: impl Serialize,
    ) -> FinanzenResult<Vec<T>> {
        self.read(|tx| tx.get_all_by_index::<T>(index, value))
            .await
    }

    pub async fn add<T: Record>(&self, draft: &T::Draft) -> FinanzenResult<T> {
        self.write(|tx| tx.add::<T>(draft)).await
    }

    pub async fn update<T: Record>(&self, record: &T) -> FinanzenResult<()> {
        self.write(|tx| tx.update::<T>(record)).await
    }

    pub async fn delete<T: Record>(&self, key: u64) -> FinanzenResult<bool> {
        self.write(|tx| tx.delete::<T>(key)).await
    }

    pub async fn bulk_replace<T: Record>(&self, records: &[T]) -> FinanzenResult<()> {
        self.write(|tx| tx.bulk_replace::<T>(records)).await
    }
}
