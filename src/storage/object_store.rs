//! Keyed record collections with secondary indexes
//!
//! An object store holds JSON records keyed by their numeric `id`. Keys are
//! assigned from a counter that never moves backwards, so a deleted key is
//! not handed out again. Each index maps the string form of one field to the
//! set of keys whose record carries that value.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schema::StoreName;
use crate::error::{FinanzenError, FinanzenResult};

/// Field holding the primary key of every record
pub const KEY_PATH: &str = "id";

type Index = BTreeMap<String, BTreeSet<u64>>;

/// On-disk form of an object store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObjectStore {
    #[serde(default = "first_key")]
    pub next_key: u64,
    #[serde(default)]
    pub indexes: BTreeSet<String>,
    #[serde(default)]
    pub records: Vec<Value>,
}

fn first_key() -> u64 {
    1
}

/// In-memory object store
#[derive(Debug, Clone)]
pub struct ObjectStore {
    name: StoreName,
    next_key: u64,
    records: BTreeMap<u64, Value>,
    indexes: BTreeMap<String, Index>,
}

impl ObjectStore {
    pub fn new(name: StoreName) -> Self {
        Self {
            name,
            next_key: first_key(),
            records: BTreeMap::new(),
            indexes: BTreeMap::new(),
        }
    }

    /// Rebuild a store (and its indexes) from its on-disk form
    pub fn from_stored(name: StoreName, stored: StoredObjectStore) -> FinanzenResult<Self> {
        let mut store = Self::new(name);
        store.next_key = stored.next_key.max(first_key());

        for index in stored.indexes {
            store.indexes.insert(index, Index::new());
        }

        for record in stored.records {
            let key = record_key(&record)?.ok_or_else(|| {
                FinanzenError::Storage(format!("Record in '{}' has no '{}'", name, KEY_PATH))
            })?;
            if store.records.contains_key(&key) {
                return Err(FinanzenError::Storage(format!(
                    "Key {} appears twice in '{}'",
                    key, name
                )));
            }
            store.insert(key, record);
        }

        Ok(store)
    }

    pub fn to_stored(&self) -> StoredObjectStore {
        StoredObjectStore {
            next_key: self.next_key,
            indexes: self.indexes.keys().cloned().collect(),
            records: self.records.values().cloned().collect(),
        }
    }

    pub fn name(&self) -> StoreName {
        self.name
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn has_index(&self, index: &str) -> bool {
        self.indexes.contains_key(index)
    }

    pub fn index_names(&self) -> Vec<String> {
        self.indexes.keys().cloned().collect()
    }

    /// Add an index over `field`, covering records already in the store
    pub fn create_index(&mut self, field: &str) -> bool {
        if self.indexes.contains_key(field) {
            return false;
        }

        let mut index = Index::new();
        for (key, record) in &self.records {
            if let Some(value) = index_value(record, field) {
                index.entry(value).or_default().insert(*key);
            }
        }
        self.indexes.insert(field.to_string(), index);
        true
    }

    pub fn get(&self, key: u64) -> Option<&Value> {
        self.records.get(&key)
    }

    /// Records in key order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.records.values()
    }

    /// Insert a new record
    ///
    /// A record without an `id` gets the next key. A record with an `id`
    /// keeps it, and the counter moves past it.
    pub fn add(&mut self, mut record: Value) -> FinanzenResult<u64> {
        let key = match record_key(&record)? {
            Some(key) => {
                if self.records.contains_key(&key) {
                    return Err(FinanzenError::Constraint(format!(
                        "Key {} already exists in '{}'",
                        key, self.name
                    )));
                }
                key
            }
            None => {
                let key = self.next_key;
                let object = record.as_object_mut().ok_or_else(|| {
                    FinanzenError::Constraint(format!(
                        "Records in '{}' must be JSON objects",
                        self.name
                    ))
                })?;
                object.insert(KEY_PATH.to_string(), Value::from(key));
                key
            }
        };

        let following = key.checked_add(1).ok_or_else(|| {
            FinanzenError::Constraint(format!(
                "Key {} in '{}' leaves no room for further keys",
                key, self.name
            ))
        })?;
        self.next_key = self.next_key.max(following);
        self.insert(key, record);
        Ok(key)
    }

    /// Replace an existing record
    pub fn put(&mut self, record: Value) -> FinanzenResult<u64> {
        let key = record_key(&record)?.ok_or_else(|| {
            FinanzenError::Constraint(format!("Cannot update a '{}' record without a key", self.name))
        })?;

        if self.remove(key).is_none() {
            return Err(FinanzenError::NotFound {
                entity_type: self.name.entity_type(),
                identifier: key.to_string(),
            });
        }
        self.insert(key, record);
        Ok(key)
    }

    /// Remove a record, reporting whether it existed
    pub fn delete(&mut self, key: u64) -> bool {
        self.remove(key).is_some()
    }

    /// Remove every record. The key counter is kept.
    pub fn clear(&mut self) {
        self.records.clear();
        for index in self.indexes.values_mut() {
            index.clear();
        }
    }

    /// Keys of records whose indexed field equals `value`
    pub fn keys_by_index(&self, index: &str, value: &Value) -> FinanzenResult<Vec<u64>> {
        let entries = self.indexes.get(index).ok_or_else(|| {
            FinanzenError::Schema(format!(
                "Object store '{}' has no index '{}'",
                self.name, index
            ))
        })?;

        Ok(normalize(value)
            .and_then(|value| entries.get(&value))
            .map(|keys| keys.iter().copied().collect())
            .unwrap_or_default())
    }

    fn insert(&mut self, key: u64, record: Value) {
        for (field, index) in self.indexes.iter_mut() {
            if let Some(value) = index_value(&record, field) {
                index.entry(value).or_default().insert(key);
            }
        }
        self.records.insert(key, record);
    }

    fn remove(&mut self, key: u64) -> Option<Value> {
        let record = self.records.remove(&key)?;
        for (field, index) in self.indexes.iter_mut() {
            if let Some(value) = index_value(&record, field) {
                if let Some(keys) = index.get_mut(&value) {
                    keys.remove(&key);
                    if keys.is_empty() {
                        index.remove(&value);
                    }
                }
            }
        }
        Some(record)
    }
}

fn record_key(record: &Value) -> FinanzenResult<Option<u64>> {
    match record.get(KEY_PATH) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            FinanzenError::Constraint(format!("Invalid record key: {}", value))
        }),
    }
}

fn index_value(record: &Value, field: &str) -> Option<String> {
    record.get(field).and_then(normalize)
}

// Strings index as themselves, other scalars by their JSON text
fn normalize(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transactions() -> ObjectStore {
        let mut store = ObjectStore::new(StoreName::Transactions);
        store.create_index("accountId");
        store.create_index("status");
        store
    }

    #[test]
    fn test_add_assigns_increasing_keys() {
        let mut store = transactions();
        let a = store.add(json!({"accountId": 1, "status": "pending"})).unwrap();
        let b = store.add(json!({"accountId": 1, "status": "pending"})).unwrap();

        assert_eq!((a, b), (1, 2));
        assert_eq!(store.get(a).unwrap()["id"], json!(1));
    }

    #[test]
    fn test_add_keeps_explicit_key_and_moves_counter() {
        let mut store = transactions();
        store.add(json!({"id": 10, "accountId": 1})).unwrap();
        let next = store.add(json!({"accountId": 1})).unwrap();
        assert_eq!(next, 11);

        let err = store.add(json!({"id": 10})).unwrap_err();
        assert!(matches!(err, FinanzenError::Constraint(_)));
    }

    #[test]
    fn test_largest_possible_key_is_rejected() {
        let mut store = ObjectStore::new(StoreName::Accounts);
        store.add(json!({"name": "a"})).unwrap();

        let err = store.add(json!({"id": u64::MAX, "name": "b"})).unwrap_err();
        assert!(matches!(err, FinanzenError::Constraint(_)));
        assert_eq!(store.count(), 1);
        assert_eq!(store.add(json!({"name": "c"})).unwrap(), 2);
    }

    #[test]
    fn test_deleted_keys_are_not_reused() {
        let mut store = transactions();
        let a = store.add(json!({"accountId": 1})).unwrap();
        assert!(store.delete(a));
        assert!(!store.delete(a));

        let b = store.add(json!({"accountId": 1})).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_index_tracks_updates() {
        let mut store = transactions();
        let key = store
            .add(json!({"accountId": 1, "status": "pending"}))
            .unwrap();
        assert_eq!(
            store.keys_by_index("status", &json!("pending")).unwrap(),
            vec![key]
        );

        store
            .put(json!({"id": key, "accountId": 2, "status": "completed"}))
            .unwrap();
        assert!(store
            .keys_by_index("status", &json!("pending"))
            .unwrap()
            .is_empty());
        assert_eq!(store.keys_by_index("accountId", &json!(2)).unwrap(), vec![key]);
    }

    #[test]
    fn test_put_missing_record_is_not_found() {
        let mut store = transactions();
        let err = store.put(json!({"id": 4})).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unknown_index_is_an_error() {
        let store = transactions();
        assert!(store.keys_by_index("date", &json!("2025-01-01")).is_err());
    }

    #[test]
    fn test_create_index_covers_existing_records() {
        let mut store = ObjectStore::new(StoreName::Transactions);
        store.add(json!({"accountId": 1, "status": "completed"})).unwrap();
        store.add(json!({"accountId": 1})).unwrap();

        assert!(store.create_index("status"));
        assert!(!store.create_index("status"));
        assert_eq!(
            store.keys_by_index("status", &json!("completed")).unwrap(),
            vec![1]
        );
    }

    #[test]
    fn test_stored_form_rebuilds_indexes() {
        let mut store = transactions();
        store.add(json!({"accountId": 3, "status": "pending"})).unwrap();
        store.add(json!({"accountId": 3, "status": "pending"})).unwrap();
        store.delete(2);

        let restored = ObjectStore::from_stored(StoreName::Transactions, store.to_stored()).unwrap();
        assert_eq!(restored.count(), 1);
        assert_eq!(restored.keys_by_index("accountId", &json!(3)).unwrap(), vec![1]);
        // Counter survives even though key 2 is gone
        assert_eq!(restored.to_stored().next_key, 3);
    }

    #[test]
    fn test_clear_keeps_counter() {
        let mut store = transactions();
        store.add(json!({"accountId": 1})).unwrap();
        store.clear();
        assert_eq!(store.count(), 0);
        assert_eq!(store.add(json!({"accountId": 1})).unwrap(), 2);
    }
}
