//! Database schema and versioned migrations
//!
//! The schema grows through an ordered list of steps keyed by version. A
//! database opened at version `n` runs every step above its stored version
//! up to `n`, once. Steps only add object stores and indexes and are safe to
//! re-run against a database that already has them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::object_store::ObjectStore;
use crate::error::{FinanzenError, FinanzenResult};

/// Name recorded in the database document
pub const DATABASE_NAME: &str = "FinanZenDB";

/// Schema version this build of the library opens databases at
pub const CURRENT_VERSION: u32 = 3;

/// Secondary index names (equal to the indexed field)
pub mod index {
    pub const ACCOUNT_ID: &str = "accountId";
    pub const DATE: &str = "date";
    pub const STATUS: &str = "status";
}

/// The object stores a database can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreName {
    Accounts,
    Transactions,
    Goals,
    Categories,
}

impl StoreName {
    pub const ALL: [StoreName; 4] = [
        Self::Accounts,
        Self::Transactions,
        Self::Goals,
        Self::Categories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accounts => "accounts",
            Self::Transactions => "transactions",
            Self::Goals => "goals",
            Self::Categories => "categories",
        }
    }

    /// Singular entity name used in error messages
    pub fn entity_type(&self) -> &'static str {
        match self {
            Self::Accounts => "Account",
            Self::Transactions => "Transaction",
            Self::Goals => "Goal",
            Self::Categories => "Category",
        }
    }
}

impl fmt::Display for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema operations available to a migration step
pub struct SchemaUpgrade<'a> {
    stores: &'a mut BTreeMap<StoreName, ObjectStore>,
}

impl<'a> SchemaUpgrade<'a> {
    pub(crate) fn new(stores: &'a mut BTreeMap<StoreName, ObjectStore>) -> Self {
        Self { stores }
    }

    /// Create an object store unless it already exists
    pub fn create_store(&mut self, name: StoreName) -> bool {
        if self.stores.contains_key(&name) {
            return false;
        }
        self.stores.insert(name, ObjectStore::new(name));
        true
    }

    /// Add an index to an existing store, indexing the records it already holds
    pub fn create_index(&mut self, store: StoreName, index: &str) -> FinanzenResult<bool> {
        let object_store = self.stores.get_mut(&store).ok_or_else(|| {
            FinanzenError::Schema(format!(
                "Cannot create index '{}': object store '{}' does not exist",
                index, store
            ))
        })?;
        Ok(object_store.create_index(index))
    }
}

/// One schema step
pub struct Migration {
    pub version: u32,
    pub description: &'static str,
    apply: fn(&mut SchemaUpgrade<'_>) -> FinanzenResult<()>,
}

impl Migration {
    pub fn apply(&self, upgrade: &mut SchemaUpgrade<'_>) -> FinanzenResult<()> {
        (self.apply)(upgrade)
    }
}

/// All schema steps, in version order
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create accounts, transactions (accountId, date indexes) and goals",
        apply: initial_stores,
    },
    Migration {
        version: 2,
        description: "create categories",
        apply: categories_store,
    },
    Migration {
        version: 3,
        description: "index transactions by status",
        apply: transaction_status_index,
    },
];

fn initial_stores(upgrade: &mut SchemaUpgrade<'_>) -> FinanzenResult<()> {
    upgrade.create_store(StoreName::Accounts);
    upgrade.create_store(StoreName::Transactions);
    upgrade.create_index(StoreName::Transactions, index::ACCOUNT_ID)?;
    upgrade.create_index(StoreName::Transactions, index::DATE)?;
    upgrade.create_store(StoreName::Goals);
    Ok(())
}

fn categories_store(upgrade: &mut SchemaUpgrade<'_>) -> FinanzenResult<()> {
    upgrade.create_store(StoreName::Categories);
    Ok(())
}

fn transaction_status_index(upgrade: &mut SchemaUpgrade<'_>) -> FinanzenResult<()> {
    upgrade.create_index(StoreName::Transactions, index::STATUS)?;
    Ok(())
}

/// Run every step with `from < version <= to`, returning the versions applied
pub fn upgrade(
    stores: &mut BTreeMap<StoreName, ObjectStore>,
    from: u32,
    to: u32,
) -> FinanzenResult<Vec<u32>> {
    if to < from {
        return Err(FinanzenError::Schema(format!(
            "Requested version {} is older than the stored version {}",
            to, from
        )));
    }

    let mut applied = Vec::new();
    let mut schema = SchemaUpgrade::new(stores);

    for migration in MIGRATIONS
        .iter()
        .filter(|m| m.version > from && m.version <= to)
    {
        migration.apply(&mut schema).map_err(|e| {
            FinanzenError::Schema(format!(
                "Migration to version {} ({}) failed: {}",
                migration.version, migration.description, e
            ))
        })?;
        tracing::info!(
            version = migration.version,
            description = migration.description,
            "applied schema migration"
        );
        applied.push(migration.version);
    }

    Ok(applied)
}
