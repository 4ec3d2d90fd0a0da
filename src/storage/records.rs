//! Binding between model types and object stores

use serde::{de::DeserializeOwned, Serialize};

use super::schema::StoreName;
use crate::models::{
    Account, Category, Goal, NewAccount, NewCategory, NewGoal, NewTransaction, Transaction,
};

/// A model type persisted in one object store
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The store holding records of this type
    const STORE: StoreName;

    /// The not-yet-keyed form passed to `add`
    type Draft: Serialize + Send + Sync;

    /// Primary key
    fn key(&self) -> u64;
}

impl Record for Account {
    const STORE: StoreName = StoreName::Accounts;
    type Draft = NewAccount;

    fn key(&self) -> u64 {
        self.id.get()
    }
}

impl Record for Transaction {
    const STORE: StoreName = StoreName::Transactions;
    type Draft = NewTransaction;

    fn key(&self) -> u64 {
        self.id.get()
    }
}

impl Record for Goal {
    const STORE: StoreName = StoreName::Goals;
    type Draft = NewGoal;

    fn key(&self) -> u64 {
        self.id.get()
    }
}

impl Record for Category {
    const STORE: StoreName = StoreName::Categories;
    type Draft = NewCategory;

    fn key(&self) -> u64 {
        self.id.get()
    }
}
