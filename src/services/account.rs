//! Account service
//!
//! Validated CRUD for accounts. Balances change here only through explicit
//! edits; transaction-driven changes go through `TransactionService`.

use crate::audit::EntityType;
use crate::error::{FinanzenError, FinanzenResult};
use crate::models::{Account, AccountId, Money, NewAccount};
use crate::storage::Storage;

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

impl<'a> AccountService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All accounts in creation order
    pub async fn list(&self) -> FinanzenResult<Vec<Account>> {
        self.storage.db().get_all().await
    }

    pub async fn get(&self, id: AccountId) -> FinanzenResult<Option<Account>> {
        self.storage.db().get(id.get()).await
    }

    /// Find an account by name (case-insensitive) or by id (`acc-3` or `3`)
    pub async fn find(&self, identifier: &str) -> FinanzenResult<Option<Account>> {
        let accounts = self.list().await?;
        let wanted = identifier.trim().to_lowercase();

        if let Some(account) = accounts
            .iter()
            .find(|a| a.name.to_lowercase() == wanted)
        {
            return Ok(Some(account.clone()));
        }

        Ok(identifier
            .parse::<AccountId>()
            .ok()
            .and_then(|id| accounts.into_iter().find(|a| a.id == id)))
    }

    /// Like `find`, but a miss is an error
    pub async fn require(&self, identifier: &str) -> FinanzenResult<Account> {
        self.find(identifier)
            .await?
            .ok_or_else(|| FinanzenError::account_not_found(identifier))
    }

    pub async fn create(&self, draft: NewAccount) -> FinanzenResult<Account> {
        let draft = NewAccount {
            name: draft.name.trim().to_string(),
            ..draft
        };
        draft
            .validate()
            .map_err(|e| FinanzenError::Validation(e.to_string()))?;

        let account: Account = self.storage.db().add(&draft).await?;

        self.storage
            .log_create(
                EntityType::Account,
                account.id.to_string(),
                Some(account.name.clone()),
                &account,
            )
            .await;

        Ok(account)
    }

    /// Replace an account's name, type or balance
    pub async fn update(&self, account: Account) -> FinanzenResult<Account> {
        account
            .validate()
            .map_err(|e| FinanzenError::Validation(e.to_string()))?;

        let before = self
            .storage
            .db()
            .write(|tx| {
                let before: Account = tx
                    .get(account.id.get())?
                    .ok_or_else(|| FinanzenError::account_not_found(account.id.to_string()))?;
                tx.update(&account)?;
                Ok(before)
            })
            .await?;

        self.storage
            .log_update(
                EntityType::Account,
                account.id.to_string(),
                Some(account.name.clone()),
                &before,
                &account,
            )
            .await;

        Ok(account)
    }

    /// Delete an account; its transactions are left in place
    pub async fn delete(&self, id: AccountId) -> FinanzenResult<Account> {
        let account = self
            .storage
            .db()
            .write(|tx| {
                let account: Account = tx
                    .get(id.get())?
                    .ok_or_else(|| FinanzenError::account_not_found(id.to_string()))?;
                tx.delete::<Account>(id.get())?;
                Ok(account)
            })
            .await?;

        self.storage
            .log_delete(
                EntityType::Account,
                account.id.to_string(),
                Some(account.name.clone()),
                &account,
            )
            .await;

        Ok(account)
    }

    /// Sum of all account balances
    pub async fn total_balance(&self) -> FinanzenResult<Money> {
        Ok(self.list().await?.iter().map(|a| a.balance).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FinanzenPaths;
    use crate::models::{AccountType, NewTransaction, Transaction, TransactionType};
    use tempfile::TempDir;

    async fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinanzenPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).await.unwrap();
        (temp_dir, storage)
    }

    #[tokio::test]
    async fn test_create_account() {
        let (_temp_dir, storage) = create_test_storage().await;
        let service = AccountService::new(&storage);

        let account = service
            .create(NewAccount::new(
                "  Checking ",
                AccountType::Checking,
                Money::from_major(100),
            ))
            .await
            .unwrap();

        assert_eq!(account.name, "Checking");
        assert_eq!(account.balance, Money::from_major(100));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_names() {
        let (_temp_dir, storage) = create_test_storage().await;
        let service = AccountService::new(&storage);

        let empty = service
            .create(NewAccount::new("  ", AccountType::Checking, Money::zero()))
            .await;
        assert!(empty.unwrap_err().is_validation());

        let long = service
            .create(NewAccount::new(
                "x".repeat(101),
                AccountType::Savings,
                Money::zero(),
            ))
            .await;
        assert!(long.unwrap_err().is_validation());
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_name_or_id() {
        let (_temp_dir, storage) = create_test_storage().await;
        let service = AccountService::new(&storage);
        let savings = service
            .create(NewAccount::new("Savings", AccountType::Savings, Money::zero()))
            .await
            .unwrap();

        assert_eq!(service.find("savings").await.unwrap(), Some(savings.clone()));
        assert_eq!(service.find("acc-1").await.unwrap(), Some(savings.clone()));
        assert_eq!(service.find("1").await.unwrap(), Some(savings));
        assert!(service.find("Brokerage").await.unwrap().is_none());
        assert!(service.require("Brokerage").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_account() {
        let (_temp_dir, storage) = create_test_storage().await;
        let service = AccountService::new(&storage);
        let mut account = service
            .create(NewAccount::new("Visa", AccountType::CreditCard, Money::zero()))
            .await
            .unwrap();

        account.name = "Visa Gold".into();
        service.update(account.clone()).await.unwrap();
        assert_eq!(
            service.get(account.id).await.unwrap().unwrap().name,
            "Visa Gold"
        );

        let missing = Account {
            id: AccountId::new(99),
            ..account
        };
        assert!(service.update(missing).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_leaves_transactions() {
        let (_temp_dir, storage) = create_test_storage().await;
        let service = AccountService::new(&storage);
        let account = service
            .create(NewAccount::new("Checking", AccountType::Checking, Money::zero()))
            .await
            .unwrap();

        storage
            .db()
            .add::<Transaction>(&NewTransaction::new(
                account.id,
                TransactionType::Expense,
                Money::from_major(5),
                "Coffee",
            ))
            .await
            .unwrap();

        service.delete(account.id).await.unwrap();
        assert!(service.get(account.id).await.unwrap().is_none());
        assert_eq!(storage.db().get_all::<Transaction>().await.unwrap().len(), 1);

        assert!(service.delete(account.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_changes_are_audited() {
        let (temp_dir, storage) = create_test_storage().await;
        let service = AccountService::new(&storage);
        let account = service
            .create(NewAccount::new("Checking", AccountType::Checking, Money::zero()))
            .await
            .unwrap();
        service.delete(account.id).await.unwrap();

        let log = std::fs::read_to_string(temp_dir.path().join("audit.log")).unwrap();
        assert_eq!(log.lines().count(), 2);
    }
}
