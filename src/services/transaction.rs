//! Transaction service
//!
//! Every mutation here keeps the owning account's balance consistent with
//! its transactions. The transaction write and the account write happen in
//! one write scope, so either both land or neither does.

use chrono::{DateTime, Utc};

use crate::audit::EntityType;
use crate::error::{FinanzenError, FinanzenResult};
use crate::models::{
    Account, AccountId, NewTransaction, Transaction, TransactionId, TransactionStatus,
};
use crate::storage::schema::index;
use crate::storage::{Storage, WriteTx};

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub account_id: Option<AccountId>,
    pub status: Option<TransactionStatus>,
    /// Inclusive lower bound on the transaction date
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the transaction date
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn date_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        self.account_id.map_or(true, |id| txn.account_id == id)
            && self.status.map_or(true, |status| txn.status == status)
            && self.start.map_or(true, |start| txn.date >= start)
            && self.end.map_or(true, |end| txn.date <= end)
    }
}

/// Account balances touched by one reconciled change
type BalanceChanges = Vec<(Account, Account)>;

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn get(&self, id: TransactionId) -> FinanzenResult<Option<Transaction>> {
        self.storage.db().get(id.get()).await
    }

    /// Transactions matching the filter, newest first
    pub async fn list(&self, filter: TransactionFilter) -> FinanzenResult<Vec<Transaction>> {
        let mut transactions = self
            .storage
            .db()
            .read(|tx| match (filter.account_id, filter.status) {
                (Some(account_id), _) => {
                    tx.get_all_by_index::<Transaction>(index::ACCOUNT_ID, account_id)
                }
                (None, Some(status)) => tx.get_all_by_index::<Transaction>(index::STATUS, status),
                (None, None) => tx.get_all::<Transaction>(),
            })
            .await?;

        transactions.retain(|t| filter.matches(t));
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Record a new transaction and apply it to its account
    ///
    /// New transactions always start out pending. Fails with NotFound, and
    /// stores nothing, when the account does not exist.
    pub async fn add(&self, draft: NewTransaction) -> FinanzenResult<Transaction> {
        let draft = NewTransaction {
            status: TransactionStatus::Pending,
            ..draft
        };
        draft
            .validate()
            .map_err(|e| FinanzenError::Validation(e.to_string()))?;

        let (txn, changes) = self
            .storage
            .db()
            .write(|tx| {
                let before: Account = tx
                    .get(draft.account_id.get())?
                    .ok_or_else(|| FinanzenError::account_not_found(draft.account_id.to_string()))?;

                let txn: Transaction = tx.add(&draft)?;

                let mut after = before.clone();
                after.apply_delta(txn.balance_delta());
                tx.update(&after)?;

                Ok((txn, vec![(before, after)]))
            })
            .await?;

        self.storage
            .log_create(
                EntityType::Transaction,
                txn.id.to_string(),
                Some(txn.description.clone()),
                &txn,
            )
            .await;
        self.log_balance_changes(&changes).await;

        Ok(txn)
    }

    /// Delete a transaction and reverse its effect on its account
    ///
    /// The reversal uses the amount and type of `txn` as passed in. Deleting
    /// a transaction that is not stored fails with NotFound, so a stale copy
    /// cannot be reversed twice. When the account no longer exists the
    /// transaction is still deleted. Returns the adjusted account, if any.
    pub async fn delete(&self, txn: &Transaction) -> FinanzenResult<Option<Account>> {
        let changes = self
            .storage
            .db()
            .write(|tx| {
                if !tx.delete::<Transaction>(txn.id.get())? {
                    return Err(FinanzenError::transaction_not_found(txn.id.to_string()));
                }
                reverse(tx, txn)
            })
            .await?;

        self.storage
            .log_delete(
                EntityType::Transaction,
                txn.id.to_string(),
                Some(txn.description.clone()),
                txn,
            )
            .await;
        self.log_balance_changes(&changes).await;

        Ok(changes.into_iter().next().map(|(_, after)| after))
    }

    /// Delete by id, reversing the stored record's effect
    pub async fn delete_by_id(&self, id: TransactionId) -> FinanzenResult<Transaction> {
        let txn = self
            .get(id)
            .await?
            .ok_or_else(|| FinanzenError::transaction_not_found(id.to_string()))?;
        self.delete(&txn).await?;
        Ok(txn)
    }

    /// Replace a transaction, moving its balance effect along with it
    ///
    /// The old effect is taken from the stored record. When the account
    /// changes, the old account (if it still exists) gets the reversal and
    /// the new account, which must exist, gets the new effect. An orphaned
    /// transaction left on its missing account is still updated.
    pub async fn update(&self, txn: Transaction) -> FinanzenResult<Transaction> {
        txn.validate()
            .map_err(|e| FinanzenError::Validation(e.to_string()))?;

        let (before, changes) = self
            .storage
            .db()
            .write(|tx| {
                let before: Transaction = tx
                    .get(txn.id.get())?
                    .ok_or_else(|| FinanzenError::transaction_not_found(txn.id.to_string()))?;

                let mut changes = BalanceChanges::new();
                if before.account_id == txn.account_id {
                    let delta = txn.balance_delta() - before.balance_delta();
                    match tx.get::<Account>(txn.account_id.get())? {
                        Some(account) => {
                            let mut after = account.clone();
                            after.apply_delta(delta);
                            tx.update(&after)?;
                            changes.push((account, after));
                        }
                        None => tracing::warn!(
                            transaction = %txn.id,
                            account = %txn.account_id,
                            "account no longer exists, skipping balance adjustment"
                        ),
                    }
                } else {
                    changes.extend(reverse(tx, &before)?);
                    let account = require_account(tx, txn.account_id)?;
                    let mut after = account.clone();
                    after.apply_delta(txn.balance_delta());
                    tx.update(&after)?;
                    changes.push((account, after));
                }

                tx.update(&txn)?;
                Ok((before, changes))
            })
            .await?;

        self.storage
            .log_update(
                EntityType::Transaction,
                txn.id.to_string(),
                Some(txn.description.clone()),
                &before,
                &txn,
            )
            .await;
        self.log_balance_changes(&changes).await;

        Ok(txn)
    }

    /// Change only the status; balances are not affected
    pub async fn set_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> FinanzenResult<Transaction> {
        let (before, after) = self
            .storage
            .db()
            .write(|tx| {
                let before: Transaction = tx
                    .get(id.get())?
                    .ok_or_else(|| FinanzenError::transaction_not_found(id.to_string()))?;
                let after = Transaction {
                    status,
                    ..before.clone()
                };
                tx.update(&after)?;
                Ok((before, after))
            })
            .await?;

        if before.status != after.status {
            self.storage
                .log_update(
                    EntityType::Transaction,
                    id.to_string(),
                    Some(after.description.clone()),
                    &before,
                    &after,
                )
                .await;
        }

        Ok(after)
    }

    /// Flip between pending and completed
    pub async fn toggle_status(&self, id: TransactionId) -> FinanzenResult<Transaction> {
        let txn = self
            .get(id)
            .await?
            .ok_or_else(|| FinanzenError::transaction_not_found(id.to_string()))?;
        self.set_status(id, txn.status.toggled()).await
    }

    async fn log_balance_changes(&self, changes: &[(Account, Account)]) {
        for (before, after) in changes {
            self.storage
                .log_update(
                    EntityType::Account,
                    after.id.to_string(),
                    Some(after.name.clone()),
                    before,
                    after,
                )
                .await;
        }
    }
}

fn require_account(tx: &WriteTx<'_>, id: AccountId) -> FinanzenResult<Account> {
    tx.get(id.get())?
        .ok_or_else(|| FinanzenError::account_not_found(id.to_string()))
}

/// Undo `txn`'s effect on its account, skipping accounts that are gone
fn reverse(tx: &mut WriteTx<'_>, txn: &Transaction) -> FinanzenResult<BalanceChanges> {
    let Some(account) = tx.get::<Account>(txn.account_id.get())? else {
        tracing::warn!(
            transaction = %txn.id,
            account = %txn.account_id,
            "account no longer exists, skipping balance reversal"
        );
        return Ok(Vec::new());
    };

    let mut after = account.clone();
    after.apply_delta(-txn.balance_delta());
    tx.update(&after)?;
    Ok(vec![(account, after)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FinanzenPaths;
    use crate::models::{AccountType, Money, NewAccount, TransactionType};
    use crate::services::AccountService;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    async fn setup() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinanzenPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).await.unwrap();
        (temp_dir, storage)
    }

    async fn account(storage: &Storage, name: &str, balance: i64) -> Account {
        AccountService::new(storage)
            .create(NewAccount::new(
                name,
                AccountType::Checking,
                Money::from_major(balance),
            ))
            .await
            .unwrap()
    }

    async fn balance(storage: &Storage, id: AccountId) -> Money {
        AccountService::new(storage)
            .get(id)
            .await
            .unwrap()
            .unwrap()
            .balance
    }

    fn expense(account_id: AccountId, amount: i64) -> NewTransaction {
        NewTransaction::new(
            account_id,
            TransactionType::Expense,
            Money::from_major(amount),
            "Groceries",
        )
    }

    #[tokio::test]
    async fn test_add_applies_delta() {
        let (_temp_dir, storage) = setup().await;
        let service = TransactionService::new(&storage);
        let checking = account(&storage, "Checking", 100).await;

        service.add(expense(checking.id, 30)).await.unwrap();
        assert_eq!(balance(&storage, checking.id).await, Money::from_major(70));

        let income = NewTransaction::new(
            checking.id,
            TransactionType::Income,
            Money::from_major(50),
            "Refund",
        );
        service.add(income).await.unwrap();
        assert_eq!(balance(&storage, checking.id).await, Money::from_major(120));
    }

    #[tokio::test]
    async fn test_add_forces_pending() {
        let (_temp_dir, storage) = setup().await;
        let service = TransactionService::new(&storage);
        let checking = account(&storage, "Checking", 100).await;

        let draft = NewTransaction {
            status: TransactionStatus::Completed,
            ..expense(checking.id, 1)
        };
        let txn = service.add(draft).await.unwrap();
        assert_eq!(txn.status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn test_add_to_missing_account_stores_nothing() {
        let (_temp_dir, storage) = setup().await;
        let service = TransactionService::new(&storage);

        let err = service.add(expense(AccountId::new(9), 10)).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(service.list(TransactionFilter::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_validates() {
        let (_temp_dir, storage) = setup().await;
        let service = TransactionService::new(&storage);
        let checking = account(&storage, "Checking", 100).await;

        let negative = expense(checking.id, -5);
        assert!(service.add(negative).await.unwrap_err().is_validation());

        let blank = NewTransaction {
            description: "   ".into(),
            ..expense(checking.id, 5)
        };
        assert!(service.add(blank).await.unwrap_err().is_validation());
        assert_eq!(balance(&storage, checking.id).await, Money::from_major(100));
    }

    #[tokio::test]
    async fn test_delete_restores_balance() {
        let (_temp_dir, storage) = setup().await;
        let service = TransactionService::new(&storage);
        let checking = account(&storage, "Checking", 100).await;

        let txn = service.add(expense(checking.id, 30)).await.unwrap();
        let adjusted = service.delete(&txn).await.unwrap().unwrap();

        assert_eq!(adjusted.balance, Money::from_major(100));
        assert_eq!(balance(&storage, checking.id).await, Money::from_major(100));
    }

    #[tokio::test]
    async fn test_second_delete_is_not_found() {
        let (_temp_dir, storage) = setup().await;
        let service = TransactionService::new(&storage);
        let checking = account(&storage, "Checking", 100).await;

        let txn = service.add(expense(checking.id, 30)).await.unwrap();
        service.delete(&txn).await.unwrap();

        assert!(service.delete(&txn).await.unwrap_err().is_not_found());
        assert_eq!(balance(&storage, checking.id).await, Money::from_major(100));
    }

    #[tokio::test]
    async fn test_delete_orphaned_transaction() {
        let (_temp_dir, storage) = setup().await;
        let service = TransactionService::new(&storage);
        let checking = account(&storage, "Checking", 100).await;

        let txn = service.add(expense(checking.id, 30)).await.unwrap();
        AccountService::new(&storage).delete(checking.id).await.unwrap();

        assert!(service.delete(&txn).await.unwrap().is_none());
        assert!(service.get(txn.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_orphaned_transaction() {
        let (_temp_dir, storage) = setup().await;
        let service = TransactionService::new(&storage);
        let checking = account(&storage, "Checking", 100).await;

        let mut txn = service.add(expense(checking.id, 30)).await.unwrap();
        AccountService::new(&storage).delete(checking.id).await.unwrap();

        txn.description = "Weekly groceries".into();
        txn.amount = Money::from_major(35);
        service.update(txn.clone()).await.unwrap();

        assert_eq!(service.get(txn.id).await.unwrap(), Some(txn));
        assert!(AccountService::new(&storage)
            .get(checking.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_unwritable_audit_log_does_not_fail_committed_add() {
        let (_temp_dir, storage) = setup().await;
        let service = TransactionService::new(&storage);
        let checking = account(&storage, "Checking", 100).await;

        std::fs::remove_file(storage.paths().audit_log()).ok();
        std::fs::create_dir(storage.paths().audit_log()).unwrap();

        let txn = service.add(expense(checking.id, 30)).await.unwrap();
        assert_eq!(balance(&storage, checking.id).await, Money::from_major(70));
        assert_eq!(
            service.list(TransactionFilter::new()).await.unwrap(),
            vec![txn.clone()]
        );

        service.delete(&txn).await.unwrap();
        assert_eq!(balance(&storage, checking.id).await, Money::from_major(100));
    }

    #[tokio::test]
    async fn test_update_amount_and_type() {
        let (_temp_dir, storage) = setup().await;
        let service = TransactionService::new(&storage);
        let checking = account(&storage, "Checking", 100).await;

        let mut txn = service.add(expense(checking.id, 30)).await.unwrap();
        txn.amount = Money::from_major(40);
        let txn = service.update(txn).await.unwrap();
        assert_eq!(balance(&storage, checking.id).await, Money::from_major(60));

        let flipped = Transaction {
            transaction_type: TransactionType::Income,
            ..txn
        };
        service.update(flipped).await.unwrap();
        assert_eq!(balance(&storage, checking.id).await, Money::from_major(140));
    }

    #[tokio::test]
    async fn test_update_moves_between_accounts() {
        let (_temp_dir, storage) = setup().await;
        let service = TransactionService::new(&storage);
        let checking = account(&storage, "Checking", 100).await;
        let savings = account(&storage, "Savings", 500).await;

        let txn = service.add(expense(checking.id, 30)).await.unwrap();
        let moved = Transaction {
            account_id: savings.id,
            ..txn.clone()
        };
        service.update(moved).await.unwrap();

        assert_eq!(balance(&storage, checking.id).await, Money::from_major(100));
        assert_eq!(balance(&storage, savings.id).await, Money::from_major(470));

        let to_missing = Transaction {
            account_id: AccountId::new(77),
            ..txn
        };
        assert!(service.update(to_missing).await.unwrap_err().is_not_found());
        assert_eq!(balance(&storage, savings.id).await, Money::from_major(470));
    }

    #[tokio::test]
    async fn test_status_does_not_touch_balance() {
        let (_temp_dir, storage) = setup().await;
        let service = TransactionService::new(&storage);
        let checking = account(&storage, "Checking", 100).await;

        let txn = service.add(expense(checking.id, 30)).await.unwrap();
        let done = service.toggle_status(txn.id).await.unwrap();
        assert_eq!(done.status, TransactionStatus::Completed);

        let pending = service
            .set_status(txn.id, TransactionStatus::Pending)
            .await
            .unwrap();
        assert_eq!(pending.status, TransactionStatus::Pending);
        assert_eq!(balance(&storage, checking.id).await, Money::from_major(70));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let (_temp_dir, storage) = setup().await;
        let service = TransactionService::new(&storage);
        let checking = account(&storage, "Checking", 1000).await;
        let savings = account(&storage, "Savings", 1000).await;

        let base = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        for day in 0..5 {
            service
                .add(expense(checking.id, 10).with_date(base + Duration::days(day)))
                .await
                .unwrap();
        }
        let other = service
            .add(expense(savings.id, 10).with_date(base))
            .await
            .unwrap();
        service
            .set_status(other.id, TransactionStatus::Completed)
            .await
            .unwrap();

        let all = service.list(TransactionFilter::new()).await.unwrap();
        assert_eq!(all.len(), 6);
        assert!(all.windows(2).all(|w| w[0].date >= w[1].date));

        let checking_only = service
            .list(TransactionFilter::new().account(checking.id).limit(2))
            .await
            .unwrap();
        assert_eq!(checking_only.len(), 2);
        assert_eq!(checking_only[0].date, base + Duration::days(4));

        let completed = service
            .list(TransactionFilter::new().status(TransactionStatus::Completed))
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, other.id);

        let middle = service
            .list(
                TransactionFilter::new()
                    .account(checking.id)
                    .date_range(base + Duration::days(1), base + Duration::days(3)),
            )
            .await
            .unwrap();
        assert_eq!(middle.len(), 3);
    }
}
