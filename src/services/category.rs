//! Category service
//!
//! Categories are names offered when entering transactions. Transactions
//! keep their own copy of the name, so deleting a category leaves them
//! untouched.

use crate::audit::EntityType;
use crate::error::{FinanzenError, FinanzenResult};
use crate::models::{Category, CategoryId, NewCategory};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> FinanzenResult<Vec<Category>> {
        self.storage.db().get_all().await
    }

    pub async fn get(&self, id: CategoryId) -> FinanzenResult<Option<Category>> {
        self.storage.db().get(id.get()).await
    }

    /// Find a category by name (case-insensitive) or by id (`cat-2` or `2`)
    pub async fn find(&self, identifier: &str) -> FinanzenResult<Option<Category>> {
        let categories = self.list().await?;
        let wanted = identifier.trim().to_lowercase();

        if let Some(category) = categories.iter().find(|c| c.name.to_lowercase() == wanted) {
            return Ok(Some(category.clone()));
        }

        Ok(identifier
            .parse::<CategoryId>()
            .ok()
            .and_then(|id| categories.into_iter().find(|c| c.id == id)))
    }

    /// Create a category; names are trimmed and must be unique ignoring case
    pub async fn create(&self, name: &str) -> FinanzenResult<Category> {
        let draft = NewCategory::new(name);
        if draft.name.is_empty() {
            return Err(FinanzenError::Validation(
                "Category name cannot be empty".into(),
            ));
        }

        let category = self
            .storage
            .db()
            .write(|tx| {
                let wanted = draft.name.to_lowercase();
                let exists = tx
                    .get_all::<Category>()?
                    .iter()
                    .any(|c| c.name.to_lowercase() == wanted);
                if exists {
                    return Err(FinanzenError::Duplicate {
                        entity_type: "Category",
                        identifier: draft.name.clone(),
                    });
                }
                tx.add::<Category>(&draft)
            })
            .await?;

        self.storage
            .log_create(
                EntityType::Category,
                category.id.to_string(),
                Some(category.name.clone()),
                &category,
            )
            .await;

        Ok(category)
    }

    pub async fn delete(&self, id: CategoryId) -> FinanzenResult<Category> {
        let category = self
            .storage
            .db()
            .write(|tx| {
                let category: Category = tx
                    .get(id.get())?
                    .ok_or_else(|| FinanzenError::category_not_found(id.to_string()))?;
                tx.delete::<Category>(id.get())?;
                Ok(category)
            })
            .await?;

        self.storage
            .log_delete(
                EntityType::Category,
                category.id.to_string(),
                Some(category.name.clone()),
                &category,
            )
            .await;

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FinanzenPaths;
    use crate::models::{
        AccountType, Money, NewAccount, NewTransaction, Transaction, TransactionType,
    };
    use crate::services::{AccountService, TransactionService};
    use tempfile::TempDir;

    async fn setup() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinanzenPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).await.unwrap();
        (temp_dir, storage)
    }

    #[tokio::test]
    async fn test_create_trims_and_rejects_duplicates() {
        let (_temp_dir, storage) = setup().await;
        let service = CategoryService::new(&storage);

        let travel = service.create("  Travel ").await.unwrap();
        assert_eq!(travel.name, "Travel");

        let err = service.create("travel").await.unwrap_err();
        assert!(matches!(err, FinanzenError::Duplicate { .. }));

        assert!(service.create("   ").await.unwrap_err().is_validation());
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find() {
        let (_temp_dir, storage) = setup().await;
        let service = CategoryService::new(&storage);
        let food = service.create("Food").await.unwrap();

        assert_eq!(service.find("FOOD").await.unwrap(), Some(food.clone()));
        assert_eq!(service.find("cat-1").await.unwrap(), Some(food));
        assert!(service.find("Rent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_does_not_cascade() {
        let (_temp_dir, storage) = setup().await;
        let service = CategoryService::new(&storage);
        let food = service.create("Food").await.unwrap();

        let account = AccountService::new(&storage)
            .create(NewAccount::new("Checking", AccountType::Checking, Money::zero()))
            .await
            .unwrap();
        TransactionService::new(&storage)
            .add(
                NewTransaction::new(
                    account.id,
                    TransactionType::Expense,
                    Money::from_major(12),
                    "Lunch",
                )
                .with_category("Food"),
            )
            .await
            .unwrap();

        service.delete(food.id).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());

        let transactions: Vec<Transaction> = storage.db().get_all().await.unwrap();
        assert_eq!(transactions[0].category, "Food");

        assert!(service.delete(food.id).await.unwrap_err().is_not_found());
    }
}
