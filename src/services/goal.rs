//! Goal service
//!
//! Savings goals are standalone records: progress is edited by hand and is
//! never derived from transactions.

use crate::audit::EntityType;
use crate::error::{FinanzenError, FinanzenResult};
use crate::models::{Goal, GoalId, NewGoal};
use crate::storage::Storage;

/// Service for savings goals
pub struct GoalService<'a> {
    storage: &'a Storage,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> FinanzenResult<Vec<Goal>> {
        self.storage.db().get_all().await
    }

    pub async fn get(&self, id: GoalId) -> FinanzenResult<Option<Goal>> {
        self.storage.db().get(id.get()).await
    }

    /// Find a goal by name (case-insensitive) or by id (`goal-1` or `1`)
    pub async fn find(&self, identifier: &str) -> FinanzenResult<Option<Goal>> {
        let goals = self.list().await?;
        let wanted = identifier.trim().to_lowercase();

        if let Some(goal) = goals.iter().find(|g| g.name.to_lowercase() == wanted) {
            return Ok(Some(goal.clone()));
        }

        Ok(identifier
            .parse::<GoalId>()
            .ok()
            .and_then(|id| goals.into_iter().find(|g| g.id == id)))
    }

    pub async fn create(&self, draft: NewGoal) -> FinanzenResult<Goal> {
        let draft = NewGoal {
            name: draft.name.trim().to_string(),
            ..draft
        };
        draft
            .validate()
            .map_err(|e| FinanzenError::Validation(e.to_string()))?;

        let goal: Goal = self.storage.db().add(&draft).await?;

        self.storage
            .log_create(
                EntityType::Goal,
                goal.id.to_string(),
                Some(goal.name.clone()),
                &goal,
            )
            .await;

        Ok(goal)
    }

    pub async fn update(&self, goal: Goal) -> FinanzenResult<Goal> {
        goal.validate()
            .map_err(|e| FinanzenError::Validation(e.to_string()))?;

        let before = self
            .storage
            .db()
            .write(|tx| {
                let before: Goal = tx
                    .get(goal.id.get())?
                    .ok_or_else(|| FinanzenError::goal_not_found(goal.id.to_string()))?;
                tx.update(&goal)?;
                Ok(before)
            })
            .await?;

        self.storage
            .log_update(
                EntityType::Goal,
                goal.id.to_string(),
                Some(goal.name.clone()),
                &before,
                &goal,
            )
            .await;

        Ok(goal)
    }

    pub async fn delete(&self, id: GoalId) -> FinanzenResult<Goal> {
        let goal = self
            .storage
            .db()
            .write(|tx| {
                let goal: Goal = tx
                    .get(id.get())?
                    .ok_or_else(|| FinanzenError::goal_not_found(id.to_string()))?;
                tx.delete::<Goal>(id.get())?;
                Ok(goal)
            })
            .await?;

        self.storage
            .log_delete(
                EntityType::Goal,
                goal.id.to_string(),
                Some(goal.name.clone()),
                &goal,
            )
            .await;

        Ok(goal)
    }
}
