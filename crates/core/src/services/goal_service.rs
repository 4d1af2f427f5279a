use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::goal::{Contribution, Goal, GoalUpdate, GoalView, NewGoal};
use crate::models::validation::Validate;
use crate::storage::traits::GoalRepository;

/// Savings goal CRUD plus contributions.
pub struct GoalService {
    repo: Arc<dyn GoalRepository>,
}

impl GoalService {
    pub fn new(repo: Arc<dyn GoalRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        user_id: &str,
        request: NewGoal,
        now: NaiveDateTime,
    ) -> Result<GoalView, CoreError> {
        request.validate()?;
        request.ensure_deadline_after(now)?;
        let goal = self.repo.insert(Goal::new(user_id, request)).await?;
        info!(user_id, goal_id = %goal.id, target = goal.target, "Created goal");
        Ok(GoalView::new(goal, now))
    }

    pub async fn get(&self, user_id: &str, id: Uuid, now: NaiveDateTime) -> Result<GoalView, CoreError> {
        Ok(GoalView::new(self.find(user_id, id).await?, now))
    }

    /// All goals of the user, nearest deadline first.
    pub async fn list(&self, user_id: &str, now: NaiveDateTime) -> Result<Vec<GoalView>, CoreError> {
        Ok(self
            .repo
            .list(user_id)
            .await?
            .into_iter()
            .map(|g| GoalView::new(g, now))
            .collect())
    }

    pub async fn update(
        &self,
        user_id: &str,
        id: Uuid,
        update: GoalUpdate,
        now: NaiveDateTime,
    ) -> Result<GoalView, CoreError> {
        update.validate()?;
        let mut goal = self.find(user_id, id).await?;
        goal.apply(update);
        let goal = self.repo.update(goal).await?;
        info!(user_id, goal_id = %id, "Updated goal");
        Ok(GoalView::new(goal, now))
    }

    /// Add money towards a goal.
    pub async fn contribute(
        &self,
        user_id: &str,
        id: Uuid,
        contribution: Contribution,
        now: NaiveDateTime,
    ) -> Result<GoalView, CoreError> {
        contribution.validate()?;
        let mut goal = self.find(user_id, id).await?;
        goal.current += contribution.amount;
        let goal = self.repo.update(goal).await?;
        info!(user_id, goal_id = %id, amount = contribution.amount, "Recorded goal contribution");
        Ok(GoalView::new(goal, now))
    }

    pub async fn delete(&self, user_id: &str, id: Uuid) -> Result<(), CoreError> {
        if !self.repo.delete(user_id, id).await? {
            return Err(CoreError::not_found("Goal", id));
        }
        info!(user_id, goal_id = %id, "Deleted goal");
        Ok(())
    }

    async fn find(&self, user_id: &str, id: Uuid) -> Result<Goal, CoreError> {
        self.repo
            .find(user_id, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Goal", id))
    }
}
