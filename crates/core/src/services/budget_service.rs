use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::budget::{Budget, BudgetUpdate, BudgetView, NewBudget};
use crate::models::validation::Validate;
use crate::services::period_service::PeriodService;
use crate::storage::traits::BudgetRepository;

/// Budget CRUD. Windows always come from the period strategy, never from
/// the caller.
pub struct BudgetService {
    repo: Arc<dyn BudgetRepository>,
    periods: PeriodService,
}

impl BudgetService {
    pub fn new(repo: Arc<dyn BudgetRepository>) -> Self {
        Self {
            repo,
            periods: PeriodService::new(),
        }
    }

    /// Create a budget for the week/month containing `request.reference_date`
    /// (or `now` when absent).
    pub async fn create(
        &self,
        user_id: &str,
        request: NewBudget,
        now: NaiveDateTime,
    ) -> Result<BudgetView, CoreError> {
        request.validate()?;
        let reference = request.reference_date.unwrap_or_else(|| now.date());
        let window = self.periods.compute_window(request.period, reference);
        let budget = Budget::new(user_id, request.period, request.total_budget, request.notes, window);

        let budget = self.repo.insert(budget).await?;
        info!(
            user_id,
            budget_id = %budget.id,
            period = %budget.period,
            window = %window,
            "Created budget"
        );
        Ok(BudgetView::new(budget, now))
    }

    pub async fn get(&self, user_id: &str, id: Uuid, now: NaiveDateTime) -> Result<BudgetView, CoreError> {
        Ok(BudgetView::new(self.find(user_id, id).await?, now))
    }

    /// All budgets of the user, latest window first.
    pub async fn list(&self, user_id: &str, now: NaiveDateTime) -> Result<Vec<BudgetView>, CoreError> {
        Ok(self
            .repo
            .list(user_id)
            .await?
            .into_iter()
            .map(|b| BudgetView::new(b, now))
            .collect())
    }

    /// Apply a partial update. A new period or reference date recomputes the
    /// window; otherwise the existing window is kept.
    pub async fn update(
        &self,
        user_id: &str,
        id: Uuid,
        update: BudgetUpdate,
        now: NaiveDateTime,
    ) -> Result<BudgetView, CoreError> {
        update.validate()?;
        let mut budget = self.find(user_id, id).await?;

        if update.changes_window() {
            let period = update.period.unwrap_or(budget.period);
            let reference = update.reference_date.unwrap_or_else(|| budget.start_date.date());
            let window = self.periods.compute_window(period, reference);
            budget.period = period;
            budget.start_date = window.start;
            budget.end_date = window.end;
        }
        if let Some(total) = update.total_budget {
            budget.total_budget = total;
        }
        if let Some(notes) = update.notes {
            budget.notes = notes;
        }

        let budget = self.repo.update(budget).await?;
        info!(user_id, budget_id = %id, "Updated budget");
        Ok(BudgetView::new(budget, now))
    }

    pub async fn delete(&self, user_id: &str, id: Uuid) -> Result<(), CoreError> {
        if !self.repo.delete(user_id, id).await? {
            return Err(CoreError::not_found("Budget", id));
        }
        info!(user_id, budget_id = %id, "Deleted budget");
        Ok(())
    }

    async fn find(&self, user_id: &str, id: Uuid) -> Result<Budget, CoreError> {
        self.repo
            .find(user_id, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Budget", id))
    }
}
