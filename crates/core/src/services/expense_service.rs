use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::date_range::DateRange;
use crate::models::expense::{Expense, ExpenseUpdate, NewExpense};
use crate::models::validation::Validate;
use crate::storage::traits::ExpenseRepository;

/// Expense CRUD: validate → repository → record.
pub struct ExpenseService {
    repo: Arc<dyn ExpenseRepository>,
}

impl ExpenseService {
    pub fn new(repo: Arc<dyn ExpenseRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, user_id: &str, request: NewExpense) -> Result<Expense, CoreError> {
        request.validate()?;
        let expense = self.repo.insert(Expense::new(user_id, request)).await?;
        info!(user_id, expense_id = %expense.id, amount = expense.amount, "Created expense");
        Ok(expense)
    }

    pub async fn get(&self, user_id: &str, id: Uuid) -> Result<Expense, CoreError> {
        self.repo
            .find(user_id, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Expense", id))
    }

    /// All expenses of the user, newest first.
    pub async fn list(&self, user_id: &str) -> Result<Vec<Expense>, CoreError> {
        self.repo.list(user_id).await
    }

    pub async fn list_in_range(&self, user_id: &str, range: &DateRange) -> Result<Vec<Expense>, CoreError> {
        self.repo.find_in_range(user_id, range).await
    }

    pub async fn update(
        &self,
        user_id: &str,
        id: Uuid,
        update: ExpenseUpdate,
    ) -> Result<Expense, CoreError> {
        update.validate()?;
        let mut expense = self.get(user_id, id).await?;
        expense.apply(update);
        let expense = self.repo.update(expense).await?;
        info!(user_id, expense_id = %id, "Updated expense");
        Ok(expense)
    }

    pub async fn delete(&self, user_id: &str, id: Uuid) -> Result<(), CoreError> {
        if !self.repo.delete(user_id, id).await? {
            return Err(CoreError::not_found("Expense", id));
        }
        info!(user_id, expense_id = %id, "Deleted expense");
        Ok(())
    }
}
