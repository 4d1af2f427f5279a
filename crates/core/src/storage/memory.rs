use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::budget::Budget;
use crate::models::date_range::DateRange;
use crate::models::expense::Expense;
use crate::models::goal::Goal;
use crate::models::ledger::Ledger;
use crate::models::report::ReportDownloadLog;

use super::traits::{BudgetRepository, ExpenseRepository, GoalRepository, ReportLogRepository};

/// In-process implementation of every repository trait, backed by a single
/// [`Ledger`] behind a lock.
///
/// Expenses are kept sorted by date (oldest first); lists are returned
/// newest-first. Pair with [`super::manager::SnapshotManager`] to persist.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: RwLock<Ledger>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ledger(mut ledger: Ledger) -> Self {
        ledger.expenses.sort_by(|a, b| a.date.cmp(&b.date));
        Self {
            ledger: RwLock::new(ledger),
        }
    }

    /// Copy of the current state, e.g. for writing a snapshot.
    pub fn snapshot(&self) -> Result<Ledger, CoreError> {
        Ok(self.read()?.clone())
    }

    /// Swap in a previously loaded ledger.
    pub fn replace(&self, mut ledger: Ledger) -> Result<(), CoreError> {
        ledger.expenses.sort_by(|a, b| a.date.cmp(&b.date));
        *self.write()? = ledger;
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Ledger>, CoreError> {
        self.ledger
            .read()
            .map_err(|_| CoreError::Storage("ledger lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Ledger>, CoreError> {
        self.ledger
            .write()
            .map_err(|_| CoreError::Storage("ledger lock poisoned".into()))
    }

    /// Insert keeping date order. Uses binary search (O(log n) + shift).
    fn insert_sorted(expenses: &mut Vec<Expense>, expense: Expense) {
        let idx = expenses.partition_point(|e| e.date <= expense.date);
        expenses.insert(idx, expense);
    }
}

#[async_trait]
impl ExpenseRepository for MemoryStore {
    async fn insert(&self, expense: Expense) -> Result<Expense, CoreError> {
        let mut ledger = self.write()?;
        Self::insert_sorted(&mut ledger.expenses, expense.clone());
        Ok(expense)
    }

    async fn find(&self, user_id: &str, id: Uuid) -> Result<Option<Expense>, CoreError> {
        Ok(self
            .read()?
            .expenses
            .iter()
            .find(|e| e.id == id && e.user_id == user_id)
            .cloned())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Expense>, CoreError> {
        Ok(self
            .read()?
            .expenses
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_in_range(
        &self,
        user_id: &str,
        range: &DateRange,
    ) -> Result<Vec<Expense>, CoreError> {
        let ledger = self.read()?;
        let from = ledger.expenses.partition_point(|e| e.date < range.start);
        let to = ledger.expenses.partition_point(|e| e.date <= range.end);
        let found: Vec<Expense> = ledger.expenses[from..to]
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        debug!(user_id, count = found.len(), range = %range, "Fetched expenses");
        Ok(found)
    }

    async fn update(&self, expense: Expense) -> Result<Expense, CoreError> {
        let mut ledger = self.write()?;
        let idx = ledger
            .expenses
            .iter()
            .position(|e| e.id == expense.id && e.user_id == expense.user_id)
            .ok_or_else(|| CoreError::not_found("Expense", expense.id))?;
        // Re-insert so a changed date keeps the vector ordered.
        ledger.expenses.remove(idx);
        Self::insert_sorted(&mut ledger.expenses, expense.clone());
        Ok(expense)
    }

    async fn delete(&self, user_id: &str, id: Uuid) -> Result<bool, CoreError> {
        let mut ledger = self.write()?;
        let before = ledger.expenses.len();
        ledger
            .expenses
            .retain(|e| !(e.id == id && e.user_id == user_id));
        Ok(ledger.expenses.len() < before)
    }
}

#[async_trait]
impl BudgetRepository for MemoryStore {
    async fn insert(&self, budget: Budget) -> Result<Budget, CoreError> {
        self.write()?.budgets.push(budget.clone());
        Ok(budget)
    }

    async fn find(&self, user_id: &str, id: Uuid) -> Result<Option<Budget>, CoreError> {
        Ok(self
            .read()?
            .budgets
            .iter()
            .find(|b| b.id == id && b.user_id == user_id)
            .cloned())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Budget>, CoreError> {
        let mut budgets: Vec<Budget> = self
            .read()?
            .budgets
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        budgets.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(budgets)
    }

    async fn find_overlapping(
        &self,
        user_id: &str,
        range: &DateRange,
    ) -> Result<Vec<Budget>, CoreError> {
        let found: Vec<Budget> = self
            .read()?
            .budgets
            .iter()
            .filter(|b| b.user_id == user_id && b.overlaps(range))
            .cloned()
            .collect();
        debug!(user_id, count = found.len(), range = %range, "Fetched budgets");
        Ok(found)
    }

    async fn update(&self, budget: Budget) -> Result<Budget, CoreError> {
        let mut ledger = self.write()?;
        let slot = ledger
            .budgets
            .iter_mut()
            .find(|b| b.id == budget.id && b.user_id == budget.user_id)
            .ok_or_else(|| CoreError::not_found("Budget", budget.id))?;
        *slot = budget.clone();
        Ok(budget)
    }

    async fn delete(&self, user_id: &str, id: Uuid) -> Result<bool, CoreError> {
        let mut ledger = self.write()?;
        let before = ledger.budgets.len();
        ledger
            .budgets
            .retain(|b| !(b.id == id && b.user_id == user_id));
        Ok(ledger.budgets.len() < before)
    }
}

#[async_trait]
impl GoalRepository for MemoryStore {
    async fn insert(&self, goal: Goal) -> Result<Goal, CoreError> {
        self.write()?.goals.push(goal.clone());
        Ok(goal)
    }

    async fn find(&self, user_id: &str, id: Uuid) -> Result<Option<Goal>, CoreError> {
        Ok(self
            .read()?
            .goals
            .iter()
            .find(|g| g.id == id && g.user_id == user_id)
            .cloned())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Goal>, CoreError> {
        let mut goals: Vec<Goal> = self
            .read()?
            .goals
            .iter()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect();
        goals.sort_by(|a, b| a.deadline.cmp(&b.deadline));
        Ok(goals)
    }

    async fn update(&self, goal: Goal) -> Result<Goal, CoreError> {
        let mut ledger = self.write()?;
        let slot = ledger
            .goals
            .iter_mut()
            .find(|g| g.id == goal.id && g.user_id == goal.user_id)
            .ok_or_else(|| CoreError::not_found("Goal", goal.id))?;
        *slot = goal.clone();
        Ok(goal)
    }

    async fn delete(&self, user_id: &str, id: Uuid) -> Result<bool, CoreError> {
        let mut ledger = self.write()?;
        let before = ledger.goals.len();
        ledger.goals.retain(|g| !(g.id == id && g.user_id == user_id));
        Ok(ledger.goals.len() < before)
    }
}

#[async_trait]
impl ReportLogRepository for MemoryStore {
    async fn append(&self, log: ReportDownloadLog) -> Result<ReportDownloadLog, CoreError> {
        self.write()?.report_logs.push(log.clone());
        Ok(log)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<ReportDownloadLog>, CoreError> {
        let mut logs: Vec<ReportDownloadLog> = self
            .read()?
            .report_logs
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.download_time.cmp(&a.download_time));
        Ok(logs)
    }

    async fn clear(&self, user_id: &str) -> Result<usize, CoreError> {
        let mut ledger = self.write()?;
        let before = ledger.report_logs.len();
        ledger.report_logs.retain(|l| l.user_id != user_id);
        Ok(before - ledger.report_logs.len())
    }
}
