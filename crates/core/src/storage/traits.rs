use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::budget::Budget;
use crate::models::date_range::DateRange;
use crate::models::expense::Expense;
use crate::models::goal::Goal;
use crate::models::report::ReportDownloadLog;

// Storage collaborators. The core only talks to persistence through these
// traits; any document store, SQL database or the bundled `MemoryStore`
// can sit behind them. Every lookup is scoped by `user_id`.

#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn insert(&self, expense: Expense) -> Result<Expense, CoreError>;

    async fn find(&self, user_id: &str, id: Uuid) -> Result<Option<Expense>, CoreError>;

    async fn list(&self, user_id: &str) -> Result<Vec<Expense>, CoreError>;

    /// Expenses dated inside the closed `range`.
    async fn find_in_range(&self, user_id: &str, range: &DateRange)
        -> Result<Vec<Expense>, CoreError>;

    /// Replace a stored expense. `NotFound` if it does not exist for its user.
    async fn update(&self, expense: Expense) -> Result<Expense, CoreError>;

    /// Returns `false` if nothing was deleted.
    async fn delete(&self, user_id: &str, id: Uuid) -> Result<bool, CoreError>;
}

#[async_trait]
pub trait BudgetRepository: Send + Sync {
    async fn insert(&self, budget: Budget) -> Result<Budget, CoreError>;

    async fn find(&self, user_id: &str, id: Uuid) -> Result<Option<Budget>, CoreError>;

    async fn list(&self, user_id: &str) -> Result<Vec<Budget>, CoreError>;

    /// Budgets whose window satisfies the overlap predicate
    /// ([`DateRange::overlaps`]) for `range`.
    async fn find_overlapping(&self, user_id: &str, range: &DateRange)
        -> Result<Vec<Budget>, CoreError>;

    async fn update(&self, budget: Budget) -> Result<Budget, CoreError>;

    async fn delete(&self, user_id: &str, id: Uuid) -> Result<bool, CoreError>;
}

#[async_trait]
pub trait GoalRepository: Send + Sync {
    async fn insert(&self, goal: Goal) -> Result<Goal, CoreError>;

    async fn find(&self, user_id: &str, id: Uuid) -> Result<Option<Goal>, CoreError>;

    async fn list(&self, user_id: &str) -> Result<Vec<Goal>, CoreError>;

    async fn update(&self, goal: Goal) -> Result<Goal, CoreError>;

    async fn delete(&self, user_id: &str, id: Uuid) -> Result<bool, CoreError>;
}

/// Append-only audit trail of report downloads.
#[async_trait]
pub trait ReportLogRepository: Send + Sync {
    async fn append(&self, log: ReportDownloadLog) -> Result<ReportDownloadLog, CoreError>;

    async fn list(&self, user_id: &str) -> Result<Vec<ReportDownloadLog>, CoreError>;

    /// Remove every log of `user_id`, returning how many were removed.
    async fn clear(&self, user_id: &str) -> Result<usize, CoreError>;
}

/// The set of repositories a [`crate::FinanceTracker`] is wired with.
#[derive(Clone)]
pub struct Repositories {
    pub expenses: Arc<dyn ExpenseRepository>,
    pub budgets: Arc<dyn BudgetRepository>,
    pub goals: Arc<dyn GoalRepository>,
    pub report_logs: Arc<dyn ReportLogRepository>,
}

impl Repositories {
    /// Back every repository with the same in-memory store.
    pub fn in_memory(store: Arc<super::memory::MemoryStore>) -> Self {
        Self {
            expenses: store.clone(),
            budgets: store.clone(),
            goals: store.clone(),
            report_logs: store,
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
