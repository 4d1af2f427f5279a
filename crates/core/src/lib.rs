pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod renderers;
pub mod services;
pub mod storage;

use chrono::{NaiveDateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use config::TrackerConfig;
use errors::CoreError;
use models::{
    budget::{BudgetUpdate, BudgetView, NewBudget},
    dashboard::DashboardSummary,
    date_range::{DateRange, DateRangeQuery},
    expense::{Expense, ExpenseUpdate, NewExpense},
    goal::{Contribution, GoalUpdate, GoalView, NewGoal},
    ledger::Ledger,
    report::{ReportDocument, ReportDownload, ReportDownloadLog},
};
use renderers::{html_file::HtmlFileRenderer, http_pdf::HttpPdfRenderer, traits::ReportRenderer};
use services::{
    budget_service::BudgetService, dashboard_service::DashboardService,
    expense_service::ExpenseService, export_service::ExportService, goal_service::GoalService,
};
use storage::{manager::SnapshotManager, memory::MemoryStore, traits::Repositories};

/// Main entry point for the finance tracker core library.
/// Wires the configured repositories into every service; holds no global state.
#[must_use]
pub struct FinanceTracker {
    config: TrackerConfig,
    repositories: Repositories,
    /// Set when built over the bundled store; enables encrypted snapshots.
    store: Option<Arc<MemoryStore>>,
    expense_service: ExpenseService,
    budget_service: BudgetService,
    goal_service: GoalService,
    dashboard_service: DashboardService,
    export_service: ExportService,
    snapshots: SnapshotManager,
}

impl std::fmt::Debug for FinanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceTracker")
            .field("config", &self.config)
            .field("repositories", &self.repositories)
            .field("in_memory", &self.store.is_some())
            .finish()
    }
}

impl FinanceTracker {
    /// Build a tracker over externally provided repositories.
    pub fn new(config: TrackerConfig, repositories: Repositories) -> Self {
        Self::build(config, repositories, None)
    }

    /// Build a tracker backed by a fresh [`MemoryStore`].
    pub fn in_memory(config: TrackerConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Restore an in-memory tracker from an encrypted snapshot.
    pub fn from_snapshot_bytes(
        config: TrackerConfig,
        encrypted: &[u8],
        passphrase: &str,
    ) -> Result<Self, CoreError> {
        let ledger = SnapshotManager::new().load_from_bytes(encrypted, passphrase)?;
        Ok(Self::with_store(config, Arc::new(MemoryStore::from_ledger(ledger))))
    }

    /// Restore an in-memory tracker from an encrypted snapshot file.
    pub fn from_snapshot_file(
        config: TrackerConfig,
        path: impl AsRef<Path>,
        passphrase: &str,
    ) -> Result<Self, CoreError> {
        let ledger = SnapshotManager::new().load_from_file(path, passphrase)?;
        Ok(Self::with_store(config, Arc::new(MemoryStore::from_ledger(ledger))))
    }

    fn with_store(config: TrackerConfig, store: Arc<MemoryStore>) -> Self {
        let repositories = Repositories::in_memory(store.clone());
        Self::build(config, repositories, Some(store))
    }

    fn build(config: TrackerConfig, repositories: Repositories, store: Option<Arc<MemoryStore>>) -> Self {
        Self {
            expense_service: ExpenseService::new(repositories.expenses.clone()),
            budget_service: BudgetService::new(repositories.budgets.clone()),
            goal_service: GoalService::new(repositories.goals.clone()),
            dashboard_service: DashboardService::new(
                repositories.expenses.clone(),
                repositories.budgets.clone(),
                repositories.report_logs.clone(),
            ),
            export_service: ExportService::new(),
            snapshots: SnapshotManager::new(),
            config,
            repositories,
            store,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn resolve(&self, query: &DateRangeQuery) -> Result<DateRange, CoreError> {
        query.resolve(Self::now(), self.config.default_range_days)
    }

    // ── Snapshots ───────────────────────────────────────────────────

    /// Encrypt the whole ledger. Only available for in-memory trackers.
    pub fn save_to_bytes(&self, passphrase: &str) -> Result<Vec<u8>, CoreError> {
        self.snapshots.save_to_bytes(&self.ledger()?, passphrase)
    }

    /// Encrypt the whole ledger into a file. Only available for in-memory trackers.
    pub fn save_to_file(&self, path: impl AsRef<Path>, passphrase: &str) -> Result<(), CoreError> {
        self.snapshots.save_to_file(&self.ledger()?, path, passphrase)
    }

    fn ledger(&self) -> Result<Ledger, CoreError> {
        self.store
            .as_ref()
            .ok_or_else(|| {
                CoreError::Storage("snapshots are only supported by the in-memory store".into())
            })?
            .snapshot()
    }

    // ── Expenses ────────────────────────────────────────────────────

    pub async fn add_expense(&self, user_id: &str, request: NewExpense) -> Result<Expense, CoreError> {
        self.expense_service.create(user_id, request).await
    }

    pub async fn get_expense(&self, user_id: &str, id: Uuid) -> Result<Expense, CoreError> {
        self.expense_service.get(user_id, id).await
    }

    /// Every expense of the user, newest first.
    pub async fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>, CoreError> {
        self.expense_service.list(user_id).await
    }

    pub async fn expenses_in_range(
        &self,
        user_id: &str,
        query: &DateRangeQuery,
    ) -> Result<Vec<Expense>, CoreError> {
        let range = self.resolve(query)?;
        self.expense_service.list_in_range(user_id, &range).await
    }

    pub async fn update_expense(
        &self,
        user_id: &str,
        id: Uuid,
        update: ExpenseUpdate,
    ) -> Result<Expense, CoreError> {
        self.expense_service.update(user_id, id, update).await
    }

    pub async fn delete_expense(&self, user_id: &str, id: Uuid) -> Result<(), CoreError> {
        self.expense_service.delete(user_id, id).await
    }

    // ── Budgets ─────────────────────────────────────────────────────

    pub async fn create_budget(&self, user_id: &str, request: NewBudget) -> Result<BudgetView, CoreError> {
        self.budget_service.create(user_id, request, Self::now()).await
    }

    pub async fn get_budget(&self, user_id: &str, id: Uuid) -> Result<BudgetView, CoreError> {
        self.budget_service.get(user_id, id, Self::now()).await
    }

    pub async fn list_budgets(&self, user_id: &str) -> Result<Vec<BudgetView>, CoreError> {
        self.budget_service.list(user_id, Self::now()).await
    }

    pub async fn update_budget(
        &self,
        user_id: &str,
        id: Uuid,
        update: BudgetUpdate,
    ) -> Result<BudgetView, CoreError> {
        self.budget_service.update(user_id, id, update, Self::now()).await
    }

    pub async fn delete_budget(&self, user_id: &str, id: Uuid) -> Result<(), CoreError> {
        self.budget_service.delete(user_id, id).await
    }

    // ── Goals ───────────────────────────────────────────────────────

    pub async fn create_goal(&self, user_id: &str, request: NewGoal) -> Result<GoalView, CoreError> {
        self.goal_service.create(user_id, request, Self::now()).await
    }

    pub async fn get_goal(&self, user_id: &str, id: Uuid) -> Result<GoalView, CoreError> {
        self.goal_service.get(user_id, id, Self::now()).await
    }

    pub async fn list_goals(&self, user_id: &str) -> Result<Vec<GoalView>, CoreError> {
        self.goal_service.list(user_id, Self::now()).await
    }

    pub async fn update_goal(
        &self,
        user_id: &str,
        id: Uuid,
        update: GoalUpdate,
    ) -> Result<GoalView, CoreError> {
        self.goal_service.update(user_id, id, update, Self::now()).await
    }

    pub async fn contribute_to_goal(
        &self,
        user_id: &str,
        id: Uuid,
        contribution: Contribution,
    ) -> Result<GoalView, CoreError> {
        self.goal_service
            .contribute(user_id, id, contribution, Self::now())
            .await
    }

    pub async fn delete_goal(&self, user_id: &str, id: Uuid) -> Result<(), CoreError> {
        self.goal_service.delete(user_id, id).await
    }

    // ── Dashboard & Reports ─────────────────────────────────────────

    /// Dashboard for the requested window (default: the last
    /// `default_range_days` days).
    pub async fn dashboard(
        &self,
        user_id: &str,
        query: &DateRangeQuery,
    ) -> Result<DashboardSummary, CoreError> {
        let range = self.resolve(query)?;
        self.dashboard_service.build_dashboard(user_id, &range).await
    }

    pub async fn report_document(
        &self,
        user_id: &str,
        query: &DateRangeQuery,
    ) -> Result<ReportDocument, CoreError> {
        let range = self.resolve(query)?;
        self.dashboard_service
            .build_report_document(user_id, &range, Self::now())
            .await
    }

    /// Render with the configured renderer: the HTTP PDF endpoint when
    /// `renderer_url` is set, plain HTML files otherwise.
    pub async fn download_report(
        &self,
        user_id: &str,
        query: &DateRangeQuery,
    ) -> Result<ReportDownload, CoreError> {
        let renderer = self.default_renderer();
        self.download_report_with(user_id, query, renderer.as_ref()).await
    }

    pub async fn download_report_with(
        &self,
        user_id: &str,
        query: &DateRangeQuery,
        renderer: &dyn ReportRenderer,
    ) -> Result<ReportDownload, CoreError> {
        let range = self.resolve(query)?;
        self.dashboard_service
            .download_report(user_id, &range, renderer, &self.config.currency, Self::now())
            .await
    }

    pub async fn report_download_logs(&self, user_id: &str) -> Result<Vec<ReportDownloadLog>, CoreError> {
        self.dashboard_service.list_download_logs(user_id).await
    }

    pub async fn clear_report_download_logs(&self, user_id: &str) -> Result<usize, CoreError> {
        self.dashboard_service.clear_download_logs(user_id).await
    }

    fn default_renderer(&self) -> Box<dyn ReportRenderer> {
        match &self.config.renderer_url {
            Some(url) => Box::new(HttpPdfRenderer::new(url.clone(), self.config.report_dir.clone())),
            None => Box::new(HtmlFileRenderer::new(self.config.report_dir.clone())),
        }
    }

    // ── Export ──────────────────────────────────────────────────────

    /// All expenses of the user as CSV, newest first.
    pub async fn export_expenses_to_csv(&self, user_id: &str) -> Result<String, CoreError> {
        let expenses = self.expense_service.list(user_id).await?;
        Ok(self.export_service.expenses_to_csv(&expenses))
    }

    /// All expenses of the user as a JSON array, newest first.
    pub async fn export_expenses_to_json(&self, user_id: &str) -> Result<String, CoreError> {
        let expenses = self.expense_service.list(user_id).await?;
        self.export_service.expenses_to_json(&expenses)
    }
}
