use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::dashboard::DashboardSummary;
use crate::models::date_range::DateRange;
use crate::models::report::{ReportDocument, ReportDownload, ReportDownloadLog};
use crate::renderers::traits::ReportRenderer;
use crate::services::aggregation_service::AggregationService;
use crate::storage::traits::{BudgetRepository, ExpenseRepository, ReportLogRepository};

/// Fetches a user's records for a window and hands them to the
/// [`AggregationService`]. Also drives report rendering and its audit log.
///
/// Storage and renderer errors propagate unchanged.
pub struct DashboardService {
    expenses: Arc<dyn ExpenseRepository>,
    budgets: Arc<dyn BudgetRepository>,
    report_logs: Arc<dyn ReportLogRepository>,
    aggregation: AggregationService,
}

impl DashboardService {
    pub fn new(
        expenses: Arc<dyn ExpenseRepository>,
        budgets: Arc<dyn BudgetRepository>,
        report_logs: Arc<dyn ReportLogRepository>,
    ) -> Self {
        Self {
            expenses,
            budgets,
            report_logs,
            aggregation: AggregationService::new(),
        }
    }

    pub async fn build_dashboard(
        &self,
        user_id: &str,
        range: &DateRange,
    ) -> Result<DashboardSummary, CoreError> {
        let expenses = self.expenses.find_in_range(user_id, range).await?;
        let budgets = self.budgets.find_overlapping(user_id, range).await?;
        Ok(self.aggregation.aggregate(&expenses, &budgets, range))
    }

    /// Summary, top categories and recent transactions; no trend series.
    pub async fn build_report_document(
        &self,
        user_id: &str,
        range: &DateRange,
        now: NaiveDateTime,
    ) -> Result<ReportDocument, CoreError> {
        let expenses = self.expenses.find_in_range(user_id, range).await?;
        let budgets = self.budgets.find_overlapping(user_id, range).await?;

        Ok(ReportDocument {
            user_id: user_id.to_string(),
            date_range: *range,
            generated_at: now,
            totals: self.aggregation.totals(&expenses, &budgets, range),
            top_categories: self.aggregation.top_categories(&expenses),
            recent_transactions: self.aggregation.recent_transactions(&expenses),
        })
    }

    /// Render the report, record the download and return the artifact bytes.
    ///
    /// Each call renders to its own file so concurrent downloads of the same
    /// range never share an artifact. The rendered file is removed once its
    /// bytes are in memory; a failed removal is logged and does not fail the
    /// download. Nothing is logged when rendering fails.
    pub async fn download_report(
        &self,
        user_id: &str,
        range: &DateRange,
        renderer: &dyn ReportRenderer,
        currency: &str,
        now: NaiveDateTime,
    ) -> Result<ReportDownload, CoreError> {
        let document = self.build_report_document(user_id, range, now).await?;
        let file_name = document.file_name(renderer.extension());
        let artifact_stem = format!("{}-{}", document.file_stem(), Uuid::new_v4());

        let path = renderer
            .render_to_file(&document.to_html(currency), &artifact_stem)
            .await?;
        debug!(renderer = renderer.name(), path = %path.display(), "Report rendered");

        let read = tokio::fs::read(&path).await;
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(path = %path.display(), error = %e, "Failed to remove rendered report");
        }
        let bytes = read?;

        self.report_logs
            .append(ReportDownloadLog::new(user_id, *range, file_name.as_str(), now))
            .await?;
        info!(user_id, file_name = %file_name, bytes = bytes.len(), "Report downloaded");

        Ok(ReportDownload {
            file_name,
            content_type: renderer.content_type().to_string(),
            bytes,
        })
    }

    /// Download history of the user, newest first.
    pub async fn list_download_logs(&self, user_id: &str) -> Result<Vec<ReportDownloadLog>, CoreError> {
        self.report_logs.list(user_id).await
    }

    /// Delete the user's download history. Returns the number of removed entries.
    pub async fn clear_download_logs(&self, user_id: &str) -> Result<usize, CoreError> {
        let removed = self.report_logs.clear(user_id).await?;
        info!(user_id, removed, "Cleared report download logs");
        Ok(removed)
    }
}
