use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dashboard::{CategoryTotal, SpendingTotals};
use super::date_range::DateRange;
use super::expense::Expense;

/// Audit record written each time a user downloads a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDownloadLog {
    pub id: Uuid,
    pub user_id: String,
    pub date_range: DateRange,
    pub file_name: String,
    pub download_time: NaiveDateTime,
}

impl ReportDownloadLog {
    pub fn new(
        user_id: impl Into<String>,
        date_range: DateRange,
        file_name: impl Into<String>,
        download_time: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            date_range,
            file_name: file_name.into(),
            download_time,
        }
    }
}

/// Render-ready report data: the dashboard without its trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub user_id: String,
    pub date_range: DateRange,
    pub generated_at: NaiveDateTime,
    #[serde(flatten)]
    pub totals: SpendingTotals,
    pub top_categories: Vec<CategoryTotal>,
    pub recent_transactions: Vec<Expense>,
}

impl ReportDocument {
    /// File name offered to the user, e.g. `financial-report_2024-06-01_2024-06-30.pdf`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{extension}", self.file_stem())
    }

    pub fn file_stem(&self) -> String {
        format!(
            "financial-report_{}_{}",
            self.date_range.start_date(),
            self.date_range.end_date()
        )
    }

    /// Self-contained, escaped HTML page for a [`crate::renderers::traits::ReportRenderer`].
    pub fn to_html(&self, currency: &str) -> String {
        crate::renderers::template::render_report_html(self, currency)
    }
}

/// A delivered report. The rendered artifact has already been removed from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDownload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

