use serde::{Deserialize, Serialize};

use super::date_range::DateRange;
use super::expense::{Category, Expense};

/// Spend in one trend segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub amount: f64,
}

/// Spend vs. budget in one trend segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetComparisonPoint {
    pub label: String,
    pub expenses: f64,
    /// Average `totalBudget` of the budgets overlapping the segment
    pub budget: f64,
}

/// Total spend for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: Category,
    pub value: f64,
}

/// Headline numbers shared by the dashboard and the PDF report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingTotals {
    pub total_expenses: f64,
    /// Sum of budgets prorated to the query window
    pub total_budget: f64,
    /// `total_budget - total_expenses`; negative when overspent
    pub remaining_budget: f64,
    pub spent_percentage: f64,
    pub remaining_percentage: f64,
}

/// Everything the dashboard shows for one user and date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub date_range: DateRange,

    #[serde(flatten)]
    pub totals: SpendingTotals,

    /// Exactly six segments covering the date range
    pub expense_trend: Vec<TrendPoint>,

    pub budget_comparison: Vec<BudgetComparisonPoint>,

    /// Up to five categories, largest spend first
    pub top_categories: Vec<CategoryTotal>,

    /// Up to five expenses, newest first
    pub recent_transactions: Vec<Expense>,
}
