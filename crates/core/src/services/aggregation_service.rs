use chrono::{Duration, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::amount::sanitize_amount;
use crate::models::budget::Budget;
use crate::models::dashboard::{
    BudgetComparisonPoint, CategoryTotal, DashboardSummary, SpendingTotals, TrendPoint,
};
use crate::models::date_range::DateRange;
use crate::models::expense::Expense;
use crate::services::proration_service::ProrationService;

/// Number of equal-duration segments in the trend charts.
pub const TREND_SEGMENTS: i32 = 6;

/// Maximum entries in `top_categories`.
pub const TOP_CATEGORIES_LIMIT: usize = 5;

/// Maximum entries in `recent_transactions`.
pub const RECENT_TRANSACTIONS_LIMIT: usize = 5;

/// One trend segment `[start, end)`; the last segment is closed `[start, end]`
/// so that an expense dated exactly at the end of the range is still counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub is_last: bool,
    pub label: String,
}

impl Segment {
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && (instant < self.end || (self.is_last && instant == self.end))
    }

    /// Inclusive overlap test against a budget window.
    fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start <= self.end && end >= self.start
    }
}

/// Reduces a user's expenses and budgets over a query window into the
/// dashboard summary.
///
/// Pure and infallible: empty input produces zeros, malformed amounts count
/// as zero. Fetching the records is the caller's job.
pub struct AggregationService {
    proration: ProrationService,
}

impl AggregationService {
    pub fn new() -> Self {
        Self {
            proration: ProrationService::new(),
        }
    }

    /// Build the full dashboard summary.
    pub fn aggregate(
        &self,
        expenses: &[Expense],
        budgets: &[Budget],
        range: &DateRange,
    ) -> DashboardSummary {
        let totals = self.totals(expenses, budgets, range);
        let segments = self.segments(range);

        let expense_trend: Vec<TrendPoint> = segments
            .iter()
            .map(|segment| TrendPoint {
                label: segment.label.clone(),
                amount: segment_spend(expenses, segment),
            })
            .collect();

        let included: Vec<&Budget> = budgets.iter().filter(|b| b.overlaps(range)).collect();
        let budget_comparison = segments
            .iter()
            .zip(&expense_trend)
            .map(|(segment, trend)| BudgetComparisonPoint {
                label: segment.label.clone(),
                expenses: trend.amount,
                budget: average_overlapping_budget(&included, segment),
            })
            .collect();

        debug!(
            expenses = expenses.len(),
            budgets = budgets.len(),
            included_budgets = included.len(),
            range = %range,
            "Aggregated dashboard"
        );

        DashboardSummary {
            date_range: *range,
            totals,
            expense_trend,
            budget_comparison,
            top_categories: self.top_categories(expenses),
            recent_transactions: self.recent_transactions(expenses),
        }
    }

    /// Totals, remaining budget and percentage split.
    pub fn totals(&self, expenses: &[Expense], budgets: &[Budget], range: &DateRange) -> SpendingTotals {
        let total_expenses = self.total_expenses(expenses);
        let total_budget = self.total_budget(budgets, range);

        let spent_percentage = if total_budget > 0.0 {
            (total_expenses / total_budget) * 100.0
        } else {
            0.0
        };

        SpendingTotals {
            total_expenses,
            total_budget,
            remaining_budget: total_budget - total_expenses,
            spent_percentage,
            remaining_percentage: 100.0 - spent_percentage,
        }
    }

    pub fn total_expenses(&self, expenses: &[Expense]) -> f64 {
        expenses.iter().map(|e| sanitize_amount(e.amount)).sum()
    }

    /// Sum of prorated amounts of every budget overlapping `range`.
    pub fn total_budget(&self, budgets: &[Budget], range: &DateRange) -> f64 {
        budgets
            .iter()
            .filter(|b| b.overlaps(range))
            .map(|b| self.proration.prorated_amount(b, range))
            .sum()
    }

    /// Split `range` into [`TREND_SEGMENTS`] equal-duration segments.
    pub fn segments(&self, range: &DateRange) -> Vec<Segment> {
        let segment_duration = range.duration() / TREND_SEGMENTS;
        let label_format = label_format(range.duration());

        (0..TREND_SEGMENTS)
            .map(|i| {
                let start = range.start + segment_duration * i;
                let is_last = i == TREND_SEGMENTS - 1;
                let end = if is_last {
                    range.end
                } else {
                    range.start + segment_duration * (i + 1)
                };
                Segment {
                    start,
                    end,
                    is_last,
                    label: start.format(label_format).to_string(),
                }
            })
            .collect()
    }

    /// Categories by total spend, largest first, at most [`TOP_CATEGORIES_LIMIT`].
    pub fn top_categories(&self, expenses: &[Expense]) -> Vec<CategoryTotal> {
        let mut by_category = BTreeMap::new();
        for expense in expenses {
            *by_category.entry(expense.category).or_insert(0.0) += sanitize_amount(expense.amount);
        }

        let mut totals: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(name, value)| CategoryTotal { name, value })
            .collect();
        totals.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        totals.truncate(TOP_CATEGORIES_LIMIT);
        totals
    }

    /// Newest expenses first, at most [`RECENT_TRANSACTIONS_LIMIT`].
    pub fn recent_transactions(&self, expenses: &[Expense]) -> Vec<Expense> {
        let mut recent: Vec<&Expense> = expenses.iter().collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        recent
            .into_iter()
            .take(RECENT_TRANSACTIONS_LIMIT)
            .cloned()
            .collect()
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}

fn segment_spend(expenses: &[Expense], segment: &Segment) -> f64 {
    expenses
        .iter()
        .filter(|e| segment.contains(e.date))
        .map(|e| sanitize_amount(e.amount))
        .sum()
}

/// Average (not sum) so that overlapping budgets are not double counted.
fn average_overlapping_budget(budgets: &[&Budget], segment: &Segment) -> f64 {
    let overlapping: Vec<f64> = budgets
        .iter()
        .filter(|b| segment.overlaps(b.start_date, b.end_date))
        .map(|b| sanitize_amount(b.total_budget))
        .collect();
    if overlapping.is_empty() {
        return 0.0;
    }
    overlapping.iter().sum::<f64>() / overlapping.len() as f64
}

/// Day of month for a week or less, "Jun 5" up to two months, "Jun 2024" beyond.
fn label_format(window: Duration) -> &'static str {
    if window <= Duration::days(7) {
        "%-d"
    } else if window <= Duration::days(60) {
        "%b %-d"
    } else {
        "%b %Y"
    }
}
