use chrono::NaiveDateTime;

use crate::models::amount::sanitize_amount;
use crate::models::budget::Budget;
use crate::models::date_range::{DateRange, DAY_MILLIS};

/// Allocates a share of a budget to a query window by calendar-day overlap.
///
/// Day counts are whole-day ceilings plus one (both boundary days count),
/// not fractional days. A weekly budget ending at 23:59:59.999 therefore
/// spans 8 counted days; because the same rule applies to the overlap, a
/// query window that fully contains the budget still yields the whole amount.
pub struct ProrationService;

impl ProrationService {
    pub fn new() -> Self {
        Self
    }

    /// Portion of `budget.total_budget` attributable to `range`.
    pub fn prorated_amount(&self, budget: &Budget, range: &DateRange) -> f64 {
        self.prorate(
            budget.total_budget,
            Some(budget.start_date),
            Some(budget.end_date),
            range,
        )
    }

    /// Proration over a possibly open-ended budget window. A missing bound
    /// is replaced by the matching edge of `range`.
    pub fn prorate(
        &self,
        total_budget: f64,
        budget_start: Option<NaiveDateTime>,
        budget_end: Option<NaiveDateTime>,
        range: &DateRange,
    ) -> f64 {
        let start = budget_start.unwrap_or(range.start);
        let end = budget_end.unwrap_or(range.end);

        let effective_start = start.max(range.start);
        let effective_end = end.min(range.end);
        if effective_end < effective_start {
            return 0.0;
        }

        let days_in_period = inclusive_day_count(effective_start, effective_end);
        let total_budget_days = inclusive_day_count(start, end);
        if total_budget_days <= 0 {
            return 0.0;
        }

        let total = sanitize_amount(total_budget);
        ((total / total_budget_days as f64) * days_in_period as f64).max(0.0)
    }
}

impl Default for ProrationService {
    fn default() -> Self {
        Self::new()
    }
}

/// `ceil((end - start) / 1 day) + 1`.
pub fn inclusive_day_count(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    let millis = (end - start).num_milliseconds();
    (millis as f64 / DAY_MILLIS as f64).ceil() as i64 + 1
}
