use chrono::{Datelike, Days, Months, NaiveDate};

use crate::models::budget::BudgetPeriod;
use crate::models::date_range::{end_of_day, start_of_day, DateRange};

/// Computes the canonical window of a budget period around a reference date.
pub trait PeriodStrategy: Send + Sync {
    fn window(&self, reference: NaiveDate) -> DateRange;
}

/// Monday 00:00 through the following Sunday 23:59:59.999.
pub struct WeeklyPeriod;

impl PeriodStrategy for WeeklyPeriod {
    fn window(&self, reference: NaiveDate) -> DateRange {
        // Windows are clamped at the ends of the calendar.
        let back = u64::from(reference.weekday().num_days_from_monday());
        let monday = reference.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
        let sunday = monday.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
        DateRange {
            start: start_of_day(monday),
            end: end_of_day(sunday),
        }
    }
}

/// First day of the month 00:00 through its last day 23:59:59.999.
pub struct MonthlyPeriod;

impl PeriodStrategy for MonthlyPeriod {
    fn window(&self, reference: NaiveDate) -> DateRange {
        let first = reference.with_day(1).unwrap_or(reference);
        // last day = first day of next month minus one day
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        DateRange {
            start: start_of_day(first),
            end: end_of_day(last),
        }
    }
}

/// Maps a [`BudgetPeriod`] to its strategy.
pub struct PeriodService;

impl PeriodService {
    pub fn new() -> Self {
        Self
    }

    pub fn strategy(&self, period: BudgetPeriod) -> &'static dyn PeriodStrategy {
        match period {
            BudgetPeriod::Weekly => &WeeklyPeriod,
            BudgetPeriod::Monthly => &MonthlyPeriod,
        }
    }

    /// Window of the `period` that contains `reference`. Pure, never fails.
    pub fn compute_window(&self, period: BudgetPeriod, reference: NaiveDate) -> DateRange {
        self.strategy(period).window(reference)
    }
}

impl Default for PeriodService {
    fn default() -> Self {
        Self::new()
    }
}

